//! Shell Configuration
//!
//! Every tunable lives here with its built-in default. The shell reads no
//! config file and no environment; the values below are what ships.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// The one site the shell ever loads.
pub const HOME_URL: &str = "https://www.youtube.com/";

/// Full-video layout tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullVideoConfig {
    /// Delay before re-checking for a page view that is not attached yet
    pub page_poll_delay: Duration,

    /// Delay before the single retry of a failed apply
    pub retry_delay: Duration,

    /// Extra magnification on top of the exact fit (1.03 = 3%)
    pub zoom_margin: f64,

    /// Lower bound for host-side zoom
    pub min_zoom: f64,

    /// Upper bound for host-side zoom
    pub max_zoom: f64,

    /// Largest corrective scroll-by after the alignment scroll
    pub max_scroll_correction: f64,

    /// Smallest width/height accepted for a target element
    pub min_target_extent: f64,
}

impl Default for FullVideoConfig {
    fn default() -> Self {
        Self {
            page_poll_delay: Duration::from_millis(250),
            retry_delay: Duration::from_millis(200),
            zoom_margin: 1.03,
            min_zoom: 1.0,
            max_zoom: 4.0,
            max_scroll_correction: 240.0,
            min_target_extent: 8.0,
        }
    }
}

/// Window sizing tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Per-axis slack when deciding whether a size already is a preset
    pub preset_tolerance: f64,

    /// Delay before re-fitting full video after a preset change
    pub refit_delay: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            preset_tolerance: 0.5,
            refit_delay: Duration::from_millis(200),
        }
    }
}

/// Web-content liveness checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// How often to ping an idle page
    pub ping_interval: Duration,
    /// How long a ping may go unanswered before the page is reloaded
    pub timeout: Duration,
    /// How long a navigation or reload may stay unfinished before the page
    /// is reloaded again
    pub load_timeout: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// Complete shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Fixed navigation target
    pub home_url: Url,

    /// Height of the toolbar strip above the page (logical units)
    pub toolbar_height: f64,

    pub full_video: FullVideoConfig,
    pub window: WindowConfig,
    pub watchdog: WatchdogConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home_url: home_url(),
            toolbar_height: 36.0,
            full_video: FullVideoConfig::default(),
            window: WindowConfig::default(),
            watchdog: WatchdogConfig::default(),
        }
    }
}

fn home_url() -> Url {
    match Url::parse(HOME_URL) {
        Ok(url) => url,
        Err(e) => unreachable!("HOME_URL is a valid absolute URL: {e}"),
    }
}

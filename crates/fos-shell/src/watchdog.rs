//! Web-content liveness watchdog.
//!
//! Embedded engines do not report the death of their content process, so
//! the shell pings the idle page with a trivial script. A ping that stays
//! unanswered past the timeout means the content process is gone and the
//! page gets reloaded. A navigation or reload that never finishes is given
//! up on after the load timeout and reloaded again. There is no backoff and
//! no retry limit.

use crate::config::WatchdogConfig;
use crate::page::CallId;
use std::time::Instant;
use tracing::{debug, warn};

/// What the shell should do after a watchdog tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogAction {
    /// Nothing to do
    Idle,
    /// Send a ping
    Ping,
    /// The last ping or the pending load timed out
    Unresponsive,
}

/// Tracks the outstanding heartbeat for the page.
#[derive(Debug)]
pub struct Watchdog {
    config: WatchdogConfig,
    outstanding: Option<(CallId, Instant)>,
    /// Start of the navigation in flight, if any
    loading_since: Option<Instant>,
}

impl Watchdog {
    /// The page starts out loading at `now`.
    pub fn new(config: WatchdogConfig, now: Instant) -> Self {
        Self {
            config,
            outstanding: None,
            loading_since: Some(now),
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading_since.is_some()
    }

    /// Pause pings while a navigation is in flight. Repeated starts (e.g.
    /// redirects) keep the first start time.
    pub fn set_loading(&mut self, loading: bool, now: Instant) {
        if loading {
            self.outstanding = None;
            self.loading_since.get_or_insert(now);
        } else {
            self.loading_since = None;
        }
    }

    /// Decide what to do at `now`.
    pub fn tick(&self, now: Instant) -> WatchdogAction {
        if let Some(since) = self.loading_since {
            let elapsed = now.duration_since(since);
            if elapsed > self.config.load_timeout {
                warn!("Page load unfinished after {:?}", elapsed);
                return WatchdogAction::Unresponsive;
            }
            return WatchdogAction::Idle;
        }
        match self.outstanding {
            Some((call, sent)) if now.duration_since(sent) > self.config.timeout => {
                warn!("{} unanswered for {:?}", call, now.duration_since(sent));
                WatchdogAction::Unresponsive
            }
            Some(_) => WatchdogAction::Idle,
            None => WatchdogAction::Ping,
        }
    }

    /// Record a ping that has been sent.
    pub fn sent(&mut self, call: CallId, now: Instant) {
        self.outstanding = Some((call, now));
    }

    /// Handle a script answer. Returns `true` if it was our heartbeat.
    pub fn answered(&mut self, call: CallId) -> bool {
        match self.outstanding {
            Some((pending, _)) if pending == call => {
                self.outstanding = None;
                true
            }
            _ => false,
        }
    }

    /// The page was reloaded at `now`; wait for that load.
    pub fn reset(&mut self, now: Instant) {
        debug!("Watchdog reset");
        self.outstanding = None;
        self.loading_since = Some(now);
    }
}

//! Window Controller
//!
//! Applies the fixed window chrome once per native window and keeps the
//! window on one of the player size presets.

use crate::config::WindowConfig;
use crate::mode::ModeStore;
use crate::page::{Point, Size};
use crate::preset::{PresetStore, WindowSizePreset};
use crate::shell::ShellTimer;
use crate::timer::TimerQueue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;
use tracing::{debug, info};

/// Window position and content size in logical units. `origin` is the
/// top-left corner, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point,
    pub size: Size,
}

impl Frame {
    /// Same top edge and left edge, new size.
    pub fn with_size_top_anchored(self, size: Size) -> Self {
        Self {
            origin: self.origin,
            size,
        }
    }
}

/// Fixed chrome configuration for the player window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowChrome {
    /// Take part in OS-level fullscreen
    pub fullscreen: bool,
    /// Follow the user to the active space/workspace
    pub move_to_active_space: bool,
    /// Free resizing by the user
    pub resizable: bool,
    /// Title text in the title bar
    pub show_title: bool,
    /// Maximize/zoom button
    pub maximizable: bool,
}

impl Default for WindowChrome {
    fn default() -> Self {
        Self {
            fullscreen: false,
            move_to_active_space: true,
            resizable: false,
            show_title: false,
            maximizable: false,
        }
    }
}

/// Native window as seen by the controller.
pub trait HostWindow {
    /// Stable identity of the native window.
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;

    /// Current frame.
    fn frame(&self) -> Frame;

    /// Move/resize to `frame`.
    fn set_frame(&self, frame: Frame);

    /// Apply window chrome.
    fn configure(&self, chrome: &WindowChrome);
}

pub struct WindowController<W: HostWindow> {
    window: Option<W>,
    configured: HashSet<W::Id>,
    chrome: WindowChrome,
    presets: PresetStore,
    mode: ModeStore,
    config: WindowConfig,
}

impl<W: HostWindow> WindowController<W> {
    pub fn new(presets: PresetStore, mode: ModeStore, config: WindowConfig) -> Self {
        Self {
            window: None,
            configured: HashSet::new(),
            chrome: WindowChrome::default(),
            presets,
            mode,
            config,
        }
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    /// Take over `window`. Chrome is applied the first time a given window is
    /// seen; an off-preset size is snapped on every attach.
    pub fn attach(&mut self, window: W) {
        let id = window.id();
        if self.configured.insert(id) {
            info!("Configuring window {:?}", id);
            window.configure(&self.chrome);
        }

        let frame = window.frame();
        let nearest = WindowSizePreset::nearest(frame.size);
        if !WindowSizePreset::any_matches(frame.size, self.config.preset_tolerance) {
            debug!(
                "Window {:?} at {}x{} is off-preset, snapping to {}",
                id, frame.size.width, frame.size.height, nearest
            );
            window.set_frame(frame.with_size_top_anchored(nearest.size()));
        }
        self.presets.set(nearest);
        self.window = Some(window);
    }

    /// Resize notification from the attached window. Only the indicator
    /// follows; the window is not snapped here.
    pub fn on_resized(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.frame().size;
        let nearest = WindowSizePreset::nearest(size);
        if self.presets.get() != nearest {
            debug!("Window resized to {}x{}, nearest {}", size.width, size.height, nearest);
        }
        self.presets.set(nearest);
    }

    /// Resize to `preset`, keeping the top edge. Full video is re-fitted
    /// after `refit_delay`.
    pub fn apply(
        &mut self,
        preset: WindowSizePreset,
        now: Instant,
        timers: &mut TimerQueue<ShellTimer>,
    ) {
        info!("Player size {}", preset);
        if let Some(window) = &self.window {
            let frame = window.frame();
            window.set_frame(frame.with_size_top_anchored(preset.size()));
        }
        self.presets.set(preset);
        if self.mode.is_full_video() {
            timers.schedule(now, self.config.refit_delay, ShellTimer::Refit);
        }
    }
}

//! fOS-TV Shell Core
//!
//! Toolkit-agnostic state and control flow for the video shell:
//! - preset: fixed player sizes and nearest-match lookup
//! - view_mode: full-video layout via page scripts and host zoom
//! - window: one-time window chrome setup and preset snapping
//! - blocker: interaction lock overlay
//! - shell: wires the above to timers, page events and user commands
//!
//! Native windows and webviews are reached only through the `HostWindow`,
//! `PageView` and `Overlay` traits, so the desktop binary supplies tao/wry
//! implementations and tests supply recording fakes.

mod blocker;
mod command;
mod config;
mod error;
mod mode;
mod page;
mod preset;
pub mod scripts;
mod shell;
mod timer;
mod view_mode;
mod watchdog;
mod window;

#[cfg(test)]
mod fakes;

pub use blocker::{InputDisposition, InputEvent, InteractionLock, Overlay, PointerButton};
pub use command::Command;
pub use config::{FullVideoConfig, ShellConfig, WatchdogConfig, WindowConfig};
pub use error::PageError;
pub use mode::{ModeStore, ViewMode};
pub use page::{
    ApplyOutcome, CallId, CallIds, PageEvent, PageSettings, PageView, Point, Rect, ScriptReport,
    Size,
};
pub use preset::{PresetStore, WindowSizePreset};
pub use shell::{Shell, ShellTimer, ToolbarState};
pub use timer::TimerQueue;
pub use view_mode::{fit_zoom, ViewModeController};
pub use watchdog::{Watchdog, WatchdogAction};
pub use window::{Frame, HostWindow, WindowChrome, WindowController};

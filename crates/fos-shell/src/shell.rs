//! Shell orchestration.
//!
//! Owns every controller plus the shared stores and timer queue, and turns
//! user commands, page events and due timers into controller calls. All of
//! it runs on the UI thread; the event loop only needs to feed events in and
//! wake up at `next_deadline`.

use crate::blocker::{InputDisposition, InteractionLock, Overlay};
use crate::command::Command;
use crate::config::ShellConfig;
use crate::mode::{ModeStore, ViewMode};
use crate::page::{CallIds, PageEvent, PageSettings, PageView};
use crate::preset::{PresetStore, WindowSizePreset};
use crate::scripts;
use crate::timer::TimerQueue;
use crate::view_mode::ViewModeController;
use crate::watchdog::{Watchdog, WatchdogAction};
use crate::window::{HostWindow, WindowController};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Deferred work, fired by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellTimer {
    /// Look for the page view again
    PollPage,
    /// The single retry of a failed full-video apply
    RetryApply,
    /// Re-fit full video after a preset change
    Refit,
    /// Watchdog tick
    Heartbeat,
}

/// What the toolbar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub mode: ViewMode,
    pub preset: WindowSizePreset,
    pub locked: bool,
}

pub struct Shell<P: PageView, W: HostWindow, O: Overlay> {
    config: ShellConfig,
    mode: ModeStore,
    presets: PresetStore,
    calls: CallIds,
    view: ViewModeController<P>,
    window: WindowController<W>,
    lock: InteractionLock<O>,
    watchdog: Watchdog,
    timers: TimerQueue<ShellTimer>,
}

impl<P: PageView, W: HostWindow, O: Overlay> Shell<P, W, O> {
    pub fn new(config: ShellConfig, overlay: O, now: Instant) -> Self {
        let mode = ModeStore::new();
        let presets = PresetStore::new();
        let calls = CallIds::new();
        let mut timers = TimerQueue::new();
        timers.schedule(now, config.watchdog.ping_interval, ShellTimer::Heartbeat);

        Self {
            view: ViewModeController::new(mode.clone(), calls.clone(), config.full_video.clone()),
            window: WindowController::new(presets.clone(), mode.clone(), config.window.clone()),
            lock: InteractionLock::new(overlay),
            watchdog: Watchdog::new(config.watchdog.clone(), now),
            config,
            mode,
            presets,
            calls,
            timers,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// How the page view must be built.
    pub fn page_settings(&self) -> PageSettings {
        PageSettings::new(self.config.home_url.clone())
    }

    pub fn view(&self) -> &ViewModeController<P> {
        &self.view
    }

    pub fn window(&self) -> &WindowController<W> {
        &self.window
    }

    pub fn lock(&self) -> &InteractionLock<O> {
        &self.lock
    }

    pub fn attach_window(&mut self, window: W) {
        self.window.attach(window);
    }

    pub fn attach_page(&mut self, page: P) {
        self.view.attach_page(page);
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            mode: self.mode.get(),
            preset: self.presets.get(),
            locked: self.lock.is_locked(),
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn handle_command(&mut self, command: Command, now: Instant) {
        match command {
            Command::SetPreset(preset) => self.window.apply(preset, now, &mut self.timers),
            Command::SetViewMode(ViewMode::FullVideo) => {
                self.view.request_full_video(now, &mut self.timers)
            }
            Command::SetViewMode(ViewMode::Original) => self.view.restore(),
            Command::ToggleLock => self.lock.toggle(self.view.page()),
            Command::ToolbarReady => debug!("Toolbar ready"),
            Command::Input(event) => {
                if self.lock.absorb(event) == InputDisposition::PassThrough {
                    debug!("Overlay reported {:?} while unlocked", event);
                }
            }
            Command::Unknown(message) => warn!("Unknown command: {}", message),
        }
    }

    pub fn handle_page_event(&mut self, event: PageEvent, now: Instant) {
        match event {
            PageEvent::NavigationStarted { url } => {
                debug!("Navigation started: {}", url);
                self.watchdog.set_loading(true, now);
            }
            PageEvent::NavigationFinished { url } => {
                info!("Navigation finished: {}", url);
                self.watchdog.set_loading(false, now);
                self.view.on_navigation_finished(now, &mut self.timers);
            }
            PageEvent::ScriptResult { call, result } => {
                if self.watchdog.answered(call) {
                    trace!("Heartbeat {} answered", call);
                    return;
                }
                if !self
                    .view
                    .handle_script_result(call, result, now, &mut self.timers)
                {
                    debug!("Dropping result for unknown {}", call);
                }
            }
            PageEvent::ProcessTerminated => {
                self.watchdog.reset(now);
                self.view.on_process_terminated();
            }
        }
    }

    pub fn on_window_resized(&mut self) {
        self.window.on_resized();
    }

    /// Run every timer due at `now`.
    pub fn fire_due(&mut self, now: Instant) {
        for timer in self.timers.pop_due(now) {
            match timer {
                ShellTimer::PollPage => self.view.poll_page(now, &mut self.timers),
                ShellTimer::RetryApply => self.view.retry_apply(now, &mut self.timers),
                ShellTimer::Refit => {
                    if self.mode.is_full_video() {
                        self.view.request_full_video(now, &mut self.timers);
                    }
                }
                ShellTimer::Heartbeat => self.heartbeat(now),
            }
        }
    }

    fn heartbeat(&mut self, now: Instant) {
        match self.watchdog.tick(now) {
            WatchdogAction::Idle => {}
            WatchdogAction::Ping => {
                if let Some(page) = self.view.page() {
                    let call = self.calls.next();
                    match page.evaluate(call, scripts::PING) {
                        Ok(()) => self.watchdog.sent(call, now),
                        Err(e) => debug!("Heartbeat not sent: {}", e),
                    }
                }
            }
            WatchdogAction::Unresponsive => {
                self.handle_page_event(PageEvent::ProcessTerminated, now)
            }
        }
        let interval = self.watchdog.config().ping_interval;
        self.timers.schedule(now, interval, ShellTimer::Heartbeat);
    }
}

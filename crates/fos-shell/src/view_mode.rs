//! View Mode Controller
//!
//! Switches the page between its own layout and full video. Full video is
//! applied by a page-side script that either restyles a watch page so the
//! player fills the viewport, or reports where the video sits so the host
//! can zoom the whole page view onto it.
//!
//! Requests survive a missing page view: `pending_apply` stays set and the
//! controller polls until a page is attached. A failed apply is retried
//! exactly once.

use crate::config::FullVideoConfig;
use crate::error::PageError;
use crate::mode::{ModeStore, ViewMode};
use crate::page::{
    parse_flag, ApplyOutcome, CallId, CallIds, PageView, Rect, ScriptReport, Size,
};
use crate::scripts;
use crate::shell::ShellTimer;
use crate::timer::TimerQueue;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const FIRST_ATTEMPT: u8 = 0;
const LAST_ATTEMPT: u8 = 1;

/// A page call whose answer we are waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageCall {
    Apply { attempt: u8 },
    Align,
    Sync { issued_in: ViewMode },
}

/// Host zoom that makes `target` cover `viewport`, with margin and clamp.
pub fn fit_zoom(viewport: Size, target: Size, config: &FullVideoConfig) -> f64 {
    let fit = (viewport.width / target.width).max(viewport.height / target.height);
    let zoom = fit * config.zoom_margin;
    if !zoom.is_finite() {
        return config.min_zoom;
    }
    zoom.max(config.min_zoom).min(config.max_zoom)
}

pub struct ViewModeController<P> {
    page: Option<P>,
    mode: ModeStore,
    calls: CallIds,
    config: FullVideoConfig,
    pending_apply: bool,
    poll_scheduled: bool,
    in_flight: HashMap<CallId, PageCall>,
}

impl<P: PageView> ViewModeController<P> {
    pub fn new(mode: ModeStore, calls: CallIds, config: FullVideoConfig) -> Self {
        Self {
            page: None,
            mode,
            calls,
            config,
            pending_apply: false,
            poll_scheduled: false,
            in_flight: HashMap::new(),
        }
    }

    /// Hand the controller its page view.
    pub fn attach_page(&mut self, page: P) {
        if self.mode.is_full_video() {
            page.set_scroll_enabled(false);
        }
        self.page = Some(page);
        debug!("Page view attached");
    }

    pub fn page(&self) -> Option<&P> {
        self.page.as_ref()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending_apply
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Switch to full video and apply it as soon as possible.
    pub fn request_full_video(&mut self, now: Instant, timers: &mut TimerQueue<ShellTimer>) {
        info!("Full video requested");
        self.mode.set(ViewMode::FullVideo);
        self.pending_apply = true;
        if let Some(page) = &self.page {
            page.set_scroll_enabled(false);
        }
        self.apply(FIRST_ATTEMPT, now, timers);
    }

    /// Go back to the page's own layout. Best effort, never retried.
    pub fn restore(&mut self) {
        info!("Restoring original layout");
        self.mode.set(ViewMode::Original);
        self.pending_apply = false;
        let Some(page) = &self.page else {
            return;
        };
        page.set_scroll_enabled(true);
        if let Err(e) = page.set_zoom(1.0, page.viewport().center()) {
            warn!("Failed to reset zoom: {}", e);
        }
        page.evaluate_detached(&scripts::cleanup_full_video());
    }

    /// Ask the page whether it is already in full video and mirror that.
    pub fn sync_from_page(&mut self) {
        let Some(page) = &self.page else {
            return;
        };
        let call = self.calls.next();
        match page.evaluate(call, &scripts::read_view_mode()) {
            Ok(()) => {
                self.in_flight.insert(
                    call,
                    PageCall::Sync {
                        issued_in: self.mode.get(),
                    },
                );
            }
            Err(e) => debug!("Mode sync not sent: {}", e),
        }
    }

    /// A navigation finished: re-apply full video or pick up the page's state.
    pub fn on_navigation_finished(&mut self, now: Instant, timers: &mut TimerQueue<ShellTimer>) {
        if self.mode.is_full_video() {
            self.request_full_video(now, timers);
        } else {
            self.sync_from_page();
        }
    }

    /// The content process died. Reload; full video comes back on the next
    /// navigation-finished.
    pub fn on_process_terminated(&mut self) {
        warn!("Web content process terminated, reloading");
        self.in_flight.clear();
        if let Some(page) = &self.page {
            if let Err(e) = page.reload() {
                error!("Reload failed: {}", e);
            }
        }
    }

    /// The page-view poll fired.
    pub fn poll_page(&mut self, now: Instant, timers: &mut TimerQueue<ShellTimer>) {
        self.poll_scheduled = false;
        self.apply(FIRST_ATTEMPT, now, timers);
    }

    /// The single retry fired.
    pub fn retry_apply(&mut self, now: Instant, timers: &mut TimerQueue<ShellTimer>) {
        if !self.mode.is_full_video() {
            debug!("Full video no longer wanted, dropping retry");
            return;
        }
        self.pending_apply = true;
        self.apply(LAST_ATTEMPT, now, timers);
    }

    /// Route a script answer. Returns `false` if the call was not ours.
    pub fn handle_script_result(
        &mut self,
        call: CallId,
        result: Result<String, PageError>,
        now: Instant,
        timers: &mut TimerQueue<ShellTimer>,
    ) -> bool {
        let Some(kind) = self.in_flight.remove(&call) else {
            return false;
        };
        match kind {
            PageCall::Apply { attempt } => self.finish_apply(attempt, result, now, timers),
            PageCall::Align => match result.and_then(|raw| ScriptReport::parse(&raw)) {
                Ok(report) if report.ok => debug!(
                    "Aligned target, scroll now {:?},{:?}",
                    report.scroll_x, report.scroll_y
                ),
                Ok(report) => warn!("Alignment failed: {}", report.reason),
                Err(e) => warn!("Alignment failed: {}", e),
            },
            PageCall::Sync { issued_in } => self.finish_sync(issued_in, result),
        }
        true
    }

    fn apply(&mut self, attempt: u8, now: Instant, timers: &mut TimerQueue<ShellTimer>) {
        if !self.pending_apply {
            debug!("No full-video apply pending");
            return;
        }
        let Some(page) = &self.page else {
            if !self.poll_scheduled {
                debug!(
                    "Page view not attached, checking again in {:?}",
                    self.config.page_poll_delay
                );
                self.poll_scheduled = true;
                timers.schedule(now, self.config.page_poll_delay, ShellTimer::PollPage);
            }
            return;
        };

        self.pending_apply = false;
        let call = self.calls.next();
        let script = scripts::apply_full_video(self.config.min_target_extent);
        match page.evaluate(call, &script) {
            Ok(()) => {
                debug!("Applying full video ({}, attempt {})", call, attempt);
                self.in_flight.insert(call, PageCall::Apply { attempt });
            }
            Err(e) => self.apply_failed(attempt, e, now, timers),
        }
    }

    fn finish_apply(
        &mut self,
        attempt: u8,
        result: Result<String, PageError>,
        now: Instant,
        timers: &mut TimerQueue<ShellTimer>,
    ) {
        if !self.mode.is_full_video() {
            debug!("Ignoring full-video result after mode change");
            return;
        }
        let outcome = result
            .and_then(|raw| ScriptReport::parse(&raw))
            .and_then(|report| report.into_outcome(self.config.min_target_extent));

        match outcome {
            Err(e) => self.apply_failed(attempt, e, now, timers),
            Ok(ApplyOutcome::CssFill { viewport }) => {
                info!(
                    "Full video applied by page styles ({}x{})",
                    viewport.width, viewport.height
                );
                if let Some(page) = &self.page {
                    if let Err(e) = page.set_zoom(1.0, page.viewport().center()) {
                        warn!("Failed to reset zoom: {}", e);
                    }
                }
            }
            Ok(ApplyOutcome::HostZoom { target, .. }) => self.zoom_onto(target),
        }
    }

    fn zoom_onto(&mut self, target: Rect) {
        let Some(page) = &self.page else {
            return;
        };
        let viewport = page.viewport();
        let zoom = fit_zoom(viewport, target.size, &self.config);
        info!(
            "Full video applied by host zoom {:.3} onto {}x{}",
            zoom, target.size.width, target.size.height
        );
        if let Err(e) = page.set_zoom(zoom, viewport.center()) {
            warn!("Failed to zoom page view: {}", e);
            return;
        }

        let call = self.calls.next();
        match page.evaluate(call, &scripts::align_target(self.config.max_scroll_correction)) {
            Ok(()) => {
                self.in_flight.insert(call, PageCall::Align);
            }
            Err(e) => warn!("Alignment not sent: {}", e),
        }
    }

    fn apply_failed(
        &mut self,
        attempt: u8,
        error: PageError,
        now: Instant,
        timers: &mut TimerQueue<ShellTimer>,
    ) {
        if let PageError::Script {
            stack: Some(stack), ..
        } = &error
        {
            debug!("Page stack: {}", stack);
        }
        if !self.mode.is_full_video() {
            debug!("Full video apply failed after mode change: {}", error);
            return;
        }
        if attempt == FIRST_ATTEMPT {
            warn!(
                "Full video apply failed: {}, retrying in {:?}",
                error, self.config.retry_delay
            );
            timers.schedule(now, self.config.retry_delay, ShellTimer::RetryApply);
        } else {
            warn!("Full video apply failed again: {}, giving up", error);
        }
    }

    fn finish_sync(&mut self, issued_in: ViewMode, result: Result<String, PageError>) {
        let in_full_video = match result.and_then(|raw| parse_flag(&raw)) {
            Ok(flag) => flag,
            Err(e) => {
                debug!("Mode sync failed: {}", e);
                return;
            }
        };
        if self.mode.get() != issued_in || self.pending_apply {
            debug!("View mode changed while syncing, ignoring page state");
            return;
        }
        let mode = if in_full_video {
            ViewMode::FullVideo
        } else {
            ViewMode::Original
        };
        if self.mode.set(mode) != mode {
            info!("Page reports {}, view mode updated", mode);
        }
    }
}

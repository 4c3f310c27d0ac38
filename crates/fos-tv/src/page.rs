//! The embedded site on wry.

use crate::app::UserEvent;
use fos_shell::{scripts, CallId, PageError, PageEvent, PageSettings, PageView, Point, Size};
use std::cell::Cell;
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use tracing::{debug, trace, warn};
use url::Url;
use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

pub struct WryPage {
    webview: WebView,
    proxy: EventLoopProxy<UserEvent>,
    home: Url,
    viewport: Cell<Size>,
}

impl WryPage {
    /// Build the page view as a child of `window`, inside `bounds`.
    pub fn build(
        window: &Window,
        settings: &PageSettings,
        bounds: Rect,
        viewport: Size,
        proxy: EventLoopProxy<UserEvent>,
    ) -> wry::Result<Self> {
        let load_proxy = proxy.clone();
        let webview = WebViewBuilder::new()
            .with_url(settings.url.as_str())
            .with_initialization_script_for_main_only(
                settings.init_script,
                !settings.init_script_all_frames,
            )
            .with_autoplay(settings.autoplay)
            .with_bounds(bounds)
            .with_devtools(cfg!(debug_assertions))
            .with_on_page_load_handler(move |event, url| {
                let event = match event {
                    PageLoadEvent::Started => PageEvent::NavigationStarted { url },
                    PageLoadEvent::Finished => PageEvent::NavigationFinished { url },
                };
                if load_proxy.send_event(UserEvent::Page(event)).is_err() {
                    debug!("Event loop gone, dropping page load event");
                }
            })
            .build_as_child(window)?;

        Ok(Self {
            webview,
            proxy,
            home: settings.url.clone(),
            viewport: Cell::new(viewport),
        })
    }

    pub fn set_bounds(&self, bounds: Rect, viewport: Size) {
        self.viewport.set(viewport);
        if let Err(e) = self.webview.set_bounds(bounds) {
            warn!("Failed to lay out page view: {}", e);
        }
    }
}

impl PageView for WryPage {
    fn evaluate(&self, call: CallId, script: &str) -> Result<(), PageError> {
        let proxy = self.proxy.clone();
        self.webview
            .evaluate_script_with_callback(script, move |raw| {
                let event = PageEvent::ScriptResult {
                    call,
                    result: Ok(raw),
                };
                if proxy.send_event(UserEvent::Page(event)).is_err() {
                    debug!("Event loop gone, dropping result for {}", call);
                }
            })
            .map_err(|e| PageError::Transport(e.to_string()))
    }

    fn evaluate_detached(&self, script: &str) {
        if let Err(e) = self.webview.evaluate_script(script) {
            warn!("Script not sent: {}", e);
        }
    }

    fn set_zoom(&self, factor: f64, anchor: Point) -> Result<(), PageError> {
        // The engine zooms around the viewport origin; the alignment scroll
        // that follows puts the target back in view.
        trace!("Zoom {:.3} requested around {:?}", factor, anchor);
        self.webview
            .zoom(factor)
            .map_err(|e| PageError::Transport(e.to_string()))
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn set_scroll_enabled(&self, enabled: bool) {
        self.evaluate_detached(&scripts::set_scroll_enabled(enabled));
    }

    fn reload(&self) -> Result<(), PageError> {
        let url = match self.webview.url() {
            Ok(url) if url.starts_with("http") => url,
            Ok(_) => self.home.to_string(),
            Err(e) => {
                debug!("Current URL unavailable ({}), loading home", e);
                self.home.to_string()
            }
        };
        debug!("Reloading {}", url);
        self.webview
            .load_url(&url)
            .map_err(|e| PageError::Transport(e.to_string()))
    }

    fn focus(&self) {
        if let Err(e) = self.webview.focus() {
            warn!("Failed to focus page view: {}", e);
        }
    }

    fn resign_focus(&self) {
        if let Err(e) = self.webview.focus_parent() {
            warn!("Page view kept focus: {}", e);
        }
    }
}

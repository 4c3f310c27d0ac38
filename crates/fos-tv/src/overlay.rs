//! Transparent input-absorbing surface over the page view.

use crate::app::UserEvent;
use fos_shell::Overlay;
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use tracing::{debug, warn};
use wry::{Rect, WebView, WebViewBuilder};

/// Swallows every pointer, wheel and key event and reports it to the host.
const OVERLAY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  html, body { margin: 0; width: 100%; height: 100%; background: transparent; cursor: default; }
</style>
</head>
<body tabindex="0">
<script>
  const report = (message) => window.ipc.postMessage(message);
  const swallow = (event) => { event.preventDefault(); event.stopPropagation(); };
  document.addEventListener('mousedown', (e) => { swallow(e); report('input:mousedown:' + e.button); }, true);
  document.addEventListener('mouseup', (e) => { swallow(e); report('input:mouseup:' + e.button); }, true);
  document.addEventListener('mousemove', (e) => {
    if (e.buttons === 0) return;
    swallow(e);
    report('input:mousemove:' + e.button);
  }, true);
  document.addEventListener('wheel', (e) => { swallow(e); report('input:wheel'); }, { capture: true, passive: false });
  document.addEventListener('keydown', (e) => { swallow(e); report('input:keydown'); }, true);
  document.addEventListener('keyup', swallow, true);
  document.addEventListener('contextmenu', swallow, true);
  document.addEventListener('dblclick', swallow, true);
</script>
</body>
</html>"#;

pub struct WryOverlay {
    webview: WebView,
}

impl WryOverlay {
    pub fn build(
        window: &Window,
        bounds: Rect,
        proxy: EventLoopProxy<UserEvent>,
    ) -> wry::Result<Self> {
        let webview = WebViewBuilder::new()
            .with_html(OVERLAY_HTML)
            .with_transparent(true)
            .with_visible(false)
            .with_bounds(bounds)
            .with_ipc_handler(move |message| {
                if proxy
                    .send_event(UserEvent::Command(message.body().clone()))
                    .is_err()
                {
                    debug!("Event loop gone, dropping overlay input");
                }
            })
            .build_as_child(window)?;
        Ok(Self { webview })
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Err(e) = self.webview.set_bounds(bounds) {
            warn!("Failed to lay out overlay: {}", e);
        }
    }
}

impl Overlay for WryOverlay {
    fn set_visible(&self, visible: bool) {
        if let Err(e) = self.webview.set_visible(visible) {
            warn!("Failed to show overlay: {}", e);
        }
    }

    fn focus(&self) {
        if let Err(e) = self.webview.focus() {
            warn!("Failed to focus overlay: {}", e);
        }
    }
}

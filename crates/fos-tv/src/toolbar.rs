//! Player Size / View Mode / Lock controls above the page.
//!
//! The toolbar posts "size:<key>", "mode:<key>" and "lock:toggle" over IPC
//! and renders whatever state the host pushes back.

use crate::app::UserEvent;
use fos_shell::ToolbarState;
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use tracing::{debug, warn};
use wry::{Rect, WebView, WebViewBuilder};

const TOOLBAR_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  html, body { margin: 0; height: 100%; overflow: hidden; user-select: none; }
  body {
    display: flex; align-items: center; gap: 14px; padding: 0 10px;
    background: #1c1c1e; color: #d1d1d6;
    font: 12px -apple-system, "Segoe UI", Cantarell, sans-serif;
  }
  .group { display: flex; align-items: center; gap: 4px; }
  .group > span { margin-right: 4px; color: #8e8e93; }
  button {
    border: 1px solid #3a3a3c; border-radius: 4px; padding: 3px 8px;
    background: #2c2c2e; color: inherit; font: inherit; cursor: pointer;
  }
  button.active { background: #0a84ff; border-color: #0a84ff; color: #fff; }
  #lock { margin-left: auto; }
</style>
</head>
<body>
  <div class="group"><span>Player Size</span>
    <button data-size="small">Small (640x360)</button>
    <button data-size="medium">Medium (960x540)</button>
    <button data-size="large">Large (1280x720)</button>
  </div>
  <div class="group"><span>View Mode</span>
    <button data-mode="original">Original Layout</button>
    <button data-mode="full-video">Full Video</button>
  </div>
  <button id="lock">Lock</button>
<script>
  const send = (message) => window.ipc.postMessage(message);
  document.querySelectorAll('[data-size]').forEach((b) =>
    b.addEventListener('click', () => send('size:' + b.dataset.size)));
  document.querySelectorAll('[data-mode]').forEach((b) =>
    b.addEventListener('click', () => send('mode:' + b.dataset.mode)));
  document.getElementById('lock').addEventListener('click', () => send('lock:toggle'));

  window.fosToolbar = {
    update(state) {
      document.querySelectorAll('[data-size]').forEach((b) =>
        b.classList.toggle('active', b.dataset.size === state.preset));
      document.querySelectorAll('[data-mode]').forEach((b) =>
        b.classList.toggle('active', b.dataset.mode === state.mode));
      const lock = document.getElementById('lock');
      lock.textContent = state.locked ? 'Unlock' : 'Lock';
      lock.classList.toggle('active', state.locked);
    },
  };
  send('toolbar:ready');
</script>
</body>
</html>"#;

pub struct Toolbar {
    webview: WebView,
    shown: Option<ToolbarState>,
}

impl Toolbar {
    pub fn build(
        window: &Window,
        bounds: Rect,
        proxy: EventLoopProxy<UserEvent>,
    ) -> wry::Result<Self> {
        let webview = WebViewBuilder::new()
            .with_html(TOOLBAR_HTML)
            .with_bounds(bounds)
            .with_ipc_handler(move |message| {
                if proxy
                    .send_event(UserEvent::Command(message.body().clone()))
                    .is_err()
                {
                    debug!("Event loop gone, dropping toolbar command");
                }
            })
            .build_as_child(window)?;
        Ok(Self {
            webview,
            shown: None,
        })
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Err(e) = self.webview.set_bounds(bounds) {
            warn!("Failed to lay out toolbar: {}", e);
        }
    }

    /// Render `state` unless it is already shown. `force` re-renders after
    /// the toolbar (re)loaded.
    pub fn show(&mut self, state: ToolbarState, force: bool) {
        if !force && self.shown == Some(state) {
            return;
        }
        let json = match serde_json::to_string(&state) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode toolbar state: {}", e);
                return;
            }
        };
        let script = format!("window.fosToolbar && window.fosToolbar.update({json})");
        match self.webview.evaluate_script(&script) {
            Ok(()) => self.shown = Some(state),
            Err(e) => warn!("Failed to update toolbar: {}", e),
        }
    }
}

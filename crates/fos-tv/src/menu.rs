//! Native app menu: Player Size and View Mode.
//!
//! Item ids are the command strings themselves, so menu clicks go through
//! the same parser as toolbar messages.

use crate::app::UserEvent;
use anyhow::Result;
use fos_shell::{ToolbarState, ViewMode, WindowSizePreset};
use muda::{CheckMenuItem, Menu, MenuEvent, Submenu};
use std::sync::Mutex;
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use tracing::debug;

const MODES: [ViewMode; 2] = [ViewMode::Original, ViewMode::FullVideo];

/// Menu item id for a command.
fn size_id(preset: WindowSizePreset) -> String {
    format!("size:{}", preset.key())
}

fn mode_id(mode: ViewMode) -> String {
    format!("mode:{}", mode.key())
}

pub struct AppMenu {
    // Keeps the native menu alive.
    _menu: Menu,
    sizes: Vec<(WindowSizePreset, CheckMenuItem)>,
    modes: Vec<(ViewMode, CheckMenuItem)>,
    shown: Option<ToolbarState>,
}

impl AppMenu {
    pub fn build(window: &Window, proxy: EventLoopProxy<UserEvent>) -> Result<Self> {
        let menu = Menu::new();

        #[cfg(target_os = "macos")]
        {
            let app = Submenu::new("fOS-TV", true);
            app.append(&muda::PredefinedMenuItem::quit(None))?;
            menu.append(&app)?;
        }

        let size_menu = Submenu::new("Player Size", true);
        let mut sizes = Vec::new();
        for preset in WindowSizePreset::ALL {
            let item = CheckMenuItem::with_id(
                size_id(preset),
                preset.to_string(),
                true,
                preset == WindowSizePreset::default(),
                None,
            );
            size_menu.append(&item)?;
            sizes.push((preset, item));
        }

        let mode_menu = Submenu::new("View Mode", true);
        let mut modes = Vec::new();
        for mode in MODES {
            let item = CheckMenuItem::with_id(
                mode_id(mode),
                mode.label(),
                true,
                mode == ViewMode::default(),
                None,
            );
            mode_menu.append(&item)?;
            modes.push((mode, item));
        }

        menu.append(&size_menu)?;
        menu.append(&mode_menu)?;
        attach(&menu, window)?;

        let proxy = Mutex::new(proxy);
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            let sent = proxy
                .lock()
                .map(|proxy| proxy.send_event(UserEvent::Command(event.id.0.clone())).is_ok());
            if !matches!(sent, Ok(true)) {
                debug!("Event loop gone, dropping menu command");
            }
        }));

        Ok(Self {
            _menu: menu,
            sizes,
            modes,
            shown: None,
        })
    }

    /// Check the entries matching `state`. Clicking a check item flips it
    /// natively, so `force` re-syncs after every command.
    pub fn show(&mut self, state: ToolbarState, force: bool) {
        if !force && self.shown == Some(state) {
            return;
        }
        for (preset, item) in &self.sizes {
            item.set_checked(*preset == state.preset);
        }
        for (mode, item) in &self.modes {
            item.set_checked(*mode == state.mode);
        }
        self.shown = Some(state);
    }
}

#[cfg(target_os = "macos")]
fn attach(menu: &Menu, _window: &Window) -> Result<()> {
    menu.init_for_nsapp();
    Ok(())
}

#[cfg(target_os = "windows")]
fn attach(menu: &Menu, window: &Window) -> Result<()> {
    use tao::platform::windows::WindowExtWindows;
    // SAFETY: the handle belongs to a live window owned by this thread.
    unsafe { menu.init_for_hwnd(window.hwnd() as _)? };
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn attach(_menu: &Menu, _window: &Window) -> Result<()> {
    // A GTK menu bar would sit under the child webviews, which are laid out
    // in window coordinates; the toolbar carries the same entries here.
    tracing::info!("Native menu bar not attached on this platform, using the toolbar");
    Ok(())
}

//! Event loop and surface layout.
//!
//! The window holds three child webviews stacked top to bottom in creation
//! order: the page, the lock overlay above it, and the toolbar strip. The
//! native menu mirrors the toolbar's Player Size and View Mode entries.

use crate::menu::AppMenu;
use crate::overlay::WryOverlay;
use crate::page::WryPage;
use crate::toolbar::Toolbar;
use crate::window::TaoWindow;
use anyhow::{Context, Result, bail};
use fos_shell::{Command, PageEvent, PageSettings, Shell, ShellConfig, Size, WindowSizePreset};
use std::rc::Rc;
use std::time::Instant;
use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::window::{Window, WindowBuilder};
use tracing::info;
use wry::dpi::{LogicalPosition, LogicalSize as BoundsSize};
use wry::Rect;

/// Events posted to the loop from webview callbacks.
#[derive(Debug)]
pub enum UserEvent {
    Page(PageEvent),
    /// Raw IPC message from the toolbar or overlay, or a menu item id
    Command(String),
}

/// Toolbar strip and page area for the current window size.
struct Layout {
    toolbar: Rect,
    page: Rect,
    viewport: Size,
}

impl Layout {
    fn of(window: &Window, toolbar_height: f64) -> Self {
        let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
        let viewport = Size::new(size.width, (size.height - toolbar_height).max(0.0));
        Self {
            toolbar: Rect {
                position: LogicalPosition::new(0.0, 0.0).into(),
                size: BoundsSize::new(size.width, toolbar_height).into(),
            },
            page: Rect {
                position: LogicalPosition::new(0.0, toolbar_height).into(),
                size: BoundsSize::new(viewport.width, viewport.height).into(),
            },
            viewport,
        }
    }
}

/// Child webviews need X11 on Linux; a Wayland-only session cannot host them.
fn x11_available(wayland_display: bool, x11_display: bool) -> bool {
    x11_display || !wayland_display
}

/// Fail early with a clear message instead of a webview build error.
fn ensure_child_webviews_supported() -> Result<()> {
    if cfg!(target_os = "linux")
        && !x11_available(
            std::env::var_os("WAYLAND_DISPLAY").is_some(),
            std::env::var_os("DISPLAY").is_some(),
        )
    {
        bail!("fOS-TV needs an X11 display (XWayland) for its embedded webviews");
    }
    Ok(())
}

pub fn run(config: ShellConfig) -> Result<()> {
    info!("Config: {}", serde_json::to_string(&config)?);
    ensure_child_webviews_supported()?;

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let initial = WindowSizePreset::default().size();
    let window = Rc::new(
        WindowBuilder::new()
            .with_title("fOS-TV")
            .with_inner_size(LogicalSize::new(initial.width, initial.height))
            .with_resizable(false)
            .with_focused(true)
            .build(&event_loop)?,
    );

    let toolbar_height = config.toolbar_height;
    let layout = Layout::of(&window, toolbar_height);
    let settings = PageSettings::new(config.home_url.clone());

    let page = WryPage::build(&window, &settings, layout.page, layout.viewport, proxy.clone())
        .context("creating page view")?;
    let overlay =
        WryOverlay::build(&window, layout.page, proxy.clone()).context("creating overlay")?;
    let mut toolbar =
        Toolbar::build(&window, layout.toolbar, proxy.clone()).context("creating toolbar")?;
    let mut menu = AppMenu::build(&window, proxy).context("creating app menu")?;

    let mut shell = Shell::new(config, overlay, Instant::now());
    shell.attach_page(page);
    shell.attach_window(TaoWindow::new(Rc::clone(&window)));
    info!("Loading {}", settings.url);

    event_loop.run(move |event, _, control_flow| {
        let now = Instant::now();
        let mut force_toolbar = false;
        let mut force_menu = false;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("fOS-TV shutting down");
                *control_flow = ControlFlow::Exit;
                return;
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. },
                ..
            } => {
                shell.on_window_resized();
                let layout = Layout::of(&window, toolbar_height);
                toolbar.set_bounds(layout.toolbar);
                if let Some(page) = shell.view().page() {
                    page.set_bounds(layout.page, layout.viewport);
                }
                shell.lock().overlay().set_bounds(layout.page);
            }
            Event::UserEvent(UserEvent::Page(event)) => shell.handle_page_event(event, now),
            Event::UserEvent(UserEvent::Command(message)) => {
                let command = Command::parse(&message);
                force_toolbar = command == Command::ToolbarReady;
                force_menu = true;
                shell.handle_command(command, now);
            }
            _ => {}
        }

        shell.fire_due(now);
        toolbar.show(shell.toolbar_state(), force_toolbar);
        menu.show(shell.toolbar_state(), force_menu);

        *control_flow = match shell.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    })
}

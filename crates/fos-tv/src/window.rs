//! tao window as the shell's host window.

use fos_shell::{Frame, HostWindow, Point, Size, WindowChrome};
use std::rc::Rc;
use tao::dpi::{LogicalPosition, LogicalSize};
use tao::window::{Window, WindowId};
use tracing::debug;

/// One native frame change.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FrameOp {
    Resize(Size),
    PlaceTopLeft(Point),
}

/// Native calls for moving to `frame`, in issue order.
///
/// On macOS both calls are queued and a content resize keeps the
/// bottom-left corner, so the top-left placement must run last to keep the
/// top edge in place.
fn frame_ops(frame: Frame) -> [FrameOp; 2] {
    [FrameOp::Resize(frame.size), FrameOp::PlaceTopLeft(frame.origin)]
}

pub struct TaoWindow {
    window: Rc<Window>,
}

impl TaoWindow {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl HostWindow for TaoWindow {
    type Id = WindowId;

    fn id(&self) -> WindowId {
        self.window.id()
    }

    fn frame(&self) -> Frame {
        let scale = self.window.scale_factor();
        let origin = match self.window.outer_position() {
            Ok(position) => {
                let position: LogicalPosition<f64> = position.to_logical(scale);
                Point::new(position.x, position.y)
            }
            Err(_) => Point::default(),
        };
        let size: LogicalSize<f64> = self.window.inner_size().to_logical(scale);
        Frame {
            origin,
            size: Size::new(size.width, size.height),
        }
    }

    fn set_frame(&self, frame: Frame) {
        for op in frame_ops(frame) {
            match op {
                FrameOp::Resize(size) => self
                    .window
                    .set_inner_size(LogicalSize::new(size.width, size.height)),
                FrameOp::PlaceTopLeft(origin) => self
                    .window
                    .set_outer_position(LogicalPosition::new(origin.x, origin.y)),
            }
        }
    }

    fn configure(&self, chrome: &WindowChrome) {
        self.window.set_resizable(chrome.resizable);
        self.window.set_maximizable(chrome.maximizable);
        if !chrome.fullscreen {
            self.window.set_fullscreen(None);
            // Only leaves fullscreen; tao cannot opt the window out of it.
            debug!("Fullscreen participation left to the platform default");
        }
        if !chrome.show_title {
            self.window.set_title("");
        }
        if chrome.move_to_active_space {
            // No tao API for space/workspace collection behavior.
            debug!("Move-to-active-space left to the platform default");
        }
    }
}

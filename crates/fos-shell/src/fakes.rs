//! Recording test doubles for the native surfaces.

use crate::blocker::Overlay;
use crate::error::PageError;
use crate::page::{CallId, PageView, Point, Size};
use crate::window::{Frame, HostWindow, WindowChrome};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct PageLog {
    pub calls: Vec<(CallId, String)>,
    pub detached: Vec<String>,
    pub zooms: Vec<(f64, Point)>,
    pub scroll_enabled: Vec<bool>,
    pub reloads: usize,
    pub focused: bool,
    pub focus_calls: usize,
    pub resign_calls: usize,
}

/// Page view double. Clones share one log so tests can keep a handle
/// after handing the page to a controller.
#[derive(Debug, Clone)]
pub struct FakePage {
    log: Rc<RefCell<PageLog>>,
    viewport: Size,
    refuse: Rc<Cell<bool>>,
}

impl FakePage {
    pub fn new(viewport: Size) -> Self {
        Self {
            log: Rc::default(),
            viewport,
            refuse: Rc::default(),
        }
    }

    /// Make `evaluate` fail before the call leaves the host.
    pub fn refuse_calls(&self, refuse: bool) {
        self.refuse.set(refuse);
    }

    pub fn log(&self) -> std::cell::Ref<'_, PageLog> {
        self.log.borrow()
    }

    /// Ids of evaluated calls whose script contains `needle`.
    pub fn calls_with(&self, needle: &str) -> Vec<CallId> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter(|(_, script)| script.contains(needle))
            .map(|(call, _)| *call)
            .collect()
    }

    pub fn last_zoom(&self) -> Option<f64> {
        self.log.borrow().zooms.last().map(|(zoom, _)| *zoom)
    }
}

impl PageView for FakePage {
    fn evaluate(&self, call: CallId, script: &str) -> Result<(), PageError> {
        if self.refuse.get() {
            return Err(PageError::Transport(String::from("refused")));
        }
        self.log.borrow_mut().calls.push((call, script.to_string()));
        Ok(())
    }

    fn evaluate_detached(&self, script: &str) {
        self.log.borrow_mut().detached.push(script.to_string());
    }

    fn set_zoom(&self, factor: f64, anchor: Point) -> Result<(), PageError> {
        self.log.borrow_mut().zooms.push((factor, anchor));
        Ok(())
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn set_scroll_enabled(&self, enabled: bool) {
        self.log.borrow_mut().scroll_enabled.push(enabled);
    }

    fn reload(&self) -> Result<(), PageError> {
        self.log.borrow_mut().reloads += 1;
        Ok(())
    }

    fn focus(&self) {
        let mut log = self.log.borrow_mut();
        log.focused = true;
        log.focus_calls += 1;
    }

    fn resign_focus(&self) {
        let mut log = self.log.borrow_mut();
        log.focused = false;
        log.resign_calls += 1;
    }
}

#[derive(Debug, Default)]
pub struct WindowLog {
    pub frame: Frame,
    pub configured: Vec<WindowChrome>,
    pub set_frames: Vec<Frame>,
}

/// Host window double with a fixed identity.
#[derive(Debug, Clone)]
pub struct FakeWindow {
    id: u32,
    log: Rc<RefCell<WindowLog>>,
}

impl FakeWindow {
    pub fn new(id: u32, frame: Frame) -> Self {
        Self {
            id,
            log: Rc::new(RefCell::new(WindowLog {
                frame,
                ..Default::default()
            })),
        }
    }

    pub fn log(&self) -> std::cell::Ref<'_, WindowLog> {
        self.log.borrow()
    }

    /// Simulate a resize that did not come from the controller.
    pub fn resize_externally(&self, size: Size) {
        self.log.borrow_mut().frame.size = size;
    }
}

impl HostWindow for FakeWindow {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn frame(&self) -> Frame {
        self.log.borrow().frame
    }

    fn set_frame(&self, frame: Frame) {
        let mut log = self.log.borrow_mut();
        log.frame = frame;
        log.set_frames.push(frame);
    }

    fn configure(&self, chrome: &WindowChrome) {
        self.log.borrow_mut().configured.push(chrome.clone());
    }
}

/// Overlay double.
#[derive(Debug, Clone, Default)]
pub struct FakeOverlay {
    pub visible: Rc<Cell<bool>>,
    pub focus_calls: Rc<Cell<usize>>,
}

impl Overlay for FakeOverlay {
    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn focus(&self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
    }
}

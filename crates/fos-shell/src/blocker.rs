//! Interaction Blocker
//!
//! While locked, a full-bounds overlay sits above the page and absorbs every
//! pointer, scroll and key event so nothing reaches the site.

use crate::page::PageView;
#[cfg(test)]
use crate::page::Point;
use crate::scripts;
use tracing::{info, trace};

/// Input-absorbing surface placed over the page view.
pub trait Overlay {
    fn set_visible(&self, visible: bool);

    /// Become the keyboard target.
    fn focus(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other(u16),
}

impl PointerButton {
    /// From a DOM `MouseEvent.button` value.
    pub fn from_dom(button: u16) -> Self {
        match button {
            0 => Self::Primary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Input reaching the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MouseDown(PointerButton),
    MouseDragged(PointerButton),
    MouseUp(PointerButton),
    Scroll,
    KeyDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    Swallowed,
    PassThrough,
}

pub struct InteractionLock<O> {
    overlay: O,
    locked: bool,
    swallowed: u64,
}

impl<O: Overlay> InteractionLock<O> {
    pub fn new(overlay: O) -> Self {
        overlay.set_visible(false);
        Self {
            overlay,
            locked: false,
            swallowed: 0,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Events absorbed since the shell started.
    pub fn swallowed(&self) -> u64 {
        self.swallowed
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn toggle<P: PageView>(&mut self, page: Option<&P>) {
        self.set_locked(!self.locked, page);
    }

    /// Show or hide the overlay and move keyboard focus accordingly.
    pub fn set_locked<P: PageView>(&mut self, locked: bool, page: Option<&P>) {
        if locked == self.locked {
            return;
        }
        self.locked = locked;
        if locked {
            info!("Interaction locked");
            if let Some(page) = page {
                page.resign_focus();
                page.evaluate_detached(&scripts::blur_active_element());
            }
            self.overlay.set_visible(true);
            self.overlay.focus();
        } else {
            info!("Interaction unlocked");
            self.overlay.set_visible(false);
            if let Some(page) = page {
                page.focus();
            }
        }
    }

    /// Whether the overlay claims `point`. Every point is a hit while shown;
    /// at runtime the overlay webview covering the page bounds does this.
    #[cfg(test)]
    pub(crate) fn hit_test(&self, _point: Point) -> bool {
        self.locked
    }

    /// Dispose of an input event that reached the overlay.
    pub fn absorb(&mut self, event: InputEvent) -> InputDisposition {
        if !self.locked {
            return InputDisposition::PassThrough;
        }
        self.swallowed += 1;
        trace!("Swallowed {:?}", event);
        InputDisposition::Swallowed
    }
}

//! View mode shared between the controller and the toolbar.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// How the embedded page is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// The site's own layout, untouched
    #[default]
    Original,
    /// The video fills the whole window
    FullVideo,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [Self::Original, Self::FullVideo];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Original => "Original Layout",
            Self::FullVideo => "Full Video",
        }
    }

    /// Short identifier used by the command surface.
    pub fn key(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::FullVideo => "full-video",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }

    pub fn is_full_video(self) -> bool {
        self == Self::FullVideo
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared current view mode. Clones are handles to the same value.
#[derive(Debug, Clone, Default)]
pub struct ModeStore {
    inner: Rc<Cell<ViewMode>>,
}

impl ModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ViewMode {
        self.inner.get()
    }

    /// Set the mode, returning the previous one.
    pub fn set(&self, mode: ViewMode) -> ViewMode {
        self.inner.replace(mode)
    }

    pub fn is_full_video(&self) -> bool {
        self.get().is_full_video()
    }
}

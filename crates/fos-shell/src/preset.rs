//! Player size presets.
//!
//! The window can only take one of three fixed content sizes. Manual
//! resizes (or a window restored at an odd size) are mapped back to the
//! closest preset so the toolbar always shows a meaningful selection.

use crate::page::Size;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Fixed player sizes offered under "Player Size".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSizePreset {
    /// 640x360
    Small,
    /// 960x540
    #[default]
    Medium,
    /// 1280x720
    Large,
}

impl WindowSizePreset {
    /// All presets in menu order. Ties in `nearest` resolve to the earlier entry.
    pub const ALL: [WindowSizePreset; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Content size of the preset in logical units.
    pub fn size(self) -> Size {
        match self {
            Self::Small => Size::new(640.0, 360.0),
            Self::Medium => Size::new(960.0, 540.0),
            Self::Large => Size::new(1280.0, 720.0),
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    /// Short identifier used by the command surface.
    pub fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Parse a command-surface identifier.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }

    /// Summed absolute width and height delta to `size`.
    pub fn distance(self, size: Size) -> f64 {
        let target = self.size();
        (size.width - target.width).abs() + (size.height - target.height).abs()
    }

    /// Whether `size` matches this preset within `tolerance` on each axis.
    pub fn matches(self, size: Size, tolerance: f64) -> bool {
        let target = self.size();
        (size.width - target.width).abs() <= tolerance
            && (size.height - target.height).abs() <= tolerance
    }

    /// Preset closest to `size` among all presets.
    pub fn nearest(size: Size) -> Self {
        Self::nearest_in(&Self::ALL, size)
    }

    /// Preset closest to `size` among `candidates`.
    ///
    /// Ties keep the first candidate. Falls back to `Medium` when there is
    /// nothing to compare (no candidates, or every distance is NaN).
    pub fn nearest_in(candidates: &[Self], size: Size) -> Self {
        let mut best: Option<(Self, f64)> = None;
        for &preset in candidates {
            let delta = preset.distance(size);
            if delta.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, best_delta)| delta < best_delta) {
                best = Some((preset, delta));
            }
        }
        best.map(|(preset, _)| preset).unwrap_or_default()
    }

    /// Whether `size` matches any preset within `tolerance`.
    pub fn any_matches(size: Size, tolerance: f64) -> bool {
        Self::ALL.into_iter().any(|preset| preset.matches(size, tolerance))
    }
}

impl fmt::Display for WindowSizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(f, "{} ({}x{})", self.label(), size.width, size.height)
    }
}

/// Shared "current preset" indicator.
///
/// Cloning yields another handle to the same value. Only touched on the UI
/// thread.
#[derive(Debug, Clone, Default)]
pub struct PresetStore {
    inner: Rc<Cell<WindowSizePreset>>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> WindowSizePreset {
        self.inner.get()
    }

    pub fn set(&self, preset: WindowSizePreset) {
        self.inner.set(preset);
    }
}

//! Embedded page view contract.
//!
//! The page is a third-party site running in the platform browser engine.
//! The shell talks to it only by evaluating scripts: a call is sent with a
//! `CallId` and its answer comes back later as `PageEvent::ScriptResult` on
//! the UI thread, or never.

use crate::error::PageError;
use crate::scripts;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use url::Url;

/// Logical size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Logical point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Logical rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// Identifies one in-flight page-side call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub u64);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call({})", self.0)
    }
}

/// Shared call-id allocator. Every component issuing page calls draws from
/// the same counter so results can be routed by id alone.
#[derive(Debug, Clone, Default)]
pub struct CallIds {
    next: Rc<Cell<u64>>,
}

impl CallIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> CallId {
        let id = self.next.get() + 1;
        self.next.set(id);
        CallId(id)
    }
}

/// Host-side handle to the embedded page.
///
/// Implementations must deliver the answer to `evaluate` as
/// `PageEvent::ScriptResult` with the same call id. Errors returned
/// directly mean the call never left the host.
pub trait PageView {
    /// Run `script` in the main frame; the last expression's value is the result.
    fn evaluate(&self, call: CallId, script: &str) -> Result<(), PageError>;

    /// Run `script` and ignore whatever it returns.
    fn evaluate_detached(&self, script: &str);

    /// Magnify the page view by `factor` around `anchor` (view coordinates).
    fn set_zoom(&self, factor: f64, anchor: Point) -> Result<(), PageError>;

    /// Visible size of the page view.
    fn viewport(&self) -> Size;

    /// Enable or disable native scrolling affordances.
    fn set_scroll_enabled(&self, enabled: bool);

    /// Reload the current document.
    fn reload(&self) -> Result<(), PageError>;

    /// Make the page view the keyboard target.
    fn focus(&self);

    /// Stop being the keyboard target.
    fn resign_focus(&self);
}

/// Notifications from the embedded page, delivered on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A navigation began
    NavigationStarted { url: String },
    /// A navigation completed
    NavigationFinished { url: String },
    /// Answer to `PageView::evaluate`
    ScriptResult {
        call: CallId,
        result: Result<String, PageError>,
    },
    /// The engine's content process is gone
    ProcessTerminated,
}

/// How the page view must be built.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub url: Url,
    /// Media may start without a prior user gesture
    pub autoplay: bool,
    /// Injected at document start
    pub init_script: &'static str,
    /// Inject `init_script` into nested frames too, not just the main frame
    pub init_script_all_frames: bool,
}

impl PageSettings {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            autoplay: true,
            init_script: scripts::FULLSCREEN_GUARD,
            init_script_all_frames: true,
        }
    }
}

/// Structured result returned by the page-side full-video scripts.
///
/// Field names are the wire contract with the scripts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub scroll_x: Option<f64>,
    pub scroll_y: Option<f64>,
    pub use_native_zoom: Option<bool>,
    pub stack: Option<String>,
    /// Number of leftovers removed by the cleanup routine
    pub removed: Option<u32>,
}

/// What the host should do with an apply report.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Page CSS already fills the view
    CssFill { viewport: Size },
    /// Host must zoom onto `target` (page coordinates)
    HostZoom { target: Rect, scroll: Point },
}

impl ScriptReport {
    /// Decode a raw script answer.
    ///
    /// Scripts return `JSON.stringify(...)`; engines that JSON-encode the
    /// returned value hand back a quoted string, so one level of string
    /// wrapping is unwrapped.
    pub fn parse(raw: &str) -> Result<Self, PageError> {
        let value = unwrap_json(raw)?;
        serde_json::from_value(value).map_err(|e| PageError::Malformed(e.to_string()))
    }

    /// Convert a report into an apply outcome, rejecting degenerate geometry.
    pub fn into_outcome(self, min_extent: f64) -> Result<ApplyOutcome, PageError> {
        if !self.ok {
            let reason = if self.reason.is_empty() {
                String::from("unknown")
            } else {
                self.reason
            };
            return Err(PageError::Script {
                reason,
                stack: self.stack,
            });
        }

        match self.use_native_zoom {
            Some(false) => Ok(ApplyOutcome::CssFill {
                viewport: Size::new(
                    self.width.unwrap_or_default(),
                    self.height.unwrap_or_default(),
                ),
            }),
            Some(true) => {
                let (Some(width), Some(height)) = (self.width, self.height) else {
                    return Err(PageError::script("invalid rect"));
                };
                let usable = |v: f64| v.is_finite() && v >= min_extent;
                if !usable(width) || !usable(height) {
                    return Err(PageError::script("invalid rect"));
                }
                Ok(ApplyOutcome::HostZoom {
                    target: Rect {
                        origin: Point::new(
                            self.left.unwrap_or_default(),
                            self.top.unwrap_or_default(),
                        ),
                        size: Size::new(width, height),
                    },
                    scroll: Point::new(
                        self.scroll_x.unwrap_or_default(),
                        self.scroll_y.unwrap_or_default(),
                    ),
                })
            }
            None => Err(PageError::Malformed(String::from(
                "success without useNativeZoom",
            ))),
        }
    }
}

/// Decode a raw boolean answer (`true`, `"true"`).
pub fn parse_flag(raw: &str) -> Result<bool, PageError> {
    match unwrap_json(raw)? {
        serde_json::Value::Bool(flag) => Ok(flag),
        other => Err(PageError::Malformed(format!("expected boolean, got {other}"))),
    }
}

fn unwrap_json(raw: &str) -> Result<serde_json::Value, PageError> {
    let value: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|e| PageError::Malformed(format!("{e}: {raw}")))?;
    match value {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| PageError::Malformed(format!("{e}: {inner}"))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_ids_are_shared() {
        let ids = CallIds::new();
        let other = ids.clone();
        assert_eq!(ids.next(), CallId(1));
        assert_eq!(other.next(), CallId(2));
        assert_eq!(ids.next(), CallId(3));
    }

    #[test]
    fn test_parse_plain_and_wrapped_reports() {
        let plain = r#"{"ok":true,"reason":"theater","width":960,"height":504,"useNativeZoom":false}"#;
        let wrapped = serde_json::to_string(plain).unwrap();

        let a = ScriptReport::parse(plain).unwrap();
        let b = ScriptReport::parse(&wrapped).unwrap();
        assert_eq!(a, b);
        assert!(a.ok);
        assert_eq!(a.use_native_zoom, Some(false));
    }

    #[test]
    fn test_css_fill_outcome() {
        let report = ScriptReport::parse(
            r#"{"ok":true,"reason":"theater","width":960,"height":504,"useNativeZoom":false}"#,
        )
        .unwrap();
        assert_eq!(
            report.into_outcome(8.0).unwrap(),
            ApplyOutcome::CssFill {
                viewport: Size::new(960.0, 504.0)
            }
        );
    }

    #[test]
    fn test_host_zoom_outcome() {
        let report = ScriptReport::parse(
            r#"{"ok":true,"reason":"rect","left":100,"top":80,"width":480,"height":270,
                "scrollX":0,"scrollY":40,"useNativeZoom":true}"#,
        )
        .unwrap();
        let ApplyOutcome::HostZoom { target, scroll } = report.into_outcome(8.0).unwrap() else {
            panic!("expected host zoom");
        };
        assert_eq!(target.origin, Point::new(100.0, 80.0));
        assert_eq!(target.size, Size::new(480.0, 270.0));
        assert_eq!(scroll, Point::new(0.0, 40.0));
    }

    #[test]
    fn test_degenerate_rect_is_rejected() {
        let report = ScriptReport {
            ok: true,
            width: Some(7.9),
            height: Some(300.0),
            use_native_zoom: Some(true),
            ..Default::default()
        };
        assert_eq!(
            report.into_outcome(8.0),
            Err(PageError::script("invalid rect"))
        );
    }

    #[test]
    fn test_failure_keeps_reason_and_stack() {
        let report = ScriptReport::parse(
            r#"{"ok":false,"reason":"TypeError: x is null","stack":"at apply"}"#,
        )
        .unwrap();
        assert_eq!(
            report.into_outcome(8.0),
            Err(PageError::Script {
                reason: String::from("TypeError: x is null"),
                stack: Some(String::from("at apply")),
            })
        );
    }

    #[test]
    fn test_malformed_results() {
        assert!(matches!(
            ScriptReport::parse("undefined"),
            Err(PageError::Malformed(_))
        ));
        assert!(matches!(
            ScriptReport::parse(r#"{"ok":true}"#).unwrap().into_outcome(8.0),
            Err(PageError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Ok(true));
        assert_eq!(parse_flag("\"false\""), Ok(false));
        assert!(parse_flag("{}").is_err());
    }

    #[test]
    fn test_page_settings_defaults() {
        let settings = PageSettings::new(Url::parse("https://www.youtube.com/").unwrap());
        assert!(settings.autoplay);
        assert!(settings.init_script.contains("requestFullscreen"));
        // Embedded players live in iframes and must be guarded too.
        assert!(settings.init_script_all_frames);
    }
}

//! Page-side scripts.
//!
//! Each source under `scripts/` declares one function. The builders below
//! wrap them in an IIFE that calls the function and returns its result as a
//! JSON string, so nothing leaks into the page's global scope except the
//! state record the full-video apply keeps on `window.__fosFullVideo`.

/// Document-start script disabling native fullscreen in every frame.
pub const FULLSCREEN_GUARD: &str = include_str!("scripts/fullscreen_guard.js");

const CLEANUP: &str = include_str!("scripts/cleanup.js");
const APPLY_FULL_VIDEO: &str = include_str!("scripts/apply_full_video.js");
const ALIGN_TARGET: &str = include_str!("scripts/align_target.js");
const READ_MODE: &str = include_str!("scripts/read_mode.js");
const SCROLL_LOCK: &str = include_str!("scripts/scroll_lock.js");
const BLUR_ACTIVE: &str = include_str!("scripts/blur_active.js");

/// Heartbeat used by the watchdog.
pub const PING: &str = "1";

fn wrap(sources: &[&str], call: &str) -> String {
    let mut script = String::from("(function () {\n");
    for source in sources {
        script.push_str(source);
        script.push('\n');
    }
    script.push_str("return JSON.stringify(");
    script.push_str(call);
    script.push_str(");\n})()");
    script
}

/// Remove every trace of a previous full-video apply.
pub fn cleanup_full_video() -> String {
    wrap(&[CLEANUP], "cleanupFullVideo()")
}

/// Clean up, locate the video and either restyle the page or report its rect.
pub fn apply_full_video(min_extent: f64) -> String {
    wrap(
        &[CLEANUP, APPLY_FULL_VIDEO],
        &format!("applyFullVideo({})", js_number(min_extent)),
    )
}

/// Scroll the marked video into place after host-side zoom.
pub fn align_target(max_correction: f64) -> String {
    wrap(
        &[ALIGN_TARGET],
        &format!("alignTarget({})", js_number(max_correction)),
    )
}

/// Whether the page carries the full-video marker.
pub fn read_view_mode() -> String {
    wrap(&[READ_MODE], "readViewMode()")
}

pub fn set_scroll_enabled(enabled: bool) -> String {
    wrap(&[SCROLL_LOCK], &format!("setScrollEnabled({enabled})"))
}

pub fn blur_active_element() -> String {
    wrap(&[BLUR_ACTIVE], "blurActiveElement()")
}

fn js_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::from("0")
    }
}


/// Runs the real page scripts against a stub DOM in an embedded JS engine.
#[cfg(test)]
mod dom_tests {
    use super::*;
    use crate::page::{parse_flag, ScriptReport};
    use boa_engine::{Context, Source};

    const DOM_STUB: &str = include_str!("scripts/dom_stub.js");

    fn page(setup: &str) -> Context {
        let mut context = Context::default();
        eval(&mut context, DOM_STUB);
        eval(&mut context, setup);
        context
    }

    fn eval(context: &mut Context, code: &str) -> String {
        match context.eval(Source::from_bytes(code)) {
            Ok(value) => value
                .to_string(context)
                .map(|s| s.to_std_string_escaped())
                .unwrap_or_default(),
            Err(e) => panic!("script failed: {e}"),
        }
    }

    fn report(context: &mut Context, script: &str) -> ScriptReport {
        ScriptReport::parse(&eval(context, script)).unwrap()
    }

    #[test]
    fn test_cleanup_on_untouched_page_removes_nothing() {
        let mut context = page("");
        for _ in 0..2 {
            let cleaned = report(&mut context, &cleanup_full_video());
            assert!(cleaned.ok);
            assert_eq!(cleaned.removed, Some(0));
        }
    }

    #[test]
    fn test_cleanup_after_theater_apply_is_idempotent() {
        let mut context = page("buildWatchPage();");
        let applied = report(&mut context, &apply_full_video(8.0));
        assert!(applied.ok);
        assert_eq!(applied.use_native_zoom, Some(false));
        assert_eq!(eval(&mut context, "listeners.length"), "2");
        assert_eq!(eval(&mut context, "intervalCount()"), "1");

        // 2 listeners, 1 interval, style, mode marker, player and video markers
        let first = report(&mut context, &cleanup_full_video());
        assert_eq!(first.removed, Some(7));
        assert_eq!(eval(&mut context, "listeners.length"), "0");
        assert_eq!(eval(&mut context, "intervalCount()"), "0");
        assert_eq!(
            eval(&mut context, "document.getElementById('fos-full-video-style')"),
            "null"
        );

        let second = report(&mut context, &cleanup_full_video());
        assert_eq!(second.removed, Some(0));
    }

    #[test]
    fn test_theater_apply_engages_theater_once() {
        let mut context = page("buildWatchPage();");
        let first = report(&mut context, &apply_full_video(8.0));
        assert_eq!(first.reason, "theater");
        assert_eq!(first.width, Some(960.0));
        assert_eq!(first.height, Some(504.0));

        // Re-applying replaces the previous run instead of stacking on it.
        report(&mut context, &apply_full_video(8.0));
        assert_eq!(eval(&mut context, "theaterClicks"), "1");
        assert_eq!(eval(&mut context, "listeners.length"), "2");
        assert_eq!(eval(&mut context, "intervalCount()"), "1");
        assert_eq!(
            parse_flag(&eval(&mut context, &read_view_mode())),
            Ok(true)
        );
    }

    #[test]
    fn test_embedded_player_reports_rect() {
        let mut context = page("buildEmbedPage(480, 270);");
        let applied = report(&mut context, &apply_full_video(8.0));
        assert!(applied.ok);
        assert_eq!(applied.reason, "rect");
        assert_eq!(applied.use_native_zoom, Some(true));
        assert_eq!(applied.left, Some(100.0));
        assert_eq!(applied.width, Some(480.0));
        assert_eq!(applied.height, Some(270.0));
        assert_eq!(
            eval(&mut context, "document.querySelector('video').getAttribute('data-fos-target')"),
            "video"
        );
    }

    #[test]
    fn test_missing_video_reports_no_target() {
        let mut context = page("");
        let applied = report(&mut context, &apply_full_video(8.0));
        assert!(!applied.ok);
        assert_eq!(applied.reason, "no target");
        assert_eq!(
            parse_flag(&eval(&mut context, &read_view_mode())),
            Ok(false)
        );
    }

    #[test]
    fn test_degenerate_video_reports_invalid_rect() {
        let mut context = page("buildEmbedPage(4, 270);");
        let applied = report(&mut context, &apply_full_video(8.0));
        assert!(!applied.ok);
        assert_eq!(applied.reason, "invalid rect");
    }

    #[test]
    fn test_script_exception_is_reported() {
        let mut context = page("buildEmbedPage(480, 270); document.documentElement.setAttribute = null;");
        let applied = report(&mut context, &apply_full_video(8.0));
        assert!(!applied.ok);
        assert!(applied.stack.is_some() || !applied.reason.is_empty());
    }

    #[test]
    fn test_align_corrects_at_most_limit() {
        let mut context = page(
            "buildEmbedPage(480, 270); document.querySelector('video').rect.top = 1000;",
        );
        report(&mut context, &apply_full_video(8.0));
        let aligned = report(&mut context, &align_target(240.0));
        assert!(aligned.ok);
        assert_eq!(eval(&mut context, "window.scrollY"), "1000");

        eval(&mut context, "flushFrames();");
        assert_eq!(eval(&mut context, "window.scrollY"), "1240");
    }

    #[test]
    fn test_guard_blocks_fullscreen_entry_points() {
        let mut context = page(
            "window.Element = function () {};
             Element.prototype.requestFullscreen = function () { return 'entered'; };
             window.Document = function () {};",
        );
        eval(&mut context, FULLSCREEN_GUARD);

        let rejected = eval(
            &mut context,
            "Element.prototype.requestFullscreen = function () { return 'again'; };
             new Element().requestFullscreen() instanceof Promise",
        );
        assert_eq!(rejected, "true");
        assert_eq!(
            eval(&mut context, "Object.create(Document.prototype).fullscreenEnabled"),
            "false"
        );

        let exits = eval(
            &mut context,
            "var exits = 0;
             document.fullscreenElement = body;
             document.exitFullscreen = function () { exits++; return Promise.resolve(); };
             fireDocumentEvent('fullscreenchange', body);
             exits",
        );
        assert_eq!(exits, "1");
    }

    #[test]
    fn test_scroll_lock_toggles_style() {
        let mut context = page("");
        eval(&mut context, &set_scroll_enabled(false));
        eval(&mut context, &set_scroll_enabled(false));
        assert_eq!(eval(&mut context, "head.children.length"), "1");
        eval(&mut context, &set_scroll_enabled(true));
        assert_eq!(eval(&mut context, "head.children.length"), "0");
    }

    #[test]
    fn test_blur_active_element() {
        let mut context = page(
            "var input = body.appendChild(document.createElement('input'));
             document.activeElement = input;",
        );
        eval(&mut context, &blur_active_element());
        assert_eq!(eval(&mut context, "input.blurred"), "1");
    }
}

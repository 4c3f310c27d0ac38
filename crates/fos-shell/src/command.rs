//! User commands from the toolbar and overlay surfaces.
//!
//! Messages are plain strings of the form "namespace:command[:args]".

use crate::blocker::{InputEvent, PointerButton};
use crate::mode::ViewMode;
use crate::preset::WindowSizePreset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Player Size menu
    SetPreset(WindowSizePreset),
    /// View Mode menu
    SetViewMode(ViewMode),
    /// Lock/unlock toolbar toggle
    ToggleLock,
    /// Toolbar finished loading and wants the current state
    ToolbarReady,
    /// Input absorbed by the overlay
    Input(InputEvent),
    /// Unknown message
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.trim().splitn(3, ':').collect();

        match parts.as_slice() {
            ["size", key] => WindowSizePreset::from_key(key)
                .map(Self::SetPreset)
                .unwrap_or_else(|| Self::Unknown(input.to_string())),
            ["mode", key] => ViewMode::from_key(key)
                .map(Self::SetViewMode)
                .unwrap_or_else(|| Self::Unknown(input.to_string())),
            ["lock", "toggle"] => Self::ToggleLock,
            ["toolbar", "ready"] => Self::ToolbarReady,
            ["input", kind] => parse_input(kind, None)
                .map(Self::Input)
                .unwrap_or_else(|| Self::Unknown(input.to_string())),
            ["input", kind, button] => parse_input(kind, button.parse().ok())
                .map(Self::Input)
                .unwrap_or_else(|| Self::Unknown(input.to_string())),
            _ => Self::Unknown(input.to_string()),
        }
    }
}

fn parse_input(kind: &str, button: Option<u16>) -> Option<InputEvent> {
    let button = PointerButton::from_dom(button.unwrap_or(0));
    match kind {
        "mousedown" => Some(InputEvent::MouseDown(button)),
        "mousemove" => Some(InputEvent::MouseDragged(button)),
        "mouseup" => Some(InputEvent::MouseUp(button)),
        "wheel" => Some(InputEvent::Scroll),
        "keydown" => Some(InputEvent::KeyDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_commands() {
        assert_eq!(
            Command::parse("size:large"),
            Command::SetPreset(WindowSizePreset::Large)
        );
        assert_eq!(
            Command::parse("mode:full-video"),
            Command::SetViewMode(ViewMode::FullVideo)
        );
        assert_eq!(
            Command::parse("mode:original"),
            Command::SetViewMode(ViewMode::Original)
        );
        assert_eq!(Command::parse("lock:toggle"), Command::ToggleLock);
        assert_eq!(Command::parse("toolbar:ready\n"), Command::ToolbarReady);
    }

    #[test]
    fn test_input_reports() {
        assert_eq!(
            Command::parse("input:mousedown:2"),
            Command::Input(InputEvent::MouseDown(PointerButton::Secondary))
        );
        assert_eq!(
            Command::parse("input:mousemove:0"),
            Command::Input(InputEvent::MouseDragged(PointerButton::Primary))
        );
        assert_eq!(Command::parse("input:wheel"), Command::Input(InputEvent::Scroll));
        assert_eq!(Command::parse("input:keydown"), Command::Input(InputEvent::KeyDown));
    }

    #[test]
    fn test_unknown_messages() {
        assert_eq!(
            Command::parse("size:huge"),
            Command::Unknown(String::from("size:huge"))
        );
        assert!(matches!(Command::parse("navigate:https://example.com"), Command::Unknown(_)));
        assert!(matches!(Command::parse("input:touchstart"), Command::Unknown(_)));
        assert!(matches!(Command::parse(""), Command::Unknown(_)));
    }
}

//! JSONL protocol between the session core and the presentation layer.
//!
//! Events arrive as newline-delimited JSON on stdin, frames leave on stdout:
//!
//! ```json
//! {"type": "inputChanged", "value": "fire"}
//! {"type": "keyDown", "key": "down"}
//! {"type": "keyDown", "key": "h", "capture": true}
//! {"type": "activate", "index": 2}
//! {"type": "blur"}
//! ```
//!
//! ```json
//! {"type": "render", "results": [...], "selected": 0, "query": "fire", "expanded": true}
//! {"type": "requestFocus"}
//! {"type": "closeWindow"}
//! {"type": "exit"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::results::DisplayItem;

/// Events sent by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    /// The search input text changed.
    InputChanged { value: String },
    /// A key went down. `capture` marks capture-phase observations, which
    /// arrive even before focus has reached the input surface.
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Vec<String>,
        #[serde(default)]
        capture: bool,
    },
    /// Pointer activation of the result row at `index` (full-list index).
    Activate { index: usize },
    /// The window lost focus.
    Blur,
}

/// Frames sent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderFrame {
    /// Replace the visible result list.
    Render {
        results: Vec<DisplayItem>,
        selected: Option<usize>,
        query: String,
        expanded: bool,
    },
    /// Best-effort platform focus nudge.
    RequestFocus,
    /// Fallback termination path: close the window.
    CloseWindow,
    /// Primary termination path: exit the application.
    Exit,
}

/// Parse one JSONL line into a [`UiEvent`].
pub fn parse_event(line: &str) -> Result<UiEvent> {
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_changed() {
        let event = parse_event(r#"{"type": "inputChanged", "value": "fire"}"#).unwrap();
        assert!(matches!(event, UiEvent::InputChanged { value } if value == "fire"));
    }

    #[test]
    fn test_parse_key_down_defaults() {
        let event = parse_event(r#"{"type": "keyDown", "key": "down"}"#).unwrap();
        match event {
            UiEvent::KeyDown {
                key,
                modifiers,
                capture,
            } => {
                assert_eq!(key, "down");
                assert!(modifiers.is_empty());
                assert!(!capture);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_capture_phase_key() {
        let event =
            parse_event(r#"{"type": "keyDown", "key": "h", "capture": true}"#).unwrap();
        assert!(matches!(event, UiEvent::KeyDown { capture: true, .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("not json").is_err());
        assert!(parse_event(r#"{"type": "unknownThing"}"#).is_err());
    }

    #[test]
    fn test_render_frame_wire_shape() {
        let frame = RenderFrame::Render {
            results: Vec::new(),
            selected: None,
            query: String::new(),
            expanded: false,
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""type":"render""#));
        assert!(json.contains(r#""expanded":false"#));

        assert_eq!(
            serde_json::to_string(&RenderFrame::Exit).unwrap(),
            r#"{"type":"exit"}"#
        );
        assert_eq!(
            serde_json::to_string(&RenderFrame::CloseWindow).unwrap(),
            r#"{"type":"closeWindow"}"#
        );
    }
}

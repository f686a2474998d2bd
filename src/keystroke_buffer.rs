//! Capture of keys typed before the input surface is interactive.
//!
//! Keystrokes observed in the capture phase before readiness are queued here
//! in arrival order; once the session becomes ready the buffer is flushed
//! exactly once as a single string and replayed as a synthetic input change.

/// Modifier names that disqualify a key press from capture. Shift is allowed
/// since it still produces a printable character.
const BLOCKING_MODIFIERS: [&str; 6] = ["ctrl", "control", "alt", "meta", "cmd", "super"];

#[derive(Debug, Default)]
pub struct KeystrokeBuffer {
    buffered: String,
    flushed: bool,
}

impl KeystrokeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key press if it is a printable single character without a
    /// blocking modifier. Returns whether the key was captured.
    pub fn capture(&mut self, key: &str, modifiers: &[String]) -> bool {
        if self.flushed {
            return false;
        }
        let mut chars = key.chars();
        let (first, rest) = (chars.next(), chars.next());
        let Some(ch) = first else { return false };
        if rest.is_some() || ch.is_control() {
            return false;
        }
        if modifiers
            .iter()
            .any(|m| BLOCKING_MODIFIERS.contains(&m.to_ascii_lowercase().as_str()))
        {
            return false;
        }
        self.buffered.push(ch);
        true
    }

    /// Take the buffered text. Returns `Some` exactly once; the buffer is
    /// dead afterwards and captures nothing further.
    pub fn flush(&mut self) -> Option<String> {
        if self.flushed {
            return None;
        }
        self.flushed = true;
        Some(std::mem::take(&mut self.buffered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_mods() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_captures_printable_keys_in_order() {
        let mut buffer = KeystrokeBuffer::new();
        assert!(buffer.capture("h", &no_mods()));
        assert!(buffer.capture("i", &no_mods()));
        assert_eq!(buffer.flush().as_deref(), Some("hi"));
    }

    #[test]
    fn test_ignores_named_keys() {
        let mut buffer = KeystrokeBuffer::new();
        assert!(!buffer.capture("escape", &no_mods()));
        assert!(!buffer.capture("enter", &no_mods()));
        assert!(!buffer.capture("down", &no_mods()));
        assert_eq!(buffer.flush().as_deref(), Some(""));
    }

    #[test]
    fn test_ignores_modified_combinations() {
        let mut buffer = KeystrokeBuffer::new();
        assert!(!buffer.capture("c", &["ctrl".to_string()]));
        assert!(!buffer.capture("v", &["Meta".to_string()]));
        assert!(!buffer.capture("x", &["alt".to_string()]));
        assert_eq!(buffer.flush().as_deref(), Some(""));
    }

    #[test]
    fn test_shift_is_allowed() {
        let mut buffer = KeystrokeBuffer::new();
        assert!(buffer.capture("H", &["shift".to_string()]));
        assert_eq!(buffer.flush().as_deref(), Some("H"));
    }

    #[test]
    fn test_flush_happens_exactly_once() {
        let mut buffer = KeystrokeBuffer::new();
        buffer.capture("a", &no_mods());
        assert_eq!(buffer.flush().as_deref(), Some("a"));
        assert_eq!(buffer.flush(), None);
        assert!(!buffer.capture("b", &no_mods()));
        assert_eq!(buffer.flush(), None);
    }
}

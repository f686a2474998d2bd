//! Dismissal triggers and the launch-aware guard around them.
//!
//! Escape (focused or capture-phase) and window blur both request
//! termination, unless a launch is in flight - the window must not die under
//! the launch it is executing. Blur events right after startup get no extra
//! grace period beyond that check.

use tracing::debug;

use crate::launch::LaunchGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    Escape,
    Blur,
}

/// Whether a dismissal trigger should terminate the app right now.
pub fn should_dismiss(trigger: DismissTrigger, gate: &LaunchGate) -> bool {
    if gate.is_launching() {
        debug!(?trigger, "ignoring dismissal while launch in flight");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismisses_when_idle() {
        let gate = LaunchGate::new();
        assert!(should_dismiss(DismissTrigger::Escape, &gate));
        assert!(should_dismiss(DismissTrigger::Blur, &gate));
    }

    #[test]
    fn test_suppressed_while_launching() {
        let mut gate = LaunchGate::new();
        assert!(gate.try_begin());
        assert!(!should_dismiss(DismissTrigger::Escape, &gate));
        assert!(!should_dismiss(DismissTrigger::Blur, &gate));
    }
}

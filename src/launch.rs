//! Single-flight guard around launch execution.

/// Launch progress for the session. The runtime is single-threaded, so
/// check-then-set on this state needs no lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchState {
    #[default]
    Idle,
    Launching,
}

/// Ensures at most one launch executes at a time. The gate normally stays
/// `Launching` forever because the expected outcome is process termination;
/// it is re-armed only when both termination paths have failed, so a later
/// attempt can retry.
#[derive(Debug, Default)]
pub struct LaunchGate {
    state: LaunchState,
}

impl LaunchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. Returns false if a launch is already in flight, in
    /// which case the caller must do nothing.
    pub fn try_begin(&mut self) -> bool {
        if self.state == LaunchState::Launching {
            return false;
        }
        self.state = LaunchState::Launching;
        true
    }

    pub fn is_launching(&self) -> bool {
        self.state == LaunchState::Launching
    }

    /// Re-arm after a fully failed termination attempt.
    pub fn reset(&mut self) {
        self.state = LaunchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected() {
        let mut gate = LaunchGate::new();
        assert!(gate.try_begin());
        assert!(!gate.try_begin());
        assert!(gate.is_launching());
    }

    #[test]
    fn test_reset_rearms_the_gate() {
        let mut gate = LaunchGate::new();
        assert!(gate.try_begin());
        gate.reset();
        assert!(!gate.is_launching());
        assert!(gate.try_begin());
    }
}

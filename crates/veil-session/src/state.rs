//! Share session lifecycle states
//!
//! A stored record moves through the sharing lifecycle exactly once per
//! sharing act. The `Queued -> Computing -> Finalized` leg is owned by
//! the external compute engine; the session only observes it through the
//! finalize signal.

use std::fmt;

/// Lifecycle state of one sharing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareState {
    /// Ciphertext persisted under the owner's address
    Stored,
    /// Share request submitted to the compute engine
    Queued,
    /// Engine is executing the re-encryption
    Computing,
    /// Engine emitted its terminal signal
    Finalized,
    /// Re-encrypted record handed to the caller
    Delivered,
    /// Absorbing failure state
    Errored,
}

impl ShareState {
    /// Whether moving to `next` is a legal transition
    pub fn can_transition_to(self, next: ShareState) -> bool {
        use ShareState::*;
        matches!(
            (self, next),
            (Stored, Queued)
                | (Queued, Computing)
                | (Queued, Errored)
                | (Computing, Finalized)
                | (Computing, Errored)
                | (Finalized, Delivered)
        )
    }

    /// Whether this state ends the session
    pub fn is_terminal(self) -> bool {
        matches!(self, ShareState::Delivered | ShareState::Errored)
    }

    /// Whether a share request is currently in flight
    pub fn in_flight(self) -> bool {
        matches!(
            self,
            ShareState::Queued | ShareState::Computing | ShareState::Finalized
        )
    }
}

impl fmt::Display for ShareState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareState::Stored => "stored",
            ShareState::Queued => "queued",
            ShareState::Computing => "computing",
            ShareState::Finalized => "finalized",
            ShareState::Delivered => "delivered",
            ShareState::Errored => "errored",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(ShareState::Stored.can_transition_to(ShareState::Queued));
        assert!(ShareState::Queued.can_transition_to(ShareState::Computing));
        assert!(ShareState::Computing.can_transition_to(ShareState::Finalized));
        assert!(ShareState::Finalized.can_transition_to(ShareState::Delivered));
    }

    #[test]
    fn test_error_absorbing_from_in_flight() {
        assert!(ShareState::Queued.can_transition_to(ShareState::Errored));
        assert!(ShareState::Computing.can_transition_to(ShareState::Errored));
        assert!(!ShareState::Stored.can_transition_to(ShareState::Errored));
        assert!(!ShareState::Delivered.can_transition_to(ShareState::Errored));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!ShareState::Stored.can_transition_to(ShareState::Finalized));
        assert!(!ShareState::Queued.can_transition_to(ShareState::Delivered));
        assert!(!ShareState::Delivered.can_transition_to(ShareState::Queued));
        assert!(!ShareState::Errored.can_transition_to(ShareState::Queued));
    }

    #[test]
    fn test_terminal_and_in_flight() {
        assert!(ShareState::Delivered.is_terminal());
        assert!(ShareState::Errored.is_terminal());
        assert!(!ShareState::Queued.is_terminal());

        assert!(ShareState::Queued.in_flight());
        assert!(ShareState::Computing.in_flight());
        assert!(!ShareState::Stored.in_flight());
        assert!(!ShareState::Delivered.in_flight());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(format!("{}", ShareState::Stored), "stored");
        assert_eq!(format!("{}", ShareState::Errored), "errored");
    }
}

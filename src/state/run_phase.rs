/// Run phase definitions for tracking crawl progress
///
/// A run moves through `Idle → AwaitingAuth → Processing(i) → Done`. A failed
/// item is recorded as a per-item outcome and never changes the run phase.
use std::fmt;
use thiserror::Error;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Session open, nothing done yet
    Idle,

    /// Suspended until the operator confirms login
    AwaitingAuth,

    /// Processing the item at this 0-based index
    Processing(usize),

    /// Every item has an outcome
    Done,
}

/// Rejected phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid run phase transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: RunPhase,
    pub to: RunPhase,
}

impl RunPhase {
    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while items are being processed
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing(_))
    }

    /// Index of the item in flight, if any
    pub fn current_item(&self) -> Option<usize> {
        match self {
            Self::Processing(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        match (*self, next) {
            (Self::Idle, Self::AwaitingAuth) => true,
            (Self::Idle, Self::Processing(0)) => true,
            (Self::Idle, Self::Done) => true,
            (Self::AwaitingAuth, Self::AwaitingAuth) => true,
            (Self::AwaitingAuth, Self::Processing(0)) => true,
            (Self::AwaitingAuth, Self::Done) => true,
            (Self::Processing(i), Self::Processing(j)) => j == i + 1,
            (Self::Processing(_), Self::Done) => true,
            _ => false,
        }
    }

    /// Moves to `next`, leaving `self` untouched when the move is illegal
    pub fn advance(&mut self, next: RunPhase) -> Result<(), InvalidTransition> {
        if !self.can_transition_to(next) {
            return Err(InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn label(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::AwaitingAuth => "awaiting_auth".to_string(),
            Self::Processing(i) => format!("processing({})", i),
            Self::Done => "done".to_string(),
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!RunPhase::Idle.is_terminal());
        assert!(!RunPhase::AwaitingAuth.is_terminal());
        assert!(!RunPhase::Processing(3).is_terminal());
        assert!(RunPhase::Done.is_terminal());
    }

    #[test]
    fn test_current_item() {
        assert_eq!(RunPhase::Processing(2).current_item(), Some(2));
        assert_eq!(RunPhase::Idle.current_item(), None);
        assert_eq!(RunPhase::Done.current_item(), None);
    }

    #[test]
    fn test_full_run_sequence() {
        let mut phase = RunPhase::Idle;
        phase.advance(RunPhase::AwaitingAuth).unwrap();
        phase.advance(RunPhase::AwaitingAuth).unwrap();
        phase.advance(RunPhase::Processing(0)).unwrap();
        phase.advance(RunPhase::Processing(1)).unwrap();
        phase.advance(RunPhase::Processing(2)).unwrap();
        phase.advance(RunPhase::Done).unwrap();
        assert!(phase.is_terminal());
    }

    #[test]
    fn test_rejects_skipping_items() {
        let mut phase = RunPhase::Processing(0);
        let err = phase.advance(RunPhase::Processing(2)).unwrap_err();
        assert_eq!(err.from, RunPhase::Processing(0));
        assert_eq!(err.to, RunPhase::Processing(2));
        assert_eq!(phase, RunPhase::Processing(0));
    }

    #[test]
    fn test_rejects_leaving_done() {
        let mut phase = RunPhase::Done;
        assert!(phase.advance(RunPhase::Processing(0)).is_err());
        assert!(phase.advance(RunPhase::Idle).is_err());
    }

    #[test]
    fn test_rejects_starting_mid_batch() {
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Processing(1)));
        assert!(!RunPhase::AwaitingAuth.can_transition_to(RunPhase::Processing(4)));
        assert!(!RunPhase::Processing(1).can_transition_to(RunPhase::AwaitingAuth));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RunPhase::Idle), "idle");
        assert_eq!(format!("{}", RunPhase::Processing(4)), "processing(4)");
        assert_eq!(
            InvalidTransition {
                from: RunPhase::Done,
                to: RunPhase::Idle
            }
            .to_string(),
            "Invalid run phase transition: done -> idle"
        );
    }
}

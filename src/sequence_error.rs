//! Errors reported by the pick-and-place sequencer

use std::fmt;

/// Outcomes of resolving and executing a motion phase that are not plain success.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// The configuration returned by the solver misses the requested position by more
    /// than the tolerance. Reported, and only escalated if the policy says so.
    UnreachablePose {
        phase: String,
        error: f64,
        tolerance: f64,
    },

    /// Item index outside of the worklist. Fatal for the task that refers to it.
    InvalidIndex { index: usize, len: usize },

    /// Waypoint name that the resolver does not know.
    UnknownWaypoint(String),

    /// Item waypoint given without the item index.
    MissingIndex(String),
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SequenceError::UnreachablePose { phase, error, tolerance } => write!(
                f,
                "Unreachable pose in {}: position error {:.4} m exceeds tolerance {:.4} m",
                phase, error, tolerance
            ),
            SequenceError::InvalidIndex { index, len } => {
                write!(f, "Invalid item index {} for a worklist of {} items", index, len)
            }
            SequenceError::UnknownWaypoint(name) => write!(f, "Unknown waypoint: {}", name),
            SequenceError::MissingIndex(name) => {
                write!(f, "Waypoint {} requires an item index", name)
            }
        }
    }
}

impl std::error::Error for SequenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = SequenceError::InvalidIndex { index: 10, len: 9 };
        assert_eq!(error.to_string(), "Invalid item index 10 for a worklist of 9 items");

        let error = SequenceError::UnreachablePose {
            phase: "pickup item 0".into(),
            error: 0.0125,
            tolerance: 0.005,
        };
        assert_eq!(
            error.to_string(),
            "Unreachable pose in pickup item 0: position error 0.0125 m exceeds tolerance 0.0050 m"
        );
    }
}

//! Planning error types

use std::time::Duration;
use thiserror::Error;

/// Ways a planning call can fail
///
/// The scheduler recovers from every variant by publishing an empty plan
/// set; none of them reach the caller that requested the replan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Planner failed: {0}")]
    Planner(String),

    #[error("Planning timed out after {0:?}")]
    Timeout(Duration),

    #[error("Planning task panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlanningError::Planner("no recipes".to_string()).to_string(),
            "Planner failed: no recipes"
        );
        assert_eq!(
            PlanningError::Timeout(Duration::from_millis(6000)).to_string(),
            "Planning timed out after 6s"
        );
    }
}

//! Host error types

use thiserror::Error;

use crate::scheduler::SchedulerError;
use crate::session::SessionError;

/// Errors surfaced by [`ArcHost`](super::ArcHost)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("No async runtime available to start the host")]
    NoRuntime,

    #[error("Scheduler has shut down")]
    SchedulerClosed,

    #[error("Event bus closed")]
    EventsClosed,

    #[error("No plan matches '{0}'")]
    PlanNotFound(String),

    #[error("'{reference}' matches several plans: {}", matches.join(", "))]
    AmbiguousPlan { reference: String, matches: Vec<String> },
}

impl From<SessionError> for HostError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoRuntime => HostError::NoRuntime,
        }
    }
}

impl From<SchedulerError> for HostError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Closed => HostError::SchedulerClosed,
            SchedulerError::NoRuntime => HostError::NoRuntime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_matches() {
        let err = HostError::AmbiguousPlan {
            reference: "gift".to_string(),
            matches: vec!["plan-gift-wrap".to_string(), "plan-gift-card".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "'gift' matches several plans: plan-gift-wrap, plan-gift-card"
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(HostError::from(SchedulerError::Closed), HostError::SchedulerClosed);
        assert_eq!(HostError::from(SessionError::NoRuntime), HostError::NoRuntime);
    }
}

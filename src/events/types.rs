//! Event types emitted by the arc host

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Plan, PlanSet};

/// Signals the host sends to whatever presentation layer listens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostEvent {
    /// Previously published plans are stale and must not be offered
    PlansCleared { session_id: String },

    /// A settled planning burst produced this plan set
    PlansReady { session_id: String, plans: PlanSet },

    /// A plan was instantiated and its settle delay has elapsed
    PlanApplied { session_id: String, plan: Plan },
}

impl HostEvent {
    /// Get the session ID for this event
    pub fn session_id(&self) -> &str {
        match self {
            HostEvent::PlansCleared { session_id }
            | HostEvent::PlansReady { session_id, .. }
            | HostEvent::PlanApplied { session_id, .. } => session_id,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            HostEvent::PlansCleared { .. } => "plans-cleared",
            HostEvent::PlansReady { .. } => "plans-ready",
            HostEvent::PlanApplied { .. } => "plan-applied",
        }
    }
}

/// A timestamped event for line-oriented output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLogEntry {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    pub event: HostEvent,
}

impl EventLogEntry {
    /// Create a new log entry with current timestamp
    pub fn new(event: HostEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

//! Message and snapshot types for the scheduler task

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::PlanSet;

/// Errors talking to the scheduler task
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Scheduler task has shut down")]
    Closed,

    #[error("No async runtime available to run the scheduler")]
    NoRuntime,
}

/// Why the current plans became invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Invalidation {
    /// Explicit request for fresh plans
    Requested,
    /// Host configuration changed
    ConfigChanged,
    /// Manifest set or manifest contents changed
    ManifestsChanged,
    /// A plan was applied to the session
    PlanApplied,
}

impl fmt::Display for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Invalidation::Requested => "requested",
            Invalidation::ConfigChanged => "config-changed",
            Invalidation::ManifestsChanged => "manifests-changed",
            Invalidation::PlanApplied => "plan-applied",
        };
        f.write_str(name)
    }
}

/// Requests to the scheduler task
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Results obtained before now are invalid
    MarkInvalid { cause: Invalidation },

    /// Report current state
    Snapshot { reply_tx: oneshot::Sender<SchedulerSnapshot> },

    /// Stop the task; an in-flight planning call is left to finish on its own
    Shutdown,
}

/// Where the scheduler is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulerPhase {
    Idle,
    Debouncing,
    Planning,
}

/// Counters for observability and tests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// mark_invalid calls received
    pub invalidations: u64,
    /// Debounce timers armed
    pub timers_armed: u64,
    /// Planning calls started
    pub planning_runs: u64,
    /// Planning calls that failed and were replaced by an empty set
    pub planning_failures: u64,
    /// Results discarded because an invalidation arrived mid-call
    pub stale_results: u64,
    /// plans-ready events emitted
    pub publishes: u64,
}

/// Point-in-time view of the scheduler
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerSnapshot {
    pub phase: SchedulerPhase,
    pub invalid: bool,
    pub running: bool,
    pub last_published: Option<PlanSet>,
    pub stats: SchedulerStats,
}

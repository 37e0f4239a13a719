//! archost - debounced, single-flight replanning for live arc sessions
//!
//! An arc host keeps a session's suggested plans fresh. Anything that could
//! change what the planner would propose marks the plans invalid; the host
//! clears them at once, waits for the burst of changes to settle, then
//! plans until a result is known not to be stale and publishes it.
//!
//! # Core Concepts
//!
//! - **Debounce**: a burst of invalidations arms exactly one timer
//! - **Single-flight**: at most one planning call per session at a time
//! - **Fresh results only**: a call overtaken by an invalidation is replanned, never published
//! - **Events, not callbacks**: clears, plan sets and applied plans go out on a broadcast bus
//!
//! # Modules
//!
//! - [`scheduler`] - the invalidation scheduler task and its handle
//! - [`planning`] - planner contract and the timeout-bounded invocation
//! - [`host`] - `ArcHost`, the suggestion applier and host timing
//! - [`session`] - the session trait and the in-memory arc
//! - [`manifest`] - manifest selection and context loading
//! - [`events`] - host events and the event bus
//! - [`watcher`] - manifest file polling
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod events;
pub mod host;
pub mod manifest;
pub mod planning;
pub mod scheduler;
pub mod session;
pub mod watcher;

// Re-export commonly used types
pub use config::Config;
pub use domain::{Plan, PlanResolver, PlanSet};
pub use events::{EventBus, EventEmitter, EventLogEntry, HostEvent};
pub use host::{AppliedSignal, ArcHost, HostConfig, HostError, SuggestionApplier};
pub use manifest::{ManifestConfig, ManifestContext, ManifestError, ManifestLoader, Recipe};
pub use planning::{Generation, ManifestPlanner, PlanOutcome, Planner, PlanningError, PlanningInvocation};
pub use scheduler::{
    Invalidation, InvalidationScheduler, SchedulerError, SchedulerPhase, SchedulerSnapshot, SchedulerStats,
};
pub use session::{ArcSession, Session, SessionError};
pub use watcher::{ManifestWatcher, WatcherConfig};

//! Arc host: the session-facing side of replanning
//!
//! [`ArcHost`] owns one session's [`InvalidationScheduler`](crate::scheduler::InvalidationScheduler)
//! and [`SuggestionApplier`], and turns session-level happenings (manifest
//! reloads, applied plans, explicit requests) into invalidations.

mod applier;
mod arc_host;
mod config;
mod error;

pub use applier::{AppliedSignal, DEFAULT_SETTLE_DELAY, SuggestionApplier};
pub use arc_host::ArcHost;
pub use config::HostConfig;
pub use error::HostError;

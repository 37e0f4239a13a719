//! Planning: the external planner contract and the adapter that invokes it
//!
//! - [`Planner`] - the opaque, possibly slow, plan producer
//! - [`PlanningInvocation`] - runs one planner call under a timeout budget
//! - [`ManifestPlanner`] - proposes one plan per manifest recipe

mod error;
mod invocation;
mod manifest_planner;
pub(crate) mod planner;

pub use error::PlanningError;
pub use invocation::{DEFAULT_PLANNING_GRACE, DEFAULT_PLANNING_TIMEOUT, PlanOutcome, PlanningInvocation};
pub use manifest_planner::ManifestPlanner;
pub use planner::{Generation, Planner};

//! Domain types for archost
//!
//! Plans are the candidate recipes a planner proposes for a session;
//! a PlanSet is the immutable result of one planning run.

mod id;
mod plan;

pub use id::{PlanResolver, plan_id, session_id, slugify};
pub use plan::{Plan, PlanSet};

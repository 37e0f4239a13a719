//! PlanningInvocation - one planner call under a timeout budget

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::PlanSet;
use crate::session::Session;

use super::error::PlanningError;
use super::planner::{Generation, Planner};

/// Budget handed to the planner when none is configured
pub const DEFAULT_PLANNING_TIMEOUT: Duration = Duration::from_millis(5000);

/// How long past its budget a planner may run before it is abandoned
pub const DEFAULT_PLANNING_GRACE: Duration = Duration::from_millis(1000);

/// What one planner call produced
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub plans: PlanSet,
    pub generations: Vec<Generation>,
}

/// Stateless adapter around a [`Planner`]
///
/// The planner receives `timeout` as its budget. A call still running at
/// `timeout + grace` is abandoned with [`PlanningError::Timeout`].
#[derive(Clone)]
pub struct PlanningInvocation {
    planner: Arc<dyn Planner>,
    timeout: Duration,
    grace: Duration,
}

impl PlanningInvocation {
    pub fn new(planner: Arc<dyn Planner>, timeout: Duration, grace: Duration) -> Self {
        debug!(planner = planner.name(), ?timeout, ?grace, "PlanningInvocation::new: called");
        Self {
            planner,
            timeout,
            grace,
        }
    }

    /// Hard limit on a single call
    pub fn deadline(&self) -> Duration {
        self.timeout + self.grace
    }

    /// Run the planner once against the session
    pub async fn run(&self, session: &dyn Session) -> Result<PlanOutcome, PlanningError> {
        debug!(
            planner = self.planner.name(),
            session_id = session.id(),
            "PlanningInvocation::run: called"
        );
        let mut generations = Vec::new();
        let deadline = self.deadline();

        let result = tokio::time::timeout(
            deadline,
            self.planner.suggest(session, self.timeout, &mut generations),
        )
        .await;

        match result {
            Ok(Ok(plans)) => {
                debug!(
                    plans = plans.len(),
                    generations = generations.len(),
                    "PlanningInvocation::run: planner returned"
                );
                Ok(PlanOutcome {
                    plans: PlanSet::new(plans),
                    generations,
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(planner = self.planner.name(), ?deadline, "Planner ignored its budget");
                Err(PlanningError::Timeout(deadline))
            }
        }
    }
}

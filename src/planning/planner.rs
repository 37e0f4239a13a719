//! The `Planner` trait -- the contract for external plan producers

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Plan;
use crate::session::Session;

use super::error::PlanningError;

/// Diagnostic record of one intermediate planning generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Position of this generation within the call
    pub index: usize,

    /// IDs of the candidates alive in this generation
    pub candidates: Vec<String>,

    /// Time spent in the call when the generation closed
    #[serde(rename = "elapsed-ms")]
    pub elapsed_ms: u64,
}

impl Generation {
    pub fn new(index: usize, plans: &[Plan], elapsed: Duration) -> Self {
        Self {
            index,
            candidates: plans.iter().map(|p| p.id.clone()).collect(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Adapter interface for whatever computes candidate plans
///
/// Implementations should honour `budget` and return what they have when
/// it runs out; the caller only enforces a looser hard limit. Intermediate
/// generations may be pushed onto `generations`; they are logged and
/// otherwise ignored.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Propose candidate plans for the session's current state
    async fn suggest(
        &self,
        session: &dyn Session,
        budget: Duration,
        generations: &mut Vec<Generation>,
    ) -> Result<Vec<Plan>, PlanningError>;
}


#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;
    use tracing::debug;

    type Respond = dyn Fn(usize) -> Result<Vec<Plan>, PlanningError> + Send + Sync;

    /// Mock planner for unit tests
    ///
    /// Sleeps `latency` per call, then answers with `respond(call_index)`.
    pub struct MockPlanner {
        latency: Duration,
        respond: Box<Respond>,
        call_count: AtomicUsize,
        started: Mutex<Vec<Instant>>,
    }

    impl MockPlanner {
        pub fn new(
            latency: Duration,
            respond: impl Fn(usize) -> Result<Vec<Plan>, PlanningError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                latency,
                respond: Box::new(respond),
                call_count: AtomicUsize::new(0),
                started: Mutex::new(Vec::new()),
            }
        }

        /// Answers call `n` with a single plan named `run-n`
        pub fn numbered(latency: Duration) -> Self {
            Self::new(latency, |n| Ok(vec![Plan::from_recipe(format!("run-{}", n), "")]))
        }

        /// Fails every call
        pub fn failing(latency: Duration) -> Self {
            Self::new(latency, |_| Err(PlanningError::Planner("planner exploded".to_string())))
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// When each call started
        pub fn call_starts(&self) -> Vec<Instant> {
            self.started.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Planner for MockPlanner {
        fn name(&self) -> &str {
            "mock"
        }

        async fn suggest(
            &self,
            _session: &dyn Session,
            _budget: Duration,
            generations: &mut Vec<Generation>,
        ) -> Result<Vec<Plan>, PlanningError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.started.lock().unwrap().push(Instant::now());
            debug!(%idx, "MockPlanner::suggest: called");

            tokio::time::sleep(self.latency).await;
            let result = (self.respond)(idx);
            if let Ok(plans) = &result {
                generations.push(Generation::new(0, plans, self.latency));
            }
            result
        }
    }
}

//! SuggestionApplier - instantiate a plan and announce it

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::Plan;
use crate::events::EventEmitter;
use crate::session::Session;

/// Default wait between instantiating a plan and announcing it
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// What [`SuggestionApplier::apply`] reports back
#[derive(Debug, Clone, Serialize)]
pub struct AppliedSignal {
    pub plan: Plan,

    /// The delay that was waited, not a measured installation time
    #[serde(rename = "settle-ms", serialize_with = "serialize_millis")]
    pub settle_delay: Duration,

    #[serde(rename = "applied-at")]
    pub applied_at: DateTime<Utc>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Applies a chosen plan to a session
///
/// `Session::instantiate` gives no completion signal, so `apply` waits a
/// fixed settle delay and then emits `plan-applied`. If installation takes
/// longer than the delay, the event (and any replan it triggers) can see the
/// session before the plan is in it. Raise `settle-ms` for slow sessions.
#[derive(Clone)]
pub struct SuggestionApplier {
    session: Arc<dyn Session>,
    emitter: EventEmitter,
    settle_delay: Duration,
}

impl SuggestionApplier {
    pub fn new(session: Arc<dyn Session>, emitter: EventEmitter, settle_delay: Duration) -> Self {
        Self {
            session,
            emitter,
            settle_delay,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Instantiate `plan`, wait the settle delay, then emit `plan-applied`
    pub async fn apply(&self, plan: Plan) -> AppliedSignal {
        debug!(session_id = %self.session.id(), plan_id = %plan.id, "SuggestionApplier::apply: called");
        self.session.instantiate(&plan);

        tokio::time::sleep(self.settle_delay).await;

        info!(session_id = %self.session.id(), plan = %plan.name, "Plan applied");
        self.emitter.plan_applied(plan.clone());

        AppliedSignal {
            plan,
            settle_delay: self.settle_delay,
            applied_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, HostEvent};
    use crate::manifest::ManifestContext;
    use crate::session::ArcSession;
    use tokio::time::Instant;

    fn applier(session: Arc<ArcSession>, bus: &EventBus) -> SuggestionApplier {
        let emitter = bus.emitter_for(session.id().to_string());
        SuggestionApplier::new(session, emitter, DEFAULT_SETTLE_DELAY)
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_waits_settle_then_emits() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let session = Arc::new(ArcSession::with_id("demo-apply", ManifestContext::empty()).unwrap());
        let applier = applier(session.clone(), &bus);
        let start = Instant::now();

        let signal = applier.apply(Plan::from_recipe("Gift Wrap", "")).await;

        assert!(start.elapsed() >= DEFAULT_SETTLE_DELAY);
        assert_eq!(signal.plan.id, "plan-gift-wrap");
        assert_eq!(signal.settle_delay, DEFAULT_SETTLE_DELAY);

        match rx.recv().await.unwrap() {
            HostEvent::PlanApplied { session_id, plan } => {
                assert_eq!(session_id, "demo-apply");
                assert_eq!(plan.name, "Gift Wrap");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(session.instantiated().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_install_can_lag_the_signal() {
        let bus = EventBus::new(16);
        let session = Arc::new(
            ArcSession::with_id("demo-slow", ManifestContext::empty())
                .unwrap()
                .with_install_delay(Duration::from_secs(2)),
        );
        let applier = applier(session.clone(), &bus);

        applier.apply(Plan::from_recipe("Slow", "")).await;
        assert!(session.instantiated().await.is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.instantiated().await.len(), 1);
    }

    #[test]
    fn test_signal_serializes_millis() {
        let signal = AppliedSignal {
            plan: Plan::from_recipe("A", ""),
            settle_delay: Duration::from_millis(200),
            applied_at: Utc::now(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["settle-ms"], 200);
        assert_eq!(json["plan"]["id"], "plan-a");
    }
}

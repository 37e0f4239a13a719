//! Event Bus - pub/sub for host notifications
//!
//! The EventBus uses a tokio broadcast channel so every subscriber sees
//! every event emitted after it subscribed.

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{Plan, PlanSet};

use super::types::HostEvent;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Central event bus for one or more arc hosts
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HostEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: with no subscribers the event is dropped, and slow
    /// subscribers lose the oldest events once the channel is full.
    pub fn emit(&self, event: HostEvent) {
        debug!(
            event_type = event.event_type(),
            session_id = event.session_id(),
            "EventBus::emit"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter handle bound to a session
    pub fn emitter_for(&self, session_id: impl Into<String>) -> EventEmitter {
        let session_id = session_id.into();
        debug!(%session_id, "EventBus::emitter_for: creating emitter");
        EventEmitter {
            tx: self.tx.clone(),
            session_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for components to emit events for one session
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<HostEvent>,
    session_id: String,
}

impl EventEmitter {
    /// Get the session ID this emitter is bound to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Emit a raw event
    pub fn emit(&self, event: HostEvent) {
        debug!(event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    pub fn plans_cleared(&self) {
        self.emit(HostEvent::PlansCleared {
            session_id: self.session_id.clone(),
        });
    }

    pub fn plans_ready(&self, plans: PlanSet) {
        self.emit(HostEvent::PlansReady {
            session_id: self.session_id.clone(),
            plans,
        });
    }

    pub fn plan_applied(&self, plan: Plan) {
        self.emit(HostEvent::PlanApplied {
            session_id: self.session_id.clone(),
            plan,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_event_bus_subscribe() {
        let bus = EventBus::new(16);
        assert_eq!(bus.subscriber_count(), 0);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_bus_no_subscribers() {
        let bus = EventBus::new(16);
        bus.emitter_for("demo-1").plans_cleared();
    }

    #[tokio::test]
    async fn test_emitter_convenience_methods() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let emitter = bus.emitter_for("demo-7");

        emitter.plans_cleared();
        emitter.plans_ready(PlanSet::new(vec![Plan::from_recipe("a", "")]));
        emitter.plan_applied(Plan::from_recipe("a", ""));

        let types: Vec<&str> = vec![
            rx.recv().await.unwrap().event_type(),
            rx.recv().await.unwrap().event_type(),
            rx.recv().await.unwrap().event_type(),
        ];
        assert_eq!(types, vec!["plans-cleared", "plans-ready", "plan-applied"]);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_shared_bus_keeps_sessions_apart() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emitter_for("demo-a").plans_cleared();
        bus.emitter_for("demo-b").plans_cleared();

        assert_eq!(rx.recv().await.unwrap().session_id(), "demo-a");
        assert_eq!(rx.recv().await.unwrap().session_id(), "demo-b");
    }
}

//! InvalidationScheduler - client handle for the scheduler task

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::events::{EventBus, HostEvent};
use crate::planning::PlanningInvocation;
use crate::session::Session;

use super::messages::{Invalidation, SchedulerCommand, SchedulerError, SchedulerSnapshot};
use super::task::SchedulerTask;

/// Handle to a running scheduler task
///
/// Cloneable; every clone talks to the same task. The task stops when
/// [`shutdown`](Self::shutdown) is called or the last handle is dropped.
#[derive(Clone)]
pub struct InvalidationScheduler {
    tx: mpsc::UnboundedSender<SchedulerCommand>,
    session_id: String,
    bus: EventBus,
}

impl InvalidationScheduler {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SchedulerCommand>, session_id: String, bus: EventBus) -> Self {
        Self { tx, session_id, bus }
    }

    /// Create the scheduler task for a session and spawn it on the current runtime
    pub fn spawn(
        session: Arc<dyn Session>,
        invocation: PlanningInvocation,
        bus: &EventBus,
        debounce: Duration,
    ) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        let (handle, task) = SchedulerTask::new(session, invocation, bus, debounce);
        runtime.spawn(task.run());
        Ok(handle)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Mark current plans invalid and schedule a replan
    ///
    /// Fire-and-forget: never blocks and never fails. After shutdown it
    /// does nothing.
    pub fn mark_invalid(&self) {
        self.invalidate(Invalidation::Requested);
    }

    /// [`mark_invalid`](Self::mark_invalid) with a recorded cause
    pub fn invalidate(&self, cause: Invalidation) {
        debug!(session_id = %self.session_id, %cause, "InvalidationScheduler::invalidate: called");
        if self.tx.send(SchedulerCommand::MarkInvalid { cause }).is_err() {
            debug!(session_id = %self.session_id, "InvalidationScheduler::invalidate: scheduler closed, ignoring");
        }
    }

    /// Events from the bus this scheduler publishes on
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.bus.subscribe()
    }

    /// Current state, after every previously sent command has been handled
    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, SchedulerError> {
        debug!(session_id = %self.session_id, "InvalidationScheduler::snapshot: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SchedulerCommand::Snapshot { reply_tx })
            .map_err(|_| SchedulerError::Closed)?;
        reply_rx.await.map_err(|_| SchedulerError::Closed)
    }

    /// Stop the scheduler task
    pub fn shutdown(&self) -> Result<(), SchedulerError> {
        debug!(session_id = %self.session_id, "InvalidationScheduler::shutdown: called");
        self.tx.send(SchedulerCommand::Shutdown).map_err(|_| SchedulerError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the scheduler task has stopped
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

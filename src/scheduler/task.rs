//! Scheduler task: owns SchedulerState and runs the replan loop

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Sleep;
use tracing::{debug, info, warn};

use crate::domain::PlanSet;
use crate::events::{EventBus, EventEmitter};
use crate::planning::{PlanOutcome, PlanningError, PlanningInvocation};
use crate::session::Session;

use super::handle::InvalidationScheduler;
use super::messages::{Invalidation, SchedulerCommand, SchedulerPhase, SchedulerSnapshot, SchedulerStats};

/// Quiet period before a burst of invalidations turns into a planning run
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type PlanningRun = JoinHandle<Result<PlanOutcome, PlanningError>>;

/// Process-local state, touched only by the scheduler task
#[derive(Default)]
struct SchedulerState {
    /// A change happened since the current (or last) planning call started
    invalid: bool,

    /// Set from arming the debounce timer until the final publish
    running: bool,

    pending_timer: Option<Pin<Box<Sleep>>>,

    inflight: Option<PlanningRun>,

    last_published: Option<PlanSet>,

    stats: SchedulerStats,
}

impl SchedulerState {
    fn phase(&self) -> SchedulerPhase {
        if self.pending_timer.is_some() {
            SchedulerPhase::Debouncing
        } else if self.running {
            SchedulerPhase::Planning
        } else {
            SchedulerPhase::Idle
        }
    }
}

/// The task behind an [`InvalidationScheduler`]
///
/// Create with [`SchedulerTask::new`] and drive with [`SchedulerTask::run`].
pub struct SchedulerTask {
    rx: mpsc::UnboundedReceiver<SchedulerCommand>,
    session: Arc<dyn Session>,
    invocation: PlanningInvocation,
    emitter: EventEmitter,
    debounce: Duration,
    state: SchedulerState,
}

impl SchedulerTask {
    /// Create a task and the handle that talks to it
    pub fn new(
        session: Arc<dyn Session>,
        invocation: PlanningInvocation,
        bus: &EventBus,
        debounce: Duration,
    ) -> (InvalidationScheduler, Self) {
        let session_id = session.id().to_string();
        debug!(%session_id, ?debounce, "SchedulerTask::new: called");
        let (tx, rx) = mpsc::unbounded_channel();
        let task = Self {
            rx,
            emitter: bus.emitter_for(session_id.clone()),
            session,
            invocation,
            debounce,
            state: SchedulerState::default(),
        };
        (InvalidationScheduler::new(tx, session_id, bus.clone()), task)
    }

    /// Run until shutdown is requested or every handle is dropped
    pub async fn run(mut self) {
        info!(session_id = %self.emitter.session_id(), debounce = ?self.debounce, "Invalidation scheduler started");

        loop {
            tokio::select! {
                // Invalidations queued alongside a finished run must be seen before it publishes
                biased;

                cmd = self.rx.recv() => match cmd {
                    Some(SchedulerCommand::MarkInvalid { cause }) => self.mark_invalid(cause),
                    Some(SchedulerCommand::Snapshot { reply_tx }) => {
                        let _ = reply_tx.send(self.snapshot());
                    }
                    Some(SchedulerCommand::Shutdown) | None => break,
                },

                () = debounce_elapsed(&mut self.state.pending_timer) => self.timer_fired(),

                joined = planning_finished(&mut self.state.inflight) => self.run_finished(joined),
            }
        }

        if self.state.inflight.is_some() {
            debug!("SchedulerTask::run: leaving in-flight planning call to finish unobserved");
        }
        info!(
            session_id = %self.emitter.session_id(),
            publishes = self.state.stats.publishes,
            "Invalidation scheduler stopped"
        );
    }

    fn mark_invalid(&mut self, cause: Invalidation) {
        let state = &mut self.state;
        state.stats.invalidations += 1;
        state.invalid = true;

        if state.running {
            debug!(%cause, phase = ?state.phase(), "SchedulerTask::mark_invalid: absorbed by current cycle");
            return;
        }

        info!(%cause, "Plans invalidated, clearing and scheduling replan");
        state.running = true;
        state.last_published = None;
        self.emitter.plans_cleared();

        state.pending_timer = Some(Box::pin(tokio::time::sleep(self.debounce)));
        state.stats.timers_armed += 1;
    }

    fn timer_fired(&mut self) {
        debug!("SchedulerTask::timer_fired: debounce elapsed");
        self.state.pending_timer = None;
        self.start_planning();
    }

    fn start_planning(&mut self) {
        self.state.invalid = false;
        self.state.stats.planning_runs += 1;
        debug!(run = self.state.stats.planning_runs, "SchedulerTask::start_planning: called");

        let invocation = self.invocation.clone();
        let session = Arc::clone(&self.session);
        self.state.inflight = Some(tokio::spawn(async move { invocation.run(session.as_ref()).await }));
    }

    fn run_finished(&mut self, joined: Result<Result<PlanOutcome, PlanningError>, JoinError>) {
        self.state.inflight = None;

        let result = joined.unwrap_or_else(|e| Err(PlanningError::Panicked(e.to_string())));
        let plans = match result {
            Ok(outcome) => {
                debug!(
                    plans = outcome.plans.len(),
                    generations = outcome.generations.len(),
                    "SchedulerTask::run_finished: planning succeeded"
                );
                outcome.plans
            }
            Err(e) => {
                warn!(error = %e, "Planning failed, substituting an empty plan set");
                self.state.stats.planning_failures += 1;
                PlanSet::empty()
            }
        };

        if self.state.invalid {
            debug!("SchedulerTask::run_finished: result went stale during the call, replanning");
            self.state.stats.stale_results += 1;
            self.start_planning();
            return;
        }

        self.publish(plans);
    }

    fn publish(&mut self, plans: PlanSet) {
        info!(plans = plans.len(), names = ?plans.names(), "Publishing plans");
        self.state.running = false;
        self.state.last_published = Some(plans.clone());
        self.state.stats.publishes += 1;
        self.emitter.plans_ready(plans);
    }

    fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            phase: self.state.phase(),
            invalid: self.state.invalid,
            running: self.state.running,
            last_published: self.state.last_published.clone(),
            stats: self.state.stats.clone(),
        }
    }
}

async fn debounce_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}

async fn planning_finished(run: &mut Option<PlanningRun>) -> Result<Result<PlanOutcome, PlanningError>, JoinError> {
    match run {
        Some(handle) => handle.await,
        None => pending().await,
    }
}

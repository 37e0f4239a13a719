//! ArcHost - wires a session to its scheduler, applier and event bus

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{Plan, PlanResolver, PlanSet};
use crate::events::{EventBus, EventEmitter, HostEvent};
use crate::manifest::{ManifestConfig, ManifestLoader};
use crate::planning::{Planner, PlanningInvocation};
use crate::scheduler::{Invalidation, InvalidationScheduler, SchedulerPhase, SchedulerSnapshot};
use crate::session::{ArcSession, Session};

use super::applier::{AppliedSignal, SuggestionApplier};
use super::config::HostConfig;
use super::error::HostError;

/// One live session and everything that keeps its plans current
///
/// Cheap to clone; clones share the session, scheduler and bus.
#[derive(Clone)]
pub struct ArcHost {
    session: Arc<dyn Session>,
    scheduler: InvalidationScheduler,
    applier: SuggestionApplier,
    bus: EventBus,
    emitter: EventEmitter,
    manifests: Arc<RwLock<ManifestConfig>>,
    config: HostConfig,
}

impl ArcHost {
    /// Start a host for an existing session on a new event bus
    pub fn start(config: &Config, session: Arc<dyn Session>, planner: Arc<dyn Planner>) -> Result<Self, HostError> {
        let bus = EventBus::new(config.host.event_capacity);
        Self::start_on(&bus, config, session, planner)
    }

    /// Start a host that publishes onto a shared event bus
    pub fn start_on(
        bus: &EventBus,
        config: &Config,
        session: Arc<dyn Session>,
        planner: Arc<dyn Planner>,
    ) -> Result<Self, HostError> {
        debug!(session_id = %session.id(), planner = planner.name(), "ArcHost::start_on: called");
        let host = config.host.clone();

        let invocation = PlanningInvocation::new(planner, host.planning_timeout(), host.planning_grace());
        let scheduler = InvalidationScheduler::spawn(Arc::clone(&session), invocation, bus, host.debounce())?;
        let emitter = bus.emitter_for(session.id().to_string());
        let applier = SuggestionApplier::new(Arc::clone(&session), emitter.clone(), host.settle_delay());

        info!(session_id = %session.id(), "Arc host started");
        Ok(Self {
            session,
            scheduler,
            applier,
            bus: bus.clone(),
            emitter,
            manifests: Arc::new(RwLock::new(config.manifest.clone())),
            config: host,
        })
    }

    /// Load the configured manifests into a fresh [`ArcSession`] and start a host for it
    pub async fn open(config: &Config, planner: Arc<dyn Planner>) -> Result<Self, HostError> {
        let context = ManifestLoader::new(config.manifest.clone()).load().await;
        let session = Arc::new(ArcSession::new(context)?);
        Self::start(config, session, planner)
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &InvalidationScheduler {
        &self.scheduler
    }

    /// Events from every host on this bus
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.bus.subscribe()
    }

    /// Ask for fresh plans; they arrive as `plans-ready`
    pub fn request_plans(&self) {
        debug!(session_id = %self.session_id(), "ArcHost::request_plans: called");
        self.scheduler.invalidate(Invalidation::Requested);
    }

    /// Request plans and wait for the set published for this session
    pub async fn plans(&self) -> Result<PlanSet, HostError> {
        if self.scheduler.is_closed() {
            return Err(HostError::SchedulerClosed);
        }
        let mut rx = self.subscribe();
        self.request_plans();
        self.next_plans(&mut rx).await
    }

    /// Wait on `rx` for this session's next `plans-ready`
    ///
    /// Fails with [`HostError::SchedulerClosed`] once the scheduler is gone,
    /// since nothing will publish for this session after that.
    pub async fn next_plans(&self, rx: &mut broadcast::Receiver<HostEvent>) -> Result<PlanSet, HostError> {
        loop {
            let received = tokio::select! {
                // Plans already on the bus win over a shutdown racing them
                biased;

                received = rx.recv() => received,
                () = self.scheduler.closed() => {
                    debug!(session_id = %self.session_id(), "ArcHost::next_plans: scheduler closed while waiting");
                    return Err(HostError::SchedulerClosed);
                }
            };

            match received {
                Ok(HostEvent::PlansReady { session_id, plans }) if session_id == self.session_id() => {
                    return Ok(plans);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "ArcHost::next_plans: subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(HostError::EventsClosed),
            }
        }
    }

    /// Current manifest selection
    pub async fn manifest_config(&self) -> ManifestConfig {
        self.manifests.read().await.clone()
    }

    /// Reload manifests into the session and replan
    ///
    /// From idle the scheduler emits the `plans-cleared` itself. Mid-cycle
    /// the clear is repeated here so subscribers learn the context moved.
    pub async fn reload_manifests(&self) {
        let config = self.manifest_config().await;
        debug!(imports = ?config.import_list(), "ArcHost::reload_manifests: called");

        let context = ManifestLoader::new(config).load().await;
        info!(
            session_id = %self.session_id(),
            recipes = context.recipes.len(),
            "Manifests reloaded"
        );
        self.session.replace_context(context).await;

        match self.scheduler.snapshot().await {
            Ok(snapshot) if snapshot.phase != SchedulerPhase::Idle => self.emitter.plans_cleared(),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "ArcHost::reload_manifests: scheduler unavailable"),
        }
        self.scheduler.invalidate(Invalidation::ManifestsChanged);
    }

    /// Change the manifest selection, then reload
    pub async fn update_manifests(&self, manifests: Vec<String>, exclusions: Vec<String>) {
        debug!(?manifests, ?exclusions, "ArcHost::update_manifests: called");
        {
            let mut config = self.manifests.write().await;
            config.manifests = manifests;
            config.exclusions = exclusions;
        }
        self.reload_manifests().await;
    }

    /// Apply a plan, then schedule a replan for the changed session
    pub async fn apply_suggestion(&self, plan: Plan) -> AppliedSignal {
        let signal = self.applier.apply(plan).await;
        self.scheduler.invalidate(Invalidation::PlanApplied);
        signal
    }

    /// Resolve a user reference (id, name or fragment) against `plans`
    pub fn find_plan(&self, plans: &PlanSet, reference: &str) -> Result<Plan, HostError> {
        match PlanResolver::new(plans.as_slice()).resolve(reference) {
            Ok(Some(plan)) => Ok(plan.clone()),
            Ok(None) => Err(HostError::PlanNotFound(reference.to_string())),
            Err(matches) => Err(HostError::AmbiguousPlan {
                reference: reference.to_string(),
                matches,
            }),
        }
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, HostError> {
        Ok(self.scheduler.snapshot().await?)
    }

    /// Stop the scheduler; later requests are ignored
    pub fn shutdown(&self) -> Result<(), HostError> {
        info!(session_id = %self.session_id(), "Arc host shutting down");
        Ok(self.scheduler.shutdown()?)
    }
}

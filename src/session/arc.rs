//! In-memory arc session

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{Plan, session_id};
use crate::manifest::ManifestContext;

use super::traits::Session;

/// Errors creating a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No async runtime available to host the session")]
    NoRuntime,
}

/// An arc living in this process
///
/// Instantiation runs on a spawned task after `install_delay`, so callers
/// cannot observe when it finishes.
pub struct ArcSession {
    id: String,
    context: RwLock<ManifestContext>,
    instantiated: Arc<RwLock<Vec<Plan>>>,
    install_delay: Duration,
    runtime: Handle,
}

impl ArcSession {
    /// Create a session with a fresh `demo-` id
    pub fn new(context: ManifestContext) -> Result<Self, SessionError> {
        Self::with_id(session_id(), context)
    }

    pub fn with_id(id: impl Into<String>, context: ManifestContext) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let id = id.into();
        info!(%id, recipes = context.recipes.len(), "Arc session created");
        Ok(Self {
            id,
            context: RwLock::new(context),
            instantiated: Arc::new(RwLock::new(Vec::new())),
            install_delay: Duration::ZERO,
            runtime,
        })
    }

    /// Simulated installation latency
    pub fn with_install_delay(mut self, delay: Duration) -> Self {
        self.install_delay = delay;
        self
    }
}

#[async_trait]
impl Session for ArcSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn instantiate(&self, plan: &Plan) {
        debug!(session_id = %self.id, plan_id = %plan.id, "ArcSession::instantiate: called");
        let plan = plan.clone();
        let instantiated = Arc::clone(&self.instantiated);
        let delay = self.install_delay;
        let session_id = self.id.clone();
        self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            info!(%session_id, plan_id = %plan.id, "Plan installed");
            instantiated.write().await.push(plan);
        });
    }

    async fn context(&self) -> ManifestContext {
        self.context.read().await.clone()
    }

    async fn replace_context(&self, context: ManifestContext) {
        debug!(session_id = %self.id, recipes = context.recipes.len(), "ArcSession::replace_context: called");
        *self.context.write().await = context;
    }

    async fn instantiated(&self) -> Vec<Plan> {
        self.instantiated.read().await.clone()
    }
}

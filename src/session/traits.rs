//! Session trait definition

use async_trait::async_trait;

use crate::domain::Plan;
use crate::manifest::ManifestContext;

/// The live execution context plans are instantiated into
///
/// Object-safe so hosts can hold `Arc<dyn Session>`.
#[async_trait]
pub trait Session: Send + Sync {
    /// Session identifier
    fn id(&self) -> &str;

    /// Start installing a plan into the session
    ///
    /// Fire-and-forget: returns before installation completes and offers
    /// no completion signal.
    fn instantiate(&self, plan: &Plan);

    /// Snapshot of the context planners read
    async fn context(&self) -> ManifestContext;

    /// Swap in a freshly loaded context
    async fn replace_context(&self, context: ManifestContext);

    /// Plans whose installation has finished
    async fn instantiated(&self) -> Vec<Plan>;
}

//! Planner that proposes the session's manifest recipes

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::Plan;
use crate::session::Session;

use super::error::PlanningError;
use super::planner::{Generation, Planner};

/// Proposes one plan per recipe in the session's context, skipping
/// recipes that are already instantiated
#[derive(Debug, Clone, Default)]
pub struct ManifestPlanner {
    max_plans: Option<usize>,
}

impl ManifestPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of proposals per call
    pub fn with_max_plans(mut self, max: usize) -> Self {
        self.max_plans = Some(max);
        self
    }
}

#[async_trait]
impl Planner for ManifestPlanner {
    fn name(&self) -> &str {
        "manifest"
    }

    async fn suggest(
        &self,
        session: &dyn Session,
        budget: Duration,
        generations: &mut Vec<Generation>,
    ) -> Result<Vec<Plan>, PlanningError> {
        debug!(session_id = session.id(), ?budget, "ManifestPlanner::suggest: called");
        let started = Instant::now();

        let context = session.context().await;
        let installed: HashSet<String> = session.instantiated().await.into_iter().map(|p| p.id).collect();

        let candidates: Vec<Plan> = context.recipes.iter().map(|r| r.to_plan()).collect();
        generations.push(Generation::new(0, &candidates, started.elapsed()));

        let mut plans: Vec<Plan> = candidates.into_iter().filter(|p| !installed.contains(&p.id)).collect();
        if let Some(max) = self.max_plans {
            plans.truncate(max);
        }
        generations.push(Generation::new(1, &plans, started.elapsed()));

        debug!(plans = plans.len(), installed = installed.len(), "ManifestPlanner::suggest: done");
        Ok(plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestContext, Recipe};
    use crate::session::ArcSession;

    fn context(names: &[&str]) -> ManifestContext {
        let mut ctx = ManifestContext::empty();
        ctx.merge(
            "test.yml",
            names
                .iter()
                .map(|n| Recipe {
                    name: n.to_string(),
                    description: String::new(),
                    particles: vec![],
                })
                .collect(),
        );
        ctx
    }

    #[tokio::test]
    async fn test_proposes_every_recipe() {
        let session = ArcSession::new(context(&["Products", "Gifts"])).unwrap();
        let mut generations = Vec::new();

        let plans = ManifestPlanner::new()
            .suggest(&session, Duration::from_secs(1), &mut generations)
            .await
            .unwrap();

        let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["plan-products", "plan-gifts"]);
        assert_eq!(generations.len(), 2);
    }

    #[tokio::test]
    async fn test_skips_instantiated_recipes() {
        let session = ArcSession::new(context(&["Products", "Gifts"])).unwrap();
        session.instantiate(&Plan::from_recipe("Products", ""));
        while session.instantiated().await.is_empty() {
            tokio::task::yield_now().await;
        }

        let mut generations = Vec::new();
        let plans = ManifestPlanner::new()
            .suggest(&session, Duration::from_secs(1), &mut generations)
            .await
            .unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, "plan-gifts");
        assert_eq!(generations[0].candidates.len(), 2);
    }

    #[tokio::test]
    async fn test_max_plans() {
        let session = ArcSession::new(context(&["A", "B", "C"])).unwrap();
        let mut generations = Vec::new();

        let plans = ManifestPlanner::new()
            .with_max_plans(2)
            .suggest(&session, Duration::from_secs(1), &mut generations)
            .await
            .unwrap();
        assert_eq!(plans.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_context_yields_nothing() {
        let session = ArcSession::new(ManifestContext::empty()).unwrap();
        let mut generations = Vec::new();

        let plans = ManifestPlanner::new()
            .suggest(&session, Duration::from_secs(1), &mut generations)
            .await
            .unwrap();
        assert!(plans.is_empty());
    }
}

//! Plan and PlanSet types

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::id::plan_id;

/// A candidate recipe the planner proposes for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Stable identifier derived from the recipe name
    pub id: String,

    /// Recipe name as written in the manifest
    pub name: String,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// Particles the recipe wires together
    #[serde(default)]
    pub particles: Vec<String>,
}

impl Plan {
    /// Create a plan for a named recipe with no particles
    pub fn from_recipe(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: plan_id(&name),
            name,
            description: description.into(),
            particles: Vec::new(),
        }
    }

    /// Attach the particle list
    pub fn with_particles(mut self, particles: Vec<String>) -> Self {
        self.particles = particles;
        self
    }
}

/// The immutable result of one planning run
///
/// Cloning shares the underlying slice. A PlanSet is only ever replaced
/// as a whole, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Plan>", into = "Vec<Plan>")]
pub struct PlanSet(Arc<[Plan]>);

impl PlanSet {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self(plans.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Plan] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.0.iter()
    }

    /// Names of the contained plans, in order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }
}

impl From<Vec<Plan>> for PlanSet {
    fn from(plans: Vec<Plan>) -> Self {
        Self::new(plans)
    }
}

impl From<PlanSet> for Vec<Plan> {
    fn from(set: PlanSet) -> Self {
        set.0.to_vec()
    }
}

impl<'a> IntoIterator for &'a PlanSet {
    type Item = &'a Plan;
    type IntoIter = std::slice::Iter<'a, Plan>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

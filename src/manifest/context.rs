//! The context a session plans against

use serde::{Deserialize, Serialize};

use crate::domain::Plan;

/// A recipe declared by a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub particles: Vec<String>,
}

impl Recipe {
    /// Turn the recipe into a candidate plan
    pub fn to_plan(&self) -> Plan {
        Plan::from_recipe(&self.name, &self.description).with_particles(self.particles.clone())
    }
}

/// Merged recipes of every imported manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestContext {
    /// Imports in the order they were loaded
    pub imports: Vec<String>,

    /// Recipes in import order; later duplicates of a name are dropped
    pub recipes: Vec<Recipe>,
}

impl ManifestContext {
    /// The empty context used when manifests cannot be loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Add a manifest's recipes, skipping names already present
    pub fn merge(&mut self, import: impl Into<String>, recipes: Vec<Recipe>) {
        self.imports.push(import.into());
        for recipe in recipes {
            if !self.recipes.iter().any(|r| r.name == recipe.name) {
                self.recipes.push(recipe);
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }
}

//! Identifier generation and resolution
//!
//! Plan IDs use the format `plan-{slug}` so they stay stable across
//! planning runs. Session IDs use `demo-{12-char-hex}`.

use tracing::debug;

use super::plan::Plan;

/// Generate a fresh session ID
pub fn session_id() -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    // v7 UUIDs lead with the timestamp; take the random tail
    format!("demo-{}", &uuid[uuid.len() - 12..])
}

/// Derive a stable plan ID from a recipe name
pub fn plan_id(recipe: &str) -> String {
    format!("plan-{}", slugify(recipe))
}

/// Slugify a title for use in IDs
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Resolves a user-supplied reference (full ID, name, or fragment) to a plan
pub struct PlanResolver<'a> {
    plans: &'a [Plan],
}

impl<'a> PlanResolver<'a> {
    pub fn new(plans: &'a [Plan]) -> Self {
        Self { plans }
    }

    /// Resolve a reference to exactly one plan
    ///
    /// Returns:
    /// - Ok(Some(plan)) if exactly one match (exact ID or name wins outright)
    /// - Ok(None) if no matches
    /// - Err with candidate IDs if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<&'a Plan>, Vec<String>> {
        debug!(%reference, candidates = self.plans.len(), "PlanResolver::resolve: called");
        if let Some(plan) = self
            .plans
            .iter()
            .find(|p| p.id == reference || p.name == reference)
        {
            return Ok(Some(plan));
        }

        let matches: Vec<&'a Plan> = self.plans.iter().filter(|p| Self::matches(p, reference)).collect();
        match matches.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            many => Err(many.iter().map(|p| p.id.clone()).collect()),
        }
    }

    fn matches(plan: &Plan, reference: &str) -> bool {
        let needle = slugify(reference);
        !needle.is_empty() && plan.id.contains(&needle)
    }
}

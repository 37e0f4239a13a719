//! Manifest context loading
//!
//! A session plans against a [`ManifestContext`]: the recipes declared by
//! the configured manifest files. Loading is all-or-nothing; a malformed
//! or unreadable manifest yields an empty context so the host keeps
//! running with zero plans.

mod config;
mod context;
mod error;
mod loader;

pub use config::ManifestConfig;
pub use context::{ManifestContext, Recipe};
pub use error::ManifestError;
pub use loader::ManifestLoader;

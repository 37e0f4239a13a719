//! Watcher module for manifest file monitoring
//!
//! The ManifestWatcher polls the files behind a host's manifest selection
//! and reloads the host when any of them change.

mod config;
mod manifest_watcher;

pub use config::WatcherConfig;
pub use manifest_watcher::{Fingerprint, ManifestWatcher};

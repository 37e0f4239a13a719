//! archost configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::host::HostConfig;
use crate::manifest::ManifestConfig;
use crate::watcher::WatcherConfig;

/// Main archost configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheduler and applier timing
    pub host: HostConfig,

    /// Which manifests make up the session context
    pub manifest: ManifestConfig,

    /// Manifest file polling
    pub watcher: WatcherConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. The implicit locations are tried in
    /// order and skipped with a warning when they fail to parse.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .archost.yml
        let local_config = PathBuf::from(".archost.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/archost/archost.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("archost").join("archost.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        // Relative manifest roots are relative to the config file, not the cwd
        if let Some(parent) = path.as_ref().parent() {
            config.manifest.anchor_root(parent);
        }

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

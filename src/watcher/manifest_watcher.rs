//! Manifest file watcher implementation

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;

use eyre::{Context, Result};
use tracing::{debug, error, info};

use super::config::WatcherConfig;
use crate::host::ArcHost;

/// State of one manifest file: modification time and size, `None` if missing
pub type FileStamp = Option<(Option<SystemTime>, u64)>;

/// Stamps of every imported manifest, in import order
pub type Fingerprint = Vec<(PathBuf, FileStamp)>;

/// The ManifestWatcher reloads a host when its manifest files change
pub struct ManifestWatcher {
    config: WatcherConfig,
    host: ArcHost,
    last_fingerprint: Option<Fingerprint>,
}

impl ManifestWatcher {
    /// Create a new ManifestWatcher
    pub fn new(config: WatcherConfig, host: ArcHost) -> Self {
        Self {
            config,
            host,
            last_fingerprint: None,
        }
    }

    /// Stamp every manifest the host currently imports
    async fn fingerprint(&self) -> Result<Fingerprint> {
        let manifests = self.host.manifest_config().await;
        let mut fingerprint = Vec::new();

        for import in manifests.import_list() {
            let path = manifests.resolve(&import);
            let stamp = match tokio::fs::metadata(&path).await {
                Ok(meta) => Some((meta.modified().ok(), meta.len())),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => return Err(e).context(format!("Failed to stat {}", path.display())),
            };
            fingerprint.push((path, stamp));
        }

        Ok(fingerprint)
    }

    /// Check for changes and reload the host if any manifest moved
    async fn check_for_updates(&mut self) -> Result<bool> {
        let current = self.fingerprint().await?;

        // Check if this is our first run
        let Some(last) = &self.last_fingerprint else {
            debug!(files = current.len(), "Initial manifest fingerprint");
            self.last_fingerprint = Some(current);
            return Ok(false);
        };

        if &current != last {
            let changed: Vec<String> = current
                .iter()
                .filter(|entry| !last.contains(entry))
                .map(|(path, _)| path.display().to_string())
                .collect();
            info!(?changed, session_id = %self.host.session_id(), "Manifests changed");

            self.last_fingerprint = Some(current);
            self.host.reload_manifests().await;
            return Ok(true);
        }

        debug!("Manifests unchanged");
        Ok(false)
    }

    /// Run the watcher loop
    ///
    /// Polls until the host's scheduler shuts down.
    pub async fn run(mut self) -> Result<()> {
        info!(
            interval_ms = self.config.poll_interval_ms,
            session_id = %self.host.session_id(),
            "ManifestWatcher started"
        );

        loop {
            if let Err(e) = self.check_for_updates().await {
                error!(error = %e, "Error checking manifests");
            }

            if self.host.scheduler().is_closed() {
                info!("ManifestWatcher stopping, host shut down");
                return Ok(());
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    /// Run a single check (useful for testing)
    pub async fn check_once(&mut self) -> Result<bool> {
        self.check_for_updates().await
    }

    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_fingerprint.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::planning::ManifestPlanner;
    use crate::session::Session;
    use std::fs;
    use std::sync::Arc;

    async fn host_for(dir: &std::path::Path, manifests: &[&str]) -> ArcHost {
        let mut config = Config::default();
        config.manifest.root = dir.to_path_buf();
        config.manifest.manifests = manifests.iter().map(|m| m.to_string()).collect();
        ArcHost::open(&config, Arc::new(ManifestPlanner::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_check_records_baseline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yml"), "recipes: []\n").unwrap();
        let host = host_for(dir.path(), &["a.yml", "missing.yml"]).await;
        let mut watcher = ManifestWatcher::new(WatcherConfig::default(), host);

        assert!(!watcher.check_once().await.unwrap());
        let fingerprint = watcher.last_fingerprint().unwrap();
        assert_eq!(fingerprint.len(), 2);
        assert!(fingerprint[0].1.is_some());
        assert!(fingerprint[1].1.is_none());

        assert!(!watcher.check_once().await.unwrap());
    }

    #[tokio::test]
    async fn test_change_reloads_host() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("a.yml");
        fs::write(&manifest, "recipes: []\n").unwrap();
        let host = host_for(dir.path(), &["a.yml"]).await;
        let mut rx = host.subscribe();
        let mut watcher = ManifestWatcher::new(WatcherConfig::default(), host.clone());

        watcher.check_once().await.unwrap();
        fs::write(&manifest, "recipes:\n  - name: Show Gifts\n").unwrap();

        assert!(watcher.check_once().await.unwrap());
        assert_eq!(rx.recv().await.unwrap().event_type(), "plans-cleared");
        assert!(host.session().context().await.find("Show Gifts").is_some());
    }

    #[tokio::test]
    async fn test_new_file_counts_as_change() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_for(dir.path(), &["late.yml"]).await;
        let mut watcher = ManifestWatcher::new(WatcherConfig::default(), host);

        assert!(!watcher.check_once().await.unwrap());
        fs::write(dir.path().join("late.yml"), "recipes: []\n").unwrap();
        assert!(watcher.check_once().await.unwrap());
    }

    #[tokio::test]
    async fn test_run_stops_after_host_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_for(dir.path(), &[]).await;
        let watcher = ManifestWatcher::new(
            WatcherConfig {
                poll_interval_ms: 10,
                ..Default::default()
            },
            host.clone(),
        );

        let task = tokio::spawn(watcher.run());
        host.shutdown().unwrap();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}

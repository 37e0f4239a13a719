//! Manifest configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which manifest files make up a session's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Directory manifest paths are resolved against
    pub root: PathBuf,

    /// Manifests to import
    pub manifests: Vec<String>,

    /// Extra manifest appended after `manifests`
    #[serde(rename = "manifest-path")]
    pub manifest_path: Option<String>,

    /// When set, the only manifest imported
    #[serde(rename = "solo-path")]
    pub solo_path: Option<String>,

    /// Manifests removed from `manifests`
    pub exclusions: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            manifests: Vec::new(),
            manifest_path: None,
            solo_path: None,
            exclusions: Vec::new(),
        }
    }
}

impl ManifestConfig {
    /// `manifests` minus `exclusions`, order preserved
    pub fn effective_manifests(&self) -> Vec<String> {
        self.manifests
            .iter()
            .filter(|m| !self.exclusions.contains(m))
            .cloned()
            .collect()
    }

    /// The import list: the solo path alone, or the effective manifests
    /// followed by `manifest_path`
    pub fn import_list(&self) -> Vec<String> {
        if let Some(solo) = &self.solo_path {
            debug!(%solo, "ManifestConfig::import_list: solo path set");
            return vec![solo.clone()];
        }

        let mut imports = self.effective_manifests();
        if let Some(extra) = &self.manifest_path {
            imports.push(extra.clone());
        }
        imports
    }

    /// Resolve an import against `root` (absolute imports pass through)
    pub fn resolve(&self, import: &str) -> PathBuf {
        let path = Path::new(import);
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }

    /// Make a relative root relative to `base`
    pub fn anchor_root(&mut self, base: &Path) {
        if self.root.is_absolute() {
            return;
        }
        self.root = if self.root == Path::new(".") {
            base.to_path_buf()
        } else {
            base.join(&self.root)
        };
    }
}

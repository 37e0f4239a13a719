//! Manifest loader

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::config::ManifestConfig;
use super::context::{ManifestContext, Recipe};
use super::error::ManifestError;

/// On-disk manifest layout
#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

/// Loads the manifest context described by a [`ManifestConfig`]
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    config: ManifestConfig,
}

impl ManifestLoader {
    pub fn new(config: ManifestConfig) -> Self {
        Self { config }
    }

    /// Load the context, falling back to an empty one on any error
    pub async fn load(&self) -> ManifestContext {
        match self.try_load().await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "Manifest configuration invalid, using empty context");
                ManifestContext::empty()
            }
        }
    }

    /// Load every import; the first failure aborts the whole load
    pub async fn try_load(&self) -> Result<ManifestContext, ManifestError> {
        let imports = self.config.import_list();
        debug!(?imports, root = %self.config.root.display(), "ManifestLoader::try_load: called");

        let mut context = ManifestContext::empty();
        for import in imports {
            let path = self.config.resolve(&import);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ManifestError::Read {
                    path: path.clone(),
                    source,
                })?;

            let file: ManifestFile = if content.trim().is_empty() {
                ManifestFile::default()
            } else {
                serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
                    path: path.clone(),
                    source,
                })?
            };

            debug!(%import, recipes = file.recipes.len(), "ManifestLoader::try_load: parsed");
            context.merge(import, file.recipes);
        }

        info!(
            imports = context.imports.len(),
            recipes = context.recipes.len(),
            "Manifest context loaded"
        );
        Ok(context)
    }
}

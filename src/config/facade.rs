//! Config loader: assembles the layered sources into an [`ExplorerConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ExplorerConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads configuration for a workspace.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the given workspace root.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace file, environment.
    pub fn load(workspace_root: &Path) -> Result<ExplorerConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: ExplorerConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from an explicit file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<ExplorerConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Path of the workspace-local config file.
    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }
}

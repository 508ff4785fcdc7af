//! Merge rules: defaults, override order, conflict handling.

use crate::config::ExplorerConfig;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder seeded with the serialized built-in defaults.
///
/// Later sources override individual keys; lists are replaced wholesale.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    let defaults = Config::try_from(&ExplorerConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

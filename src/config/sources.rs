//! Config sources: global file and environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable prefix (`MIRRORSYNC_SYNC__INTERVAL_SECS=30`)
pub const ENV_PREFIX: &str = "MIRRORSYNC";

/// Path to the global config file, e.g. `$XDG_CONFIG_HOME/mirrorsync/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mirrorsync").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_global_file(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match global_config_path() {
        Some(path) if path.is_file() => Ok(builder.add_source(File::from(path).required(false))),
        Some(path) => {
            debug!(config_path = %path.display(), "No global configuration file");
            Ok(builder)
        }
        None => Ok(builder),
    }
}

/// Add `MIRRORSYNC_<SECTION>__<KEY>` environment overrides.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

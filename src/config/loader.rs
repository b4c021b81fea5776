//! Config loader facade: builds a `MirrorConfig` from layered sources.

use super::sources;
use super::MirrorConfig;
use crate::error::SyncError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File};
use std::path::Path;

/// Loads and validates configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then `explicit`, then environment.
    pub fn load(explicit: Option<&Path>) -> Result<MirrorConfig, SyncError> {
        let mut builder = sources::add_global_file(Config::builder())?;
        if let Some(path) = explicit {
            builder = Self::add_explicit(builder, path)?;
        }
        builder = sources::add_environment(builder);
        Self::finish(builder)
    }

    /// Load a single file over the defaults, ignoring global file and environment.
    pub fn load_from_file(path: &Path) -> Result<MirrorConfig, SyncError> {
        let builder = Self::add_explicit(Config::builder(), path)?;
        Self::finish(builder)
    }

    fn add_explicit(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
    ) -> Result<ConfigBuilder<DefaultState>, SyncError> {
        if !path.is_file() {
            return Err(SyncError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Ok(builder.add_source(File::from(path).required(true)))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<MirrorConfig, SyncError> {
        let config: MirrorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

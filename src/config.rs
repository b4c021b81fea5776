//! Configuration System
//!
//! Layered configuration: built-in defaults, the user's global config file, an explicit
//! `--config` file, then `MIRRORSYNC_*` environment variables. CLI flags are applied on
//! top by the binary.

use crate::error::SyncError;
use crate::lock::DEFAULT_SENTINEL;
use crate::logging::LoggingConfig;
use crate::tree::fingerprint::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod loader;
mod sources;

pub use loader::ConfigLoader;
pub use sources::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MirrorConfig {
    /// Source and replica roots, when not given on the command line
    #[serde(default)]
    pub roots: RootsConfig,

    /// Engine settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree roots
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RootsConfig {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
}

/// Sync engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Seconds between passes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Descend through symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Name of the per-directory lock sentinel; never mirrored
    #[serde(default = "default_sentinel_name")]
    pub sentinel_name: String,

    /// Read buffer size for fingerprinting
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_sentinel_name() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            follow_symlinks: false,
            sentinel_name: default_sentinel_name(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_secs == 0 {
            return Err("Interval must be a positive number of seconds".to_string());
        }
        if self.chunk_size == 0 {
            return Err("Chunk size must be positive".to_string());
        }
        let name = self.sentinel_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(format!("Invalid sentinel name: {:?}", self.sentinel_name));
        }
        Ok(())
    }
}

impl MirrorConfig {
    /// Validate every section, collecting all problems
    pub fn validate(&self) -> Result<(), SyncError> {
        let mut errors = Vec::new();
        if let Err(e) = self.sync.validate() {
            errors.push(format!("sync: {}", e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(format!("logging: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SyncError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, SyncError> {
        toml::to_string_pretty(self)
            .map_err(|e| SyncError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

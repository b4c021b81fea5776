//! Logging System
//!
//! Structured logging using the `tracing` crate. The process-wide subscriber writes to the
//! console and to a size-rotated log file; the sync engine itself never touches it directly
//! and only sees the [`Logger`] capability handed to it.

mod capability;
mod rotation;

pub use capability::{Logger, MemoryLogger, Severity, TracingLogger};
pub use rotation::RotatingFileWriter;

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "MIRRORSYNC_LOG";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Mirror log lines to stdout
    #[serde(default = "default_true")]
    pub console: bool,

    /// Log file path; no file output when unset
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Maximum log file size before rotation (bytes, 0 disables rotation)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Number of rotated log files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Enable colored console output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024 // 5 MiB
}

fn default_max_files() -> usize {
    5
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            console: default_true(),
            file: None,
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            color: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Validate level and format values
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(
            self.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(format!(
                "Invalid log level: {} (must be trace, debug, info, warn, error or off)",
                self.level
            ));
        }
        if self.format != "json" && self.format != "text" {
            return Err(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                self.format
            ));
        }
        Ok(())
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Initialize the process-wide subscriber
///
/// `MIRRORSYNC_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SyncError> {
    config.validate().map_err(SyncError::ConfigError)?;

    let filter = build_env_filter(config);
    let json = config.format == "json";

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console {
        let layer: BoxedLayer = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stdout)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(config.color)
                .with_writer(std::io::stdout)
                .boxed()
        };
        layers.push(layer);
    }

    if let Some(ref path) = config.file {
        let writer = RotatingFileWriter::new(path, config.max_file_size, config.max_files)
            .map_err(|e| {
                SyncError::ConfigError(format!("Failed to open log file {:?}: {}", path, e))
            })?;
        let layer: BoxedLayer = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(writer)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(writer)
                .boxed()
        };
        layers.push(layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| SyncError::ConfigError(format!("Failed to install subscriber: {}", e)))
}

/// Build the filter from `MIRRORSYNC_LOG` or the configured level
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    EnvFilter::new(config.level.as_str())
}

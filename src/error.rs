//! Error types for the mirrorsync engine.

use std::path::PathBuf;
use thiserror::Error;

/// Lock manager errors
///
/// These never escape the lock manager; they are rendered into log lines at the
/// point of failure.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to open sentinel {path:?}: {source}")]
    SentinelOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Folder already locked by another holder: {0:?}")]
    AlreadyHeld(PathBuf),

    #[error("Failed to acquire advisory lock on {path:?}: {source}")]
    Acquire {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to release advisory lock on {path:?}: {source}")]
    Release {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove sentinel {path:?}: {source}")]
    SentinelRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Orchestration-level and precondition errors
///
/// Anything returned as a `SyncError` is fatal for the process.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source folder does not exist: {0:?}")]
    SourceMissing(PathBuf),

    #[error("Replica folder does not exist and was not created: {0:?}")]
    ReplicaDeclined(PathBuf),

    #[error("Failed to create replica folder {path:?}: {source}")]
    ReplicaCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Source and replica overlap: {source_root:?} and {replica_root:?}")]
    OverlappingRoots {
        source_root: PathBuf,
        replica_root: PathBuf,
    },

    #[error("Tree root unavailable during pass: {path:?}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}

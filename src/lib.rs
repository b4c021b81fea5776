//! Mirrorsync: One-Way Folder Mirroring
//!
//! Keeps a replica directory tree identical to a source tree. Each pass locks both trees
//! with advisory per-directory locks, creates missing directories, copies new or changed
//! files (detected by content fingerprint), removes extras, and unlocks.

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod sync;
pub mod tree;

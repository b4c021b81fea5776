//! Filesystem trees
//!
//! Live traversal of source and replica trees, relative paths as the join key between
//! them, and content fingerprints for change detection.

pub mod fingerprint;
pub mod path;
pub mod walker;

//! Synchronization engine
//!
//! Makes a replica tree converge to a source tree, one pass at a time.

mod engine;
mod orchestrator;
mod report;

pub use engine::{DiffEngine, FileCopier, PreservingCopy};
pub use orchestrator::{sync_once, Orchestrator};
pub use report::SyncReport;

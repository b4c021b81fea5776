//! Per-pass counters

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What one pass did
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub directories_created: usize,
    pub files_copied: usize,
    pub files_unchanged: usize,
    pub files_removed: usize,
    pub directories_removed: usize,
    /// Entries whose operation failed and was skipped
    pub entry_failures: usize,
    pub locks_acquired: usize,
    /// Locks whose release did not fully succeed
    pub locks_unreleased: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            directories_created: 0,
            files_copied: 0,
            files_unchanged: 0,
            files_removed: 0,
            directories_removed: 0,
            entry_failures: 0,
            locks_acquired: 0,
            locks_unreleased: 0,
        }
    }

    /// Total replica mutations
    pub fn mutations(&self) -> usize {
        self.directories_created + self.files_copied + self.files_removed + self.directories_removed
    }

    /// True when the pass changed nothing and hit no failures
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0 && self.entry_failures == 0
    }

    /// One-line summary used in the completion log
    pub fn summary(&self) -> String {
        format!(
            "{} directories created, {} files copied, {} files removed, {} directories removed, {} failures",
            self.directories_created,
            self.files_copied,
            self.files_removed,
            self.directories_removed,
            self.entry_failures
        )
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}

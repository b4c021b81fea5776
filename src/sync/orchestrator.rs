//! Sync Orchestrator
//!
//! One pass: lock source, lock replica, diff and apply, unlock both. The pass is the
//! fault barrier: per-entry faults stay inside the engine, anything that escapes it is
//! an orchestration fault, logged here and returned for the caller to end the process.

use super::engine::{ensure_root, DiffEngine, FileCopier, PreservingCopy};
use super::report::SyncReport;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::lock::{AdvisoryLock, FolderLockManager, LockPrimitive};
use crate::logging::Logger;
use std::path::Path;
use std::time::Instant;

/// Runs synchronization passes over a source/replica pair
pub struct Orchestrator<'a, P: LockPrimitive = AdvisoryLock, C: FileCopier = PreservingCopy> {
    locks: FolderLockManager<'a, P>,
    engine: DiffEngine<'a, C>,
    logger: &'a dyn Logger,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &SyncConfig, logger: &'a dyn Logger) -> Self {
        let locks = FolderLockManager::with_primitive(AdvisoryLock, &config.sentinel_name, logger)
            .follow_symlinks(config.follow_symlinks);
        let engine = DiffEngine::new(config, logger);
        Self::from_parts(locks, engine, logger)
    }
}

impl<'a, P: LockPrimitive, C: FileCopier> Orchestrator<'a, P, C> {
    pub fn from_parts(
        locks: FolderLockManager<'a, P>,
        engine: DiffEngine<'a, C>,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            locks,
            engine,
            logger,
        }
    }

    /// Run exactly one pass.
    ///
    /// Locks taken by this pass are released before it returns, even on `Err`.
    pub fn run_once(&self, source: &Path, replica: &Path) -> Result<SyncReport, SyncError> {
        self.logger.info(&format!(
            "Starting synchronization from {} to {}",
            source.display(),
            replica.display()
        ));
        let started = Instant::now();
        let mut report = SyncReport::new();

        let result = self.locked_pass(source, replica, &mut report);
        report.duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                self.logger.info(&format!(
                    "Synchronization completed ({})",
                    report.summary()
                ));
                Ok(report)
            }
            Err(e) => {
                self.logger.error(&format!(
                    "An error occurred during synchronization: {}",
                    e
                ));
                Err(e)
            }
        }
    }

    fn locked_pass(
        &self,
        source: &Path,
        replica: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        ensure_root(source)?;
        ensure_root(replica)?;

        let source_locks = self.locks.lock_all_folders(source);
        let replica_locks = self.locks.lock_all_folders(replica);
        report.locks_acquired = source_locks.len() + replica_locks.len();

        let applied = self.engine.apply(source, replica, report);

        let source_unlock = self.locks.unlock_all_folders(source_locks);
        let replica_unlock = self.locks.unlock_all_folders(replica_locks);
        report.locks_unreleased = source_unlock.incomplete + replica_unlock.incomplete;
        if report.locks_unreleased > 0 {
            self.logger.warning(&format!(
                "{} folder locks were not fully released",
                report.locks_unreleased
            ));
        }

        applied
    }
}

/// One pass with default settings
pub fn sync_once(
    source: &Path,
    replica: &Path,
    logger: &dyn Logger,
) -> Result<SyncReport, SyncError> {
    Orchestrator::new(&SyncConfig::default(), logger).run_once(source, replica)
}

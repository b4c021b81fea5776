//! One failing entry is logged and skipped; the rest of the pass still runs.

use super::test_utils::{write_file, TreePair};
use mirrorsync::config::SyncConfig;
use mirrorsync::lock::FolderLockManager;
use mirrorsync::logging::{MemoryLogger, Severity};
use mirrorsync::sync::{DiffEngine, FileCopier, Orchestrator, PreservingCopy};
use std::io;
use std::path::Path;

/// Fails for one file name and copies everything else normally
struct FailOn(&'static str);

impl FileCopier for FailOn {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if from.file_name().and_then(|n| n.to_str()) == Some(self.0) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"));
        }
        PreservingCopy.copy(from, to)
    }
}

#[test]
fn test_failed_copy_does_not_stop_pass() {
    let trees = TreePair::new();
    write_file(&trees.source, "A.txt", "a");
    write_file(&trees.source, "B.txt", "b");
    write_file(&trees.source, "C.txt", "c");
    write_file(&trees.replica, "extra.txt", "extra");

    let logger = MemoryLogger::new();
    let config = SyncConfig::default();
    let orchestrator = Orchestrator::from_parts(
        FolderLockManager::new(&logger),
        DiffEngine::with_copier(&config, FailOn("B.txt"), &logger),
        &logger,
    );

    let report = orchestrator.run_once(&trees.source, &trees.replica).unwrap();

    assert!(trees.replica.join("A.txt").exists());
    assert!(!trees.replica.join("B.txt").exists());
    assert!(trees.replica.join("C.txt").exists());
    assert!(!trees.replica.join("extra.txt").exists());
    assert_eq!(report.files_copied, 2);
    assert_eq!(report.entry_failures, 1);
    assert!(logger.contains(Severity::Error, "Error copying file"));
    assert!(logger.contains(Severity::Error, "injected failure"));
    assert!(logger.contains(Severity::Info, "Synchronization completed"));
}

#[test]
fn test_failed_file_retried_next_pass() {
    let trees = TreePair::new();
    write_file(&trees.source, "dir/flaky.txt", "eventually");

    let logger = MemoryLogger::new();
    let config = SyncConfig::default();
    let failing = Orchestrator::from_parts(
        FolderLockManager::new(&logger),
        DiffEngine::with_copier(&config, FailOn("flaky.txt"), &logger),
        &logger,
    );
    let report = failing.run_once(&trees.source, &trees.replica).unwrap();
    assert_eq!(report.entry_failures, 1);

    let healthy = Orchestrator::new(&config, &logger);
    let report = healthy.run_once(&trees.source, &trees.replica).unwrap();
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.entry_failures, 0);
    assert!(trees.replica.join("dir/flaky.txt").exists());
}

#[test]
fn test_vanished_replica_root_fails_pass() {
    let trees = TreePair::new();
    write_file(&trees.source, "a.txt", "a");
    std::fs::remove_dir(&trees.replica).unwrap();

    let logger = MemoryLogger::new();
    let config = SyncConfig::default();
    let err = Orchestrator::new(&config, &logger)
        .run_once(&trees.source, &trees.replica)
        .unwrap_err();

    assert!(err.to_string().contains(&trees.replica.display().to_string()));
    assert!(logger.contains(Severity::Error, "An error occurred during synchronization"));
}

//! Folder locks: held sentinels are skipped, stale ones are reclaimed.

use super::test_utils::{assert_mirrored, write_file, TreePair};
use fs2::FileExt;
use mirrorsync::lock::FolderLockManager;
use mirrorsync::logging::{MemoryLogger, Severity};
use mirrorsync::sync::sync_once;
use std::fs::{self, OpenOptions};

#[test]
fn test_externally_held_folder_skipped_but_pass_runs() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/b/file.txt", "content");

    let held = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(trees.source.join("a/.lock"))
        .unwrap();
    held.try_lock_exclusive().unwrap();

    let logger = MemoryLogger::new();
    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert!(logger.contains(Severity::Error, "Unable to lock folder"));
    assert_eq!(report.locks_acquired, 0);
    assert_mirrored(&trees.source, &trees.replica);
    // Not ours to remove
    assert!(trees.source.join("a/.lock").exists());

    FileExt::unlock(&held).unwrap();
}

#[test]
fn test_stale_sentinel_reclaimed() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/b/file.txt", "content");
    fs::write(trees.source.join("a/.lock"), "99999\n").unwrap();

    let logger = MemoryLogger::new();
    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert!(logger.contains(Severity::Info, "Locked folder:"));
    assert!(report.locks_acquired >= 1);
    assert!(!trees.source.join("a/.lock").exists());
    assert!(!trees.replica.join("a/.lock").exists());
}

#[test]
fn test_second_manager_cannot_take_held_lock() {
    let trees = TreePair::new();
    fs::create_dir_all(trees.source.join("a/b")).unwrap();

    let first_logger = MemoryLogger::new();
    let second_logger = MemoryLogger::new();
    let first = FolderLockManager::new(&first_logger);
    let second = FolderLockManager::new(&second_logger);

    let held = first.lock_all_folders(&trees.source);
    assert_eq!(held.len(), 1);

    let contended = second.lock_all_folders(&trees.source);
    assert!(contended.is_empty());
    assert!(second_logger.contains(Severity::Error, "Unable to lock folder"));

    let summary = first.unlock_all_folders(held);
    assert_eq!(summary.released, 1);
    assert_eq!(summary.incomplete, 0);

    let retaken = second.lock_all_folders(&trees.source);
    assert_eq!(retaken.len(), 1);
    second.unlock_all_folders(retaken);
    assert!(!trees.source.join("a/.lock").exists());
}

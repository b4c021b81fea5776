//! Entries removed from the source disappear from the replica.

use super::test_utils::{assert_mirrored, write_file, TreePair};
use mirrorsync::logging::{MemoryLogger, Severity};
use mirrorsync::sync::sync_once;
use std::fs;

#[test]
fn test_extra_directory_and_contents_removed() {
    let trees = TreePair::new();
    write_file(&trees.source, "keep/kept.txt", "kept");
    write_file(&trees.replica, "keep/kept.txt", "kept");
    write_file(&trees.replica, "old/stale.txt", "stale");

    let logger = MemoryLogger::new();
    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert!(!trees.replica.join("old").exists());
    assert_eq!(report.files_removed, 1);
    assert_eq!(report.directories_removed, 1);
    assert!(logger.contains(Severity::Info, "Removed file:"));
    assert!(logger.contains(Severity::Info, "Removed directory:"));
    assert_mirrored(&trees.source, &trees.replica);
}

#[test]
fn test_deleted_source_file_propagates() {
    let trees = TreePair::new();
    write_file(&trees.source, "docs/a.txt", "a");
    write_file(&trees.source, "docs/b.txt", "b");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();
    fs::remove_file(trees.source.join("docs/b.txt")).unwrap();

    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();
    assert_eq!(report.files_removed, 1);
    assert!(trees.replica.join("docs/a.txt").exists());
    assert!(!trees.replica.join("docs/b.txt").exists());
}

#[test]
fn test_nested_extra_directories_removed() {
    let trees = TreePair::new();
    fs::create_dir_all(trees.replica.join("x/y/z")).unwrap();
    write_file(&trees.replica, "x/y/z/leaf.bin", "leaf");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert!(fs::read_dir(&trees.replica).unwrap().next().is_none());
    assert!(logger.messages(Severity::Error).is_empty());
}

#[test]
fn test_emptied_source_empties_replica() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/one.txt", "1");
    write_file(&trees.source, "b/two.txt", "2");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();
    fs::remove_dir_all(trees.source.join("a")).unwrap();
    fs::remove_dir_all(trees.source.join("b")).unwrap();

    sync_once(&trees.source, &trees.replica, &logger).unwrap();
    assert_mirrored(&trees.source, &trees.replica);
    assert!(trees.replica.is_dir());
}

//! A pass makes the replica mirror the source; a second pass changes nothing.

use super::test_utils::{assert_mirrored, write_file, TreePair};
use mirrorsync::logging::{MemoryLogger, Severity};
use mirrorsync::sync::sync_once;
use std::fs;

#[test]
fn test_empty_replica_converges() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/b/file1.txt", "hello");
    fs::create_dir_all(trees.source.join("a/c")).unwrap();

    let logger = MemoryLogger::new();
    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert_mirrored(&trees.source, &trees.replica);
    assert_eq!(
        fs::read_to_string(trees.replica.join("a/b/file1.txt")).unwrap(),
        "hello"
    );
    assert!(trees.replica.join("a/c").is_dir());
    assert_eq!(report.directories_created, 3);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.entry_failures, 0);
    assert!(logger.contains(Severity::Info, "Created directory:"));
    assert!(logger.contains(Severity::Info, "Copied file:"));
}

#[test]
fn test_second_pass_is_noop() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/b/file1.txt", "hello");
    write_file(&trees.source, "top.txt", "top");
    fs::create_dir_all(trees.source.join("a/c")).unwrap();

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();
    logger.clear();

    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();
    assert!(report.is_noop(), "second pass mutated: {}", report.summary());
    assert_eq!(report.files_unchanged, 2);
    for (_, message) in logger.records() {
        assert!(!message.starts_with("Copied file"), "{}", message);
        assert!(!message.starts_with("Created directory"), "{}", message);
        assert!(!message.starts_with("Removed"), "{}", message);
    }
    assert_mirrored(&trees.source, &trees.replica);
}

#[test]
fn test_modified_source_file_is_recopied() {
    let trees = TreePair::new();
    write_file(&trees.source, "notes/today.md", "draft");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();

    write_file(&trees.source, "notes/today.md", "final version");
    let report = sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(
        fs::read_to_string(trees.replica.join("notes/today.md")).unwrap(),
        "final version"
    );
}

#[test]
fn test_sentinels_never_mirrored() {
    let trees = TreePair::new();
    write_file(&trees.source, "a/b/c/deep.txt", "deep");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();

    for dir in ["", "a", "a/b", "a/b/c"] {
        assert!(!trees.source.join(dir).join(".lock").exists());
        assert!(!trees.replica.join(dir).join(".lock").exists());
    }
}

#[test]
fn test_replica_file_where_source_has_directory() {
    let trees = TreePair::new();
    write_file(&trees.source, "shared/inner.txt", "inner");
    write_file(&trees.replica, "shared", "i am a file");

    let logger = MemoryLogger::new();
    sync_once(&trees.source, &trees.replica, &logger).unwrap();

    assert_mirrored(&trees.source, &trees.replica);
    assert!(logger.contains(Severity::Warning, "Replacing file with directory"));
}

//! Property-based tests: any starting pair converges in one pass and stays put

use mirrorsync::logging::MemoryLogger;
use mirrorsync::sync::sync_once;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Relative file paths drawn from a small namespace so source and replica overlap
fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    let path = prop::sample::select(vec![
        "a.txt",
        "b.txt",
        "d1/a.txt",
        "d1/c.bin",
        "d1/d2/deep.txt",
        "d3/x.txt",
        "d3/d4/y.txt",
    ])
    .prop_map(str::to_string);
    let content = prop::collection::vec(any::<u8>(), 0..64);
    prop::collection::btree_map(path, content, 0..6)
}

fn materialize(root: &Path, tree: &BTreeMap<String, Vec<u8>>) {
    fs::create_dir_all(root).unwrap();
    for (relative, content) in tree {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_string_lossy().to_string();
            let content = if e.file_type().is_file() {
                Some(fs::read(e.path()).unwrap())
            } else {
                None
            };
            (relative, content)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_one_pass_converges_and_second_is_noop(
        source_tree in tree_strategy(),
        replica_tree in tree_strategy(),
    ) {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("source");
        let replica = temp.path().join("replica");
        materialize(&source, &source_tree);
        materialize(&replica, &replica_tree);

        let logger = MemoryLogger::new();
        let first = sync_once(&source, &replica, &logger).unwrap();
        prop_assert_eq!(first.entry_failures, 0);
        prop_assert_eq!(snapshot(&replica), snapshot(&source));

        let second = sync_once(&source, &replica, &logger).unwrap();
        prop_assert!(second.is_noop(), "{}", second.summary());
        prop_assert_eq!(snapshot(&replica), snapshot(&source));
    }
}

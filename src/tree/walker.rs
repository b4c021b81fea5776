//! Filesystem walker for traversing a tree live
//!
//! Entries are produced lazily so each decision observes the filesystem as it is at
//! that moment. Unreadable entries are logged and skipped; they never end the walk.

use crate::logging::Logger;
use crate::tree::path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Kind of a walked entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry beneath a tree root
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Absolute (root-joined) path
    pub path: PathBuf,
    /// Path relative to the walked root
    pub relative: RelativePath,
    pub kind: EntryKind,
    /// The entry itself is a symbolic link (followed or not)
    pub is_symlink: bool,
}

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to descend through symbolic links
    pub follow_symlinks: bool,
    /// Yield a directory's contents before the directory itself
    pub contents_first: bool,
    /// File names that are never yielded (sentinel files)
    pub excluded_file_names: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            contents_first: false,
            excluded_file_names: Vec::new(),
        }
    }
}

/// Filesystem walker
pub struct Walker<'a> {
    root: PathBuf,
    config: WalkerConfig,
    logger: &'a dyn Logger,
}

impl<'a> Walker<'a> {
    /// Create a walker with the default configuration
    pub fn new(root: &Path, logger: &'a dyn Logger) -> Self {
        Self::with_config(root, WalkerConfig::default(), logger)
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: &Path, config: WalkerConfig, logger: &'a dyn Logger) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            logger,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every entry below the root (the root itself is never yielded).
    ///
    /// Siblings are visited in file-name order.
    pub fn entries(&self) -> impl Iterator<Item = TreeEntry> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .contents_first(self.config.contents_first)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.classify(&entry),
                Err(e) => {
                    self.logger.error(&format!(
                        "Error walking {}: {}",
                        self.root.display(),
                        e
                    ));
                    None
                }
            })
    }

    /// Directories below the root
    pub fn directories(&self) -> impl Iterator<Item = TreeEntry> + '_ {
        self.entries().filter(|e| e.kind == EntryKind::Directory)
    }

    /// Files below the root, minus excluded names
    pub fn files(&self) -> impl Iterator<Item = TreeEntry> + '_ {
        self.entries().filter(|e| e.kind == EntryKind::File)
    }

    fn classify(&self, entry: &DirEntry) -> Option<TreeEntry> {
        let path = entry.path().to_path_buf();
        let file_type = entry.file_type();

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            // Unfollowed link: classify by its target
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(_) => return None,
                Err(e) => {
                    self.logger
                        .warning(&format!("Skipping dangling link {}: {}", path.display(), e));
                    return None;
                }
            }
        } else {
            return None;
        };

        if kind == EntryKind::File && self.is_excluded(entry) {
            return None;
        }

        let relative = RelativePath::from_entry(&self.root, &path)?;
        Some(TreeEntry {
            path,
            relative,
            kind,
            is_symlink: entry.path_is_symlink(),
        })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.config
            .excluded_file_names
            .iter()
            .any(|excluded| excluded.as_str() == name)
    }
}

/// True if `dir` has at least one immediate subdirectory
pub fn has_subdirectory(dir: &Path, follow_symlinks: bool) -> std::io::Result<bool> {
    for child in fs::read_dir(dir)? {
        let child = child?;
        let file_type = child.file_type()?;
        if file_type.is_dir() || (follow_symlinks && file_type.is_symlink() && child.path().is_dir())
        {
            return Ok(true);
        }
    }
    Ok(false)
}

//! Relative paths and root canonicalization

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A path relative to a tree root; the join key between source and replica
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Express `path` relative to `root`.
    ///
    /// Returns `None` for the root itself or for paths outside `root`.
    pub fn from_entry(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }
        Some(Self(relative.to_path_buf()))
    }

    /// Join onto another tree's root
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Number of components; top-level entries have depth 1
    pub fn depth(&self) -> usize {
        self.0
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Canonicalize a tree root without Windows verbatim prefixes
pub fn canonical_root(path: &Path) -> io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// True when one root equals or contains the other
pub fn roots_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

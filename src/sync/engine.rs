//! Tree Diff & Apply Engine
//!
//! Four convergence operations, always run in this order:
//! create directories, copy files, remove extra files, remove extra directories.
//! Every operation walks its tree live and contains failures per entry: one bad file
//! is logged and skipped, never allowed to stop the rest of the pass.
//!
//! Type collisions resolve in favour of the source. A replica file standing where the
//! source has a directory is removed before the directory is created, and a replica
//! directory standing where the source has a file is removed before the copy.

use super::report::SyncReport;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::logging::Logger;
use crate::tree::fingerprint::fingerprint_with_chunk_size;
use crate::tree::walker::{Walker, WalkerConfig};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Copies one file's bytes (and whatever metadata it can) over a destination
pub trait FileCopier: Send + Sync {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `fs::copy` plus the source's modification time
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservingCopy;

impl FileCopier for PreservingCopy {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to)?;
        let modified = fs::metadata(from)?.modified()?;
        // Permission bits were copied too; a read-only copy can still take new times
        let file = OpenOptions::new()
            .write(true)
            .open(to)
            .or_else(|_| File::open(to))?;
        file.set_modified(modified)
    }
}

/// Fail the pass if a root vanished or stopped being a directory
pub(crate) fn ensure_root(path: &Path) -> Result<(), SyncError> {
    let meta = fs::metadata(path).map_err(|source| SyncError::RootUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(SyncError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Walks source and replica and applies the convergence operations
pub struct DiffEngine<'a, C: FileCopier = PreservingCopy> {
    copier: C,
    follow_symlinks: bool,
    sentinel_name: String,
    chunk_size: usize,
    logger: &'a dyn Logger,
}

impl<'a> DiffEngine<'a, PreservingCopy> {
    pub fn new(config: &SyncConfig, logger: &'a dyn Logger) -> Self {
        Self::with_copier(config, PreservingCopy, logger)
    }
}

impl<'a, C: FileCopier> DiffEngine<'a, C> {
    pub fn with_copier(config: &SyncConfig, copier: C, logger: &'a dyn Logger) -> Self {
        Self {
            copier,
            follow_symlinks: config.follow_symlinks,
            sentinel_name: config.sentinel_name.clone(),
            chunk_size: config.chunk_size,
            logger,
        }
    }

    fn walker(&self, root: &Path, contents_first: bool) -> Walker<'a> {
        let config = WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            contents_first,
            excluded_file_names: vec![self.sentinel_name.clone()],
        };
        Walker::with_config(root, config, self.logger)
    }

    /// Run all four operations in order.
    ///
    /// Only a vanished root is an error; everything per-entry is contained.
    pub fn apply(
        &self,
        source: &Path,
        replica: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        ensure_root(source)?;
        ensure_root(replica)?;
        self.create_directories(source, replica, report);

        ensure_root(source)?;
        ensure_root(replica)?;
        self.copy_files(source, replica, report);

        ensure_root(replica)?;
        self.remove_extra_files(replica, source, report);

        ensure_root(replica)?;
        self.remove_extra_directories(replica, source, report);
        Ok(())
    }

    /// Create every source directory missing from the replica
    pub fn create_directories(&self, source: &Path, replica: &Path, report: &mut SyncReport) {
        let walker = self.walker(source, false);
        for dir in walker.directories() {
            let target = dir.relative.resolve(replica);
            if target.is_dir() {
                continue;
            }

            if fs::symlink_metadata(&target).is_ok() {
                self.logger.warning(&format!(
                    "Replacing file with directory: {}",
                    target.display()
                ));
                if let Err(e) = fs::remove_file(&target) {
                    self.logger.error(&format!(
                        "Error creating directory {}: {}",
                        target.display(),
                        e
                    ));
                    report.entry_failures += 1;
                    continue;
                }
                report.files_removed += 1;
            }

            match fs::create_dir_all(&target) {
                Ok(()) => {
                    self.logger
                        .info(&format!("Created directory: {}", target.display()));
                    report.directories_created += 1;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Error creating directory {}: {}",
                        target.display(),
                        e
                    ));
                    report.entry_failures += 1;
                }
            }
        }
    }

    /// Copy source files that are missing from the replica or differ in content
    pub fn copy_files(&self, source: &Path, replica: &Path, report: &mut SyncReport) {
        let walker = self.walker(source, false);
        for file in walker.files() {
            let target = file.relative.resolve(replica);

            if target.is_dir() {
                self.logger.warning(&format!(
                    "Replacing directory with file: {}",
                    target.display()
                ));
                if let Err(e) = fs::remove_dir_all(&target) {
                    self.logger.error(&format!(
                        "Error copying file {} to {}: {}",
                        file.path.display(),
                        target.display(),
                        e
                    ));
                    report.entry_failures += 1;
                    continue;
                }
                report.directories_removed += 1;
            }

            if !self.needs_copy(&file.path, &target) {
                report.files_unchanged += 1;
                continue;
            }

            match self.copier.copy(&file.path, &target) {
                Ok(()) => {
                    self.logger
                        .info(&format!("Copied file: {}", target.display()));
                    report.files_copied += 1;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Error copying file {} to {}: {}",
                        file.path.display(),
                        target.display(),
                        e
                    ));
                    report.entry_failures += 1;
                }
            }
        }
    }

    /// Missing replica, unreadable source, or differing digests all mean "copy".
    fn needs_copy(&self, source_file: &Path, replica_file: &Path) -> bool {
        if !replica_file.is_file() {
            return true;
        }
        let Some(source_fp) = fingerprint_with_chunk_size(source_file, self.chunk_size, self.logger)
        else {
            return true;
        };
        match fingerprint_with_chunk_size(replica_file, self.chunk_size, self.logger) {
            Some(replica_fp) => source_fp != replica_fp,
            None => true,
        }
    }

    /// Delete replica files with no source file at the same relative path
    pub fn remove_extra_files(&self, replica: &Path, source: &Path, report: &mut SyncReport) {
        let walker = self.walker(replica, false);
        for file in walker.files() {
            if file.relative.resolve(source).is_file() {
                continue;
            }
            match fs::remove_file(&file.path) {
                Ok(()) => {
                    self.logger
                        .info(&format!("Removed file: {}", file.path.display()));
                    report.files_removed += 1;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Error removing file {}: {}",
                        file.path.display(),
                        e
                    ));
                    report.entry_failures += 1;
                }
            }
        }
    }

    /// Recursively delete replica directories with no source counterpart, deepest first
    pub fn remove_extra_directories(
        &self,
        replica: &Path,
        source: &Path,
        report: &mut SyncReport,
    ) {
        let walker = self.walker(replica, true);
        for dir in walker.directories() {
            if dir.relative.resolve(source).is_dir() {
                continue;
            }
            match fs::remove_dir_all(&dir.path) {
                Ok(()) => {
                    self.logger
                        .info(&format!("Removed directory: {}", dir.path.display()));
                    report.directories_removed += 1;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Error removing directory {}: {}",
                        dir.path.display(),
                        e
                    ));
                    report.entry_failures += 1;
                }
            }
        }
    }
}

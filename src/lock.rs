//! Folder Lock Manager
//!
//! Advisory, non-blocking, per-directory locks that signal "sync in progress" and keep
//! two engine instances from working the same tree at once. Each lock is a sentinel file
//! inside the directory plus an OS advisory exclusive lock on its open handle.
//!
//! Failures never propagate: a folder that cannot be locked is logged and skipped, and
//! unlocking is best-effort. The OS lock, not the sentinel's existence, is what counts,
//! so a sentinel left behind by a crashed pass is simply re-acquired.

mod primitive;

pub use primitive::{AdvisoryLock, LockPrimitive};

use crate::error::LockError;
use crate::logging::Logger;
use crate::tree::walker::{has_subdirectory, Walker, WalkerConfig};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default sentinel file name
pub const DEFAULT_SENTINEL: &str = ".lock";

/// Ownership token for one locked directory
#[derive(Debug)]
pub struct FolderLock {
    folder: PathBuf,
    sentinel: PathBuf,
    file: File,
}

impl FolderLock {
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn sentinel(&self) -> &Path {
        &self.sentinel
    }
}

/// Locks taken over one tree, in walk order
#[derive(Debug, Default)]
pub struct LockSet {
    locks: Vec<FolderLock>,
}

impl LockSet {
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub fn folders(&self) -> impl Iterator<Item = &Path> {
        self.locks.iter().map(|l| l.folder())
    }

    pub fn push(&mut self, lock: FolderLock) {
        self.locks.push(lock);
    }
}

impl IntoIterator for LockSet {
    type Item = FolderLock;
    type IntoIter = std::vec::IntoIter<FolderLock>;

    fn into_iter(self) -> Self::IntoIter {
        self.locks.into_iter()
    }
}

/// Result of releasing a lock set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockSummary {
    /// Locks fully released (OS lock dropped and sentinel removed)
    pub released: usize,
    /// Locks where some release step failed; their handles are still closed
    pub incomplete: usize,
}

/// Acquires and releases folder locks
pub struct FolderLockManager<'a, P: LockPrimitive = AdvisoryLock> {
    primitive: P,
    sentinel_name: String,
    follow_symlinks: bool,
    logger: &'a dyn Logger,
}

impl<'a> FolderLockManager<'a, AdvisoryLock> {
    /// Manager using the native advisory lock and the default sentinel name
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self::with_primitive(AdvisoryLock, DEFAULT_SENTINEL, logger)
    }
}

impl<'a, P: LockPrimitive> FolderLockManager<'a, P> {
    pub fn with_primitive(primitive: P, sentinel_name: &str, logger: &'a dyn Logger) -> Self {
        Self {
            primitive,
            sentinel_name: sentinel_name.to_string(),
            follow_symlinks: false,
            logger,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn sentinel_name(&self) -> &str {
        &self.sentinel_name
    }

    /// Lock one folder. `None` means "not obtained"; the reason is logged.
    pub fn lock_folder(&self, folder: &Path) -> Option<FolderLock> {
        match self.try_lock_folder(folder) {
            Ok(lock) => {
                self.logger
                    .info(&format!("Locked folder: {}", folder.display()));
                Some(lock)
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Unable to lock folder {}: {}",
                    folder.display(),
                    e
                ));
                None
            }
        }
    }

    fn try_lock_folder(&self, folder: &Path) -> Result<FolderLock, LockError> {
        let sentinel = folder.join(&self.sentinel_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&sentinel)
            .map_err(|source| LockError::SentinelOpen {
                path: sentinel.clone(),
                source,
            })?;

        if let Err(source) = self.primitive.try_lock_exclusive(&file) {
            return Err(if self.primitive.is_contended(&source) {
                LockError::AlreadyHeld(folder.to_path_buf())
            } else {
                LockError::Acquire {
                    path: sentinel,
                    source,
                }
            });
        }

        // Holder's pid, for operators inspecting a live sentinel. Only rewritten once held.
        if let Err(e) = file.set_len(0).and_then(|()| writeln!(file, "{}", std::process::id())) {
            self.logger.warning(&format!(
                "Unable to record pid in {}: {}",
                sentinel.display(),
                e
            ));
        }

        Ok(FolderLock {
            folder: folder.to_path_buf(),
            sentinel,
            file,
        })
    }

    /// Release the OS lock, delete the sentinel, close the handle.
    ///
    /// Returns `true` when every step succeeded. The handle is closed either way.
    pub fn unlock_folder(&self, lock: FolderLock) -> bool {
        let FolderLock {
            folder,
            sentinel,
            file,
        } = lock;
        let mut clean = true;

        if let Err(source) = self.primitive.unlock(&file) {
            let err = LockError::Release {
                path: sentinel.clone(),
                source,
            };
            self.logger.error(&format!(
                "Error unlocking folder {}: {}",
                folder.display(),
                err
            ));
            clean = false;
        }

        match fs::remove_file(&sentinel) {
            Ok(()) => {}
            // Folder was removed while locked (replica pruning); nothing left to clean
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                let err = LockError::SentinelRemove {
                    path: sentinel.clone(),
                    source,
                };
                self.logger.error(&format!(
                    "Error unlocking folder {}: {}",
                    folder.display(),
                    err
                ));
                clean = false;
            }
        }

        drop(file);

        if clean {
            self.logger
                .info(&format!("Unlocked folder: {}", folder.display()));
        }
        clean
    }

    /// Lock every non-root directory under `root` that has a subdirectory.
    ///
    /// Folders that cannot be locked are left out of the returned set.
    pub fn lock_all_folders(&self, root: &Path) -> LockSet {
        let config = WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            ..WalkerConfig::default()
        };
        let walker = Walker::with_config(root, config, self.logger);

        let mut locks = LockSet::default();
        // An unfollowed link's target lies outside the tree; never put a sentinel there
        for dir in walker
            .directories()
            .filter(|dir| self.follow_symlinks || !dir.is_symlink)
        {
            match has_subdirectory(&dir.path, self.follow_symlinks) {
                Ok(true) => {
                    if let Some(lock) = self.lock_folder(&dir.path) {
                        locks.push(lock);
                    }
                }
                Ok(false) => {}
                Err(e) => self.logger.error(&format!(
                    "Error listing folder {}: {}",
                    dir.path.display(),
                    e
                )),
            }
        }
        locks
    }

    /// Unlock every lock in the set, in order. Never stops partway.
    pub fn unlock_all_folders(&self, locks: LockSet) -> UnlockSummary {
        let mut summary = UnlockSummary::default();
        for lock in locks {
            if self.unlock_folder(lock) {
                summary.released += 1;
            } else {
                summary.incomplete += 1;
            }
        }
        summary
    }
}

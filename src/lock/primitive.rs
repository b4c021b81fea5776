//! Native advisory locking primitive.
//!
//! `fs2` picks the platform API at build time (`flock` on Unix, `LockFileEx` on
//! Windows), so nothing above this module branches on platform.

use fs2::FileExt;
use std::fs::File;
use std::io;

/// Non-blocking exclusive lock over an open file handle
pub trait LockPrimitive: Send + Sync {
    /// Take the lock or fail immediately
    fn try_lock_exclusive(&self, file: &File) -> io::Result<()>;

    fn unlock(&self, file: &File) -> io::Result<()>;

    /// Whether an acquisition error means "someone else holds it"
    fn is_contended(&self, err: &io::Error) -> bool {
        let contended = fs2::lock_contended_error();
        (err.raw_os_error().is_some() && err.raw_os_error() == contended.raw_os_error())
            || err.kind() == io::ErrorKind::WouldBlock
    }
}

/// OS advisory lock
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryLock;

impl LockPrimitive for AdvisoryLock {
    fn try_lock_exclusive(&self, file: &File) -> io::Result<()> {
        FileExt::try_lock_exclusive(file)
    }

    fn unlock(&self, file: &File) -> io::Result<()> {
        FileExt::unlock(file)
    }
}

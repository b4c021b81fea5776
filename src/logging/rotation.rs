//! Size-based rotating log file writer.
//!
//! `sync.log` rolls over to `sync.log.1`, shifting older backups up to `max_files`;
//! the oldest backup falls off the end.

use parking_lot::{Mutex, MutexGuard};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;

/// Rotating file writer usable as a `tracing_subscriber` writer
pub struct RotatingFileWriter {
    state: Mutex<RotatingState>,
}

struct RotatingState {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    file: Option<File>,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the log file, creating parent directories as needed
    pub fn new(path: &Path, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = open_append(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            state: Mutex::new(RotatingState {
                path: path.to_path_buf(),
                max_bytes,
                max_files,
                file: Some(file),
                written,
            }),
        })
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `sync.log` + 2 -> `sync.log.2`
fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

impl RotatingState {
    fn should_rotate(&self, incoming: usize) -> bool {
        self.max_bytes > 0
            && self.max_files > 0
            && self.written > 0
            && self.written + incoming as u64 > self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        let oldest = backup_path(&self.path, self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = backup_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, backup_path(&self.path, 1))?;
        }

        self.file = Some(open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        if self.file.is_none() {
            self.file = Some(open_append(&self.path)?);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Writer handed out per event; holds the lock for the duration of one record.
pub struct RotatingGuard<'a>(MutexGuard<'a, RotatingState>);

impl Write for RotatingGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingGuard(self.state.lock())
    }
}

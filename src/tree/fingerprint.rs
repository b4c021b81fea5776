//! Content fingerprints using BLAKE3
//!
//! A fingerprint is recomputed on demand for every comparison and never stored.
//! Files are streamed in fixed-size chunks so memory use does not grow with file size.

use crate::logging::Logger;
use blake3::Hasher;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read buffer size used when streaming a file into the hasher
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Digest of a file's full byte stream
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

/// Fingerprint the file at `path` with the default chunk size.
///
/// Returns `None` when the file cannot be read; the failure is logged. Callers must
/// treat `None` as "differs", never as "identical".
pub fn fingerprint(path: &Path, logger: &dyn Logger) -> Option<Fingerprint> {
    fingerprint_with_chunk_size(path, DEFAULT_CHUNK_SIZE, logger)
}

/// Fingerprint the file at `path`, reading `chunk_size` bytes at a time.
pub fn fingerprint_with_chunk_size(
    path: &Path,
    chunk_size: usize,
    logger: &dyn Logger,
) -> Option<Fingerprint> {
    let result = File::open(path).and_then(|file| fingerprint_reader(file, chunk_size));
    match result {
        Ok(fp) => Some(fp),
        Err(e) => {
            logger.error(&format!("Error reading file {}: {}", path.display(), e));
            None
        }
    }
}

/// Stream `reader` to end-of-stream through an incremental hasher.
pub fn fingerprint_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Fingerprint> {
    let mut hasher = Hasher::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}

/// Fingerprint of an in-memory byte slice
pub fn fingerprint_bytes(content: &[u8]) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(content);
    Fingerprint(*hasher.finalize().as_bytes())
}

//! Logger capability handed to the sync engine.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

/// Severity of a log line emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Logging capability consumed by every core component.
///
/// Destination, rotation and formatting are not the engine's concern.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn critical(&self, message: &str);

    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => self.info(message),
            Severity::Warning => self.warning(message),
            Severity::Error => self.error(message),
            Severity::Critical => self.critical(message),
        }
    }
}

/// Forwards to the process-wide `tracing` subscriber.
///
/// `tracing` has no critical level, so critical lines go out at ERROR with
/// `critical = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "mirrorsync", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "mirrorsync", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "mirrorsync", "{}", message);
    }

    fn critical(&self, message: &str) {
        error!(target: "mirrorsync", critical = true, "{}", message);
    }
}

/// In-memory logger that records every line
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded lines, oldest first
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().clone()
    }

    /// Messages recorded at `severity`
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// True if any line at `severity` contains `needle`
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(s, m)| *s == severity && m.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, severity: Severity, message: &str) {
        self.records.lock().push((severity, message.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }

    fn critical(&self, message: &str) {
        self.push(Severity::Critical, message);
    }
}

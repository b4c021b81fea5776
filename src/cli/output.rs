//! CLI output: pass reports and error mapping for the terminal.

use crate::error::SyncError;
use crate::sync::SyncReport;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &SyncError) -> String {
    match e {
        SyncError::ConfigError(msg) => format!("Configuration error: {}", msg),
        other => other.to_string(),
    }
}

/// Render a pass report as `text` or `json`.
pub fn format_report(report: &SyncReport, format: &str) -> Result<String, SyncError> {
    match format {
        "json" => serde_json::to_string_pretty(report)
            .map_err(|e| SyncError::ConfigError(format!("Failed to render report: {}", e))),
        "text" => Ok(format!(
            "Pass started {} ({} ms)\n  directories created: {}\n  files copied:        {}\n  files unchanged:     {}\n  files removed:       {}\n  directories removed: {}\n  failures:            {}\n  locks taken:         {}",
            report.started_at.to_rfc3339(),
            report.duration_ms,
            report.directories_created,
            report.files_copied,
            report.files_unchanged,
            report.files_removed,
            report.directories_removed,
            report.entry_failures,
            report.locks_acquired,
        )),
        other => Err(SyncError::ConfigError(format!(
            "Unknown report format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

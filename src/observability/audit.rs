//! Audit log entries and their text rendering.
//!
//! `format` is pure: it never writes anywhere. See `sink.rs` for output.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Severity derived from a response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400..=499) => Severity::Warning,
            Some(code) if code >= 500 => Severity::Error,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record per terminal outcome of a guarded request.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub origin: String,
    pub status: Option<u16>,
    pub duration: Duration,
    pub message: String,
    /// Request target with credentials masked.
    pub url: String,
    pub request_id: String,
}

impl LogEntry {
    pub fn severity(&self) -> Severity {
        Severity::from_status(self.status)
    }
}

/// Render an entry as a single line.
pub fn format(entry: &LogEntry) -> String {
    let status = entry
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "[{}] [{}] - {} - {} - {} - {} - {} - {} - {}ms - {} || [Request ID: {}]",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.severity(),
        entry.client_ip,
        entry.method,
        entry.path,
        entry.origin,
        status,
        entry.url,
        entry.duration.as_millis(),
        entry.message,
        entry.request_id,
    )
}

//! Audit log output.
//!
//! # Responsibilities
//! - Mirror audit lines to the console (through `tracing`)
//! - Append audit lines to the configured access log file
//!
//! # Design Decisions
//! - Best effort: a failed write is reported and dropped, never propagated
//!   into request handling
//! - The file is opened in append mode per write, so retention may delete
//!   it between writes

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::GuardConfig;
use crate::observability::audit::{self, LogEntry, Severity};

/// Where audit lines go.
#[derive(Debug, Clone, Default)]
pub struct AuditSink {
    console: bool,
    file: Option<PathBuf>,
}

impl AuditSink {
    /// Build the sink from the guard configuration, creating the log
    /// directory if file logging is on.
    pub fn from_config(config: &GuardConfig) -> Self {
        let file = config.log_to_file.then(|| config.log_file_path.clone());
        if let Some(dir) = file.as_deref().and_then(Path::parent) {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::error!(dir = %dir.display(), error = %e, "Failed to create log directory");
            }
        }
        Self {
            console: config.enable_logging,
            file,
        }
    }

    /// True if any output is configured.
    pub fn is_enabled(&self) -> bool {
        self.console || self.file.is_some()
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Format and write one entry to every configured output.
    pub fn emit(&self, entry: &LogEntry) {
        if !self.is_enabled() {
            return;
        }
        let line = audit::format(entry);

        if self.console {
            match entry.severity() {
                Severity::Info => tracing::info!(target: "api_guard::access", "{line}"),
                Severity::Warning => tracing::warn!(target: "api_guard::access", "{line}"),
                Severity::Error => tracing::error!(target: "api_guard::access", "{line}"),
            }
        }

        if let Some(path) = &self.file {
            if let Err(e) = append_line(path, &line) {
                tracing::error!(path = %path.display(), error = %e, "Failed to write access log");
            }
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

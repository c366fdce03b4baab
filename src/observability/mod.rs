//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Guard pipeline terminal outcome:
//!     → sanitize.rs (mask credentials in the URL)
//!     → audit.rs (LogEntry, severity, line formatting)
//!     → sink.rs (console via tracing, access log file)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Background:
//!     → retention.rs (daily removal of stale access logs)
//! ```
//!
//! # Design Decisions
//! - Formatting is pure; sinks own all I/O
//! - Logging is best effort and never fails a request
//! - Request ID flows into every audit line

pub mod audit;
pub mod logging;
pub mod metrics;
pub mod retention;
pub mod sanitize;
pub mod sink;

pub use audit::{LogEntry, Severity};
pub use sink::AuditSink;

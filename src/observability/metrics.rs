//! Metrics collection and exposition.
//!
//! # Metrics
//! - `guard_requests_total` (counter): terminal outcomes by `outcome`
//! - `guard_rejections_total` (counter): rejections by `reason`
//! - `guard_request_duration_seconds` (histogram): admitted request latency
//! - `guard_rate_limit_keys` (gauge): clients holding rate limit state

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Terminal outcome labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Admitted,
    Rejected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Admitted => "admitted",
            Outcome::Rejected => "rejected",
        }
    }
}

/// Start the Prometheus exporter. Failures are logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_outcome(outcome: Outcome) {
    counter!("guard_requests_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_rejection(reason: &'static str) {
    record_outcome(Outcome::Rejected);
    counter!("guard_rejections_total", "reason" => reason).increment(1);
}

pub fn record_request_duration(status: u16, duration: Duration) {
    histogram!(
        "guard_request_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn set_tracked_keys(count: usize) {
    gauge!("guard_rate_limit_keys").set(count as f64);
}

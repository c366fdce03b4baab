//! Gatekeeper pipeline.
//!
//! # Data Flow
//! ```text
//! RequestFacts
//!     → exempt? (favicon probe, OPTIONS)      → downstream, unchecked
//!     → 1 body size      → 413
//!     → 2 blacklist      → 403
//!     → 3 whitelist      → 403
//!     → 4 user agent     → 403
//!     → 5 origin         → 403
//!     → 6 rate limit     → 429
//!     → Admitted         → hardening headers, downstream, final audit entry
//! ```
//!
//! # Design Decisions
//! - First failing check wins; later checks never run
//! - The guard owns its rate limit store and background tasks; both live
//!   exactly as long as the guard and stop on `shutdown`
//! - Every terminal outcome produces exactly one audit entry

pub mod facts;
pub mod rejection;
pub mod sweeper;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::Method;
use tokio::task::JoinHandle;

use crate::config::validation::validate_guard;
use crate::config::{ConfigError, GuardConfig};
use crate::lifecycle::Shutdown;
use crate::observability::retention::LogRetention;
use crate::observability::sanitize::mask_credentials;
use crate::observability::{AuditSink, LogEntry};
use crate::security::{access_control, limits, origin, Decision, SlidingWindowLimiter};

pub use facts::RequestFacts;
pub use rejection::Rejection;
pub use sweeper::Sweeper;

/// Path browsers probe for a site icon.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Terminal state of the pipeline for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admitted,
    Rejected(Rejection),
}

/// A configured guard instance.
pub struct Guard {
    config: Arc<GuardConfig>,
    limiter: Arc<SlidingWindowLimiter>,
    sink: AuditSink,
    shutdown: Shutdown,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Guard {
    /// Build a guard without background tasks.
    ///
    /// Idle clients are only pruned on access; use [`Guard::start`] to also
    /// run the eviction sweep. `config` is validated again here, since its
    /// fields are public and may not have come from
    /// [`GuardConfig::from_options`].
    pub fn new(config: GuardConfig) -> Result<Self, ConfigError> {
        let errors = validate_guard(&config);
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        let limiter = Arc::new(SlidingWindowLimiter::from_config(&config.rate_limit));
        let sink = AuditSink::from_config(&config);
        Ok(Self {
            config: Arc::new(config),
            limiter,
            sink,
            shutdown: Shutdown::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Build a guard and spawn its background tasks on the current Tokio
    /// runtime: the rate limit sweep and, with file logging, log retention.
    pub fn start(config: GuardConfig) -> Result<Self, ConfigError> {
        let guard = Self::new(config)?;
        let mut handles = Vec::new();

        let sweeper = Sweeper::new(guard.limiter.clone());
        handles.push(tokio::spawn(sweeper.run(guard.shutdown.subscribe())));

        if let Some(dir) = guard.sink.log_file().and_then(|p| p.parent()) {
            let retention = LogRetention::new(dir.to_path_buf());
            handles.push(tokio::spawn(retention.run(guard.shutdown.subscribe())));
        }

        tracing::info!(
            window_ms = guard.config.rate_limit.window_ms,
            max_requests = guard.config.rate_limit.max_requests,
            tasks = handles.len(),
            "Guard started"
        );

        if let Ok(mut tasks) = guard.tasks.lock() {
            tasks.extend(handles);
        }
        Ok(guard)
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    /// Requests that bypass the pipeline entirely.
    pub fn is_exempt(method: &Method, path: &str) -> bool {
        *method == Method::OPTIONS || path == FAVICON_PATH
    }

    /// Run every admission check in order. Records quota on admission.
    pub fn evaluate(&self, facts: &RequestFacts, now: Instant) -> Verdict {
        match self.check(facts, now) {
            Ok(()) => Verdict::Admitted,
            Err(rejection) => Verdict::Rejected(rejection),
        }
    }

    fn check(&self, facts: &RequestFacts, now: Instant) -> Result<(), Rejection> {
        let config = &self.config;

        if limits::exceeds_body_limit(facts.content_length) {
            return Err(Rejection::PayloadTooLarge);
        }
        if access_control::is_blacklisted(&config.blacklist, &facts.client) {
            return Err(Rejection::Blacklisted);
        }
        if !access_control::is_whitelisted(&config.whitelist, &facts.client) {
            return Err(Rejection::NotWhitelisted);
        }
        if !access_control::is_user_agent_allowed(&config.allowed_user_agents, &facts.user_agent) {
            return Err(Rejection::UserAgentNotAllowed);
        }
        // An empty list and a list containing "*" both skip this check.
        if !config.allowed_origins.is_empty()
            && !config.allows_any_origin()
            && !origin::is_origin_allowed(&facts.origin, &config.allowed_origins)
        {
            return Err(Rejection::OriginNotAllowed {
                origin: facts.origin.clone(),
            });
        }
        if self.limiter.admit(&facts.client, now) == Decision::Rejected {
            return Err(Rejection::RateLimited {
                message: config.rate_limit.message.clone(),
            });
        }
        Ok(())
    }

    /// Build the audit entry for a terminal outcome.
    pub fn log_entry(
        &self,
        facts: &RequestFacts,
        request_id: &str,
        status: Option<u16>,
        elapsed: Duration,
        message: impl Into<String>,
    ) -> LogEntry {
        LogEntry {
            timestamp: chrono::Local::now(),
            client_ip: facts.client.to_string(),
            method: facts.method.to_string(),
            path: facts.path.clone(),
            origin: facts.origin.clone(),
            status,
            duration: elapsed,
            message: message.into(),
            url: mask_credentials(&facts.url),
            request_id: request_id.to_string(),
        }
    }

    /// Emit an audit entry through the configured sink.
    pub fn record(&self, entry: &LogEntry) {
        self.sink.emit(entry);
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        let handles = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(_) => Vec::new(),
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Guard background task ended abnormally");
            }
        }
        tracing::info!("Guard stopped");
    }
}

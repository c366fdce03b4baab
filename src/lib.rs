//! Request gatekeeping middleware for axum services.
//!
//! Every request is checked (body size, IP lists, user agent, origin,
//! per-client rate limit) before the downstream handler runs, and every
//! terminal outcome is written to an audit log.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use api_guard::{config::{GuardConfig, GuardOptions}, guard::Guard, http::protect};
//! use axum::{routing::get, Router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GuardConfig::from_options(GuardOptions {
//!     blacklist: Some(vec!["203.0.113.9".into()]),
//!     ..Default::default()
//! })?;
//! let guard = Arc::new(Guard::start(config)?);
//! let app: Router = protect(Router::new().route("/", get(|| async { "hello" })), guard.clone());
//! # let _ = app;
//! # guard.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::{GuardConfig, GuardOptions, ServerConfig};
pub use guard::{Guard, Verdict};
pub use http::{protect, HttpServer};
pub use lifecycle::Shutdown;

//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request facts:
//!     → limits.rs (declared body size)
//!     → access_control.rs (blacklist, whitelist, user agent)
//!     → origin.rs (origin allow-list)
//!     → rate_limit.rs (per-client sliding window)
//!     → headers.rs (hardening headers on the way out)
//! ```
//!
//! # Design Decisions
//! - Each check is a plain function or owned type; ordering lives in the guard
//! - Fail closed: unparseable origins never match
//! - No trust in client input

pub mod access_control;
pub mod client;
pub mod headers;
pub mod limits;
pub mod origin;
pub mod rate_limit;

pub use client::ClientKey;
pub use origin::{is_origin_allowed, ParsedOrigin};
pub use rate_limit::{Decision, SlidingWindowLimiter};

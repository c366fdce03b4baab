//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or programmatic GuardOptions
//!     → loader.rs (parse, shape-check the [guard] table)
//!     → schema.rs (merge options over defaults)
//!     → validation.rs (semantic checks, log path guard)
//!     → GuardConfig (validated, immutable)
//!     → shared via Arc with the guard pipeline
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; a new guard is needed to change it
//! - All fields have defaults to allow minimal configs
//! - Every construction-time error names the field at fault

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GuardConfig, GuardOptions, ListenerConfig, ObservabilityConfig, RateLimitConfig,
    RateLimitOptions, ServerConfig,
};

//! Configuration schema definitions.
//!
//! Two layers live here:
//! - [`GuardOptions`]: what a caller supplies. Every field is optional.
//! - [`GuardConfig`]: the merged, validated result. Built once per guard
//!   instance and shared read-only afterwards.
//!
//! [`ServerConfig`] wraps the guard options together with the settings the
//! standalone binary needs (listener, observability).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::validation::{self, ValidationError};
use crate::config::ConfigError;
use crate::security::client::ClientKey;

/// Default rate limit window in milliseconds.
pub const DEFAULT_WINDOW_MS: u64 = 60_000;
/// Default number of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;
/// Default body of the 429 response.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Too many requests";
/// Default access log location, relative to the working directory.
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/access.log";

/// Caller-supplied rate limit settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitOptions {
    /// Window length in milliseconds.
    pub window_ms: Option<u64>,
    /// Requests admitted per window.
    pub max_requests: Option<u32>,
    /// Message returned with a 429.
    pub message: Option<String>,
}

/// Caller-supplied guard configuration, merged over defaults by
/// [`GuardConfig::from_options`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardOptions {
    pub whitelist: Option<Vec<String>>,
    pub blacklist: Option<Vec<String>>,
    pub allowed_user_agents: Option<Vec<String>>,
    pub allowed_origins: Option<Vec<String>>,
    pub rate_limit: RateLimitOptions,
    pub enable_logging: Option<bool>,
    pub log_to_file: Option<bool>,
    pub log_file_path: Option<PathBuf>,
}

/// Effective rate limit settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
    pub message: String,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_requests: DEFAULT_MAX_REQUESTS,
            message: DEFAULT_RATE_LIMIT_MESSAGE.to_string(),
        }
    }
}

/// Immutable guard configuration.
///
/// IP lists are stored as normalized [`ClientKey`] strings so that an entry
/// written as `::ffff:10.0.0.1` matches a client seen as `10.0.0.1`.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub whitelist: HashSet<String>,
    pub blacklist: HashSet<String>,
    pub allowed_user_agents: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub enable_logging: bool,
    pub log_to_file: bool,
    /// Resolved against the working directory when `log_to_file` is set.
    pub log_file_path: PathBuf,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            whitelist: HashSet::new(),
            blacklist: HashSet::new(),
            allowed_user_agents: Vec::new(),
            allowed_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            enable_logging: false,
            log_to_file: false,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl GuardConfig {
    /// Merge `options` over the defaults and validate the result.
    ///
    /// The log file path, if file logging is enabled, is resolved against
    /// the process working directory.
    pub fn from_options(options: GuardOptions) -> Result<Self, ConfigError> {
        let base = std::env::current_dir()?;
        Self::from_options_in(options, &base)
    }

    /// Same as [`GuardConfig::from_options`] with an explicit base directory
    /// for log path resolution.
    pub fn from_options_in(options: GuardOptions, base_dir: &Path) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let rate_limit = RateLimitConfig {
            window_ms: options.rate_limit.window_ms.unwrap_or(defaults.rate_limit.window_ms),
            max_requests: options
                .rate_limit
                .max_requests
                .unwrap_or(defaults.rate_limit.max_requests),
            message: options.rate_limit.message.unwrap_or(defaults.rate_limit.message),
        };

        let mut config = Self {
            whitelist: normalize_ips(options.whitelist),
            blacklist: normalize_ips(options.blacklist),
            allowed_user_agents: options.allowed_user_agents.unwrap_or_default(),
            allowed_origins: options.allowed_origins.unwrap_or_default(),
            rate_limit,
            enable_logging: options.enable_logging.unwrap_or(defaults.enable_logging),
            log_to_file: options.log_to_file.unwrap_or(defaults.log_to_file),
            log_file_path: options.log_file_path.unwrap_or(defaults.log_file_path),
        };

        let mut errors = validation::validate_guard(&config);
        if config.log_to_file {
            match validation::resolve_log_path(base_dir, &config.log_file_path) {
                Some(resolved) => config.log_file_path = resolved,
                None => errors.push(ValidationError::new(
                    "log_file_path",
                    "potential directory traversal: path escapes the working directory",
                )),
            }
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build a configuration from a TOML document whose top level holds the
    /// guard fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        validation::check_shape(&table, "").map_err(ConfigError::Validation)?;
        let options: GuardOptions = toml::Value::Table(table).try_into()?;
        Self::from_options(options)
    }

    /// True when `*` appears in the allowed origins.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn normalize_ips(list: Option<Vec<String>>) -> HashSet<String> {
    list.unwrap_or_default()
        .iter()
        .map(|ip| ClientKey::from_raw(ip).into_string())
        .collect()
}

/// Root configuration for the standalone server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Guard options, merged over defaults at startup.
    pub guard: GuardOptions,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

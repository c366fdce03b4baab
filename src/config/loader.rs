//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{check_shape, ValidationError};

/// Error type for configuration loading and guard construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a server configuration from a TOML file.
///
/// The `[guard]` table is shape-checked here; merging and semantic
/// validation happen when the guard is built from it.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse a server configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let table: toml::Table = content.parse()?;

    if let Some(guard) = table.get("guard") {
        match guard {
            toml::Value::Table(guard) => check_shape(guard, "guard.").map_err(ConfigError::Validation)?,
            _ => {
                return Err(ConfigError::Validation(vec![ValidationError::new(
                    "guard",
                    "must be a table",
                )]))
            }
        }
    }

    Ok(toml::Value::Table(table).try_into()?)
}

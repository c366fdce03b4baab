//! Configuration validation.
//!
//! # Responsibilities
//! - Shape checks on raw TOML before deserialization, so a wrongly typed
//!   field is reported by name instead of as a generic parse error
//! - Semantic checks on the merged [`GuardConfig`] (positive window)
//! - Log path resolution with a directory traversal guard
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before a guard is constructed; nothing here is deferred to
//!   request handling

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::schema::GuardConfig;

/// A single validation failure, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.field, self.reason)
    }
}

const LIST_FIELDS: [&str; 4] = ["whitelist", "blacklist", "allowed_user_agents", "allowed_origins"];

/// Check the raw shape of a guard table.
///
/// `prefix` is prepended to field names in errors (e.g. `"guard."` when the
/// guard options are nested in a larger document).
pub fn check_shape(table: &toml::Table, prefix: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for field in LIST_FIELDS {
        match table.get(field) {
            None => {}
            Some(toml::Value::Array(items)) => {
                if items.iter().any(|item| !item.is_str()) {
                    errors.push(ValidationError::new(
                        format!("{prefix}{field}"),
                        "all entries must be strings",
                    ));
                }
            }
            Some(_) => errors.push(ValidationError::new(
                format!("{prefix}{field}"),
                "must be an array",
            )),
        }
    }

    match table.get("rate_limit") {
        None => {}
        Some(toml::Value::Table(rate_limit)) => {
            match rate_limit.get("window_ms") {
                None => {}
                Some(toml::Value::Integer(ms)) if *ms > 0 => {}
                Some(toml::Value::Integer(_)) => errors.push(ValidationError::new(
                    format!("{prefix}rate_limit.window_ms"),
                    "must be a positive number",
                )),
                Some(_) => errors.push(ValidationError::new(
                    format!("{prefix}rate_limit.window_ms"),
                    "must be a number",
                )),
            }
            match rate_limit.get("max_requests") {
                None => {}
                Some(toml::Value::Integer(n)) if *n >= 0 && *n <= i64::from(u32::MAX) => {}
                Some(_) => errors.push(ValidationError::new(
                    format!("{prefix}rate_limit.max_requests"),
                    "must be a non-negative number",
                )),
            }
        }
        Some(_) => errors.push(ValidationError::new(
            format!("{prefix}rate_limit"),
            "must be a table",
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Semantic checks on a merged configuration.
pub fn validate_guard(config: &GuardConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::new(
            "rate_limit.window_ms",
            "must be a positive number",
        ));
    }
    errors
}

/// Resolve `configured` against `base`, refusing paths that leave `base`.
///
/// Resolution is lexical: `.` and `..` are folded without touching the
/// filesystem, since the file may not exist yet.
pub fn resolve_log_path(base: &Path, configured: &Path) -> Option<PathBuf> {
    let joined = base.join(configured);
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::CurDir => {}
            other => resolved.push(other.as_os_str()),
        }
    }

    if resolved.starts_with(base) && resolved != base {
        Some(resolved)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        src.parse().unwrap()
    }

    #[test]
    fn test_shape_accepts_valid_document() {
        let t = table(
            r#"
            whitelist = ["10.0.0.1"]
            allowed_origins = []
            [rate_limit]
            window_ms = 500
            max_requests = 0
            "#,
        );
        assert!(check_shape(&t, "").is_ok());
    }

    #[test]
    fn test_shape_collects_every_error() {
        let t = table(
            r#"
            whitelist = "10.0.0.1"
            blacklist = 3
            [rate_limit]
            window_ms = "1m"
            "#,
        );
        let errors = check_shape(&t, "guard.").unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["guard.whitelist", "guard.blacklist", "guard.rate_limit.window_ms"]
        );
    }

    #[test]
    fn test_shape_rejects_non_string_entries() {
        let t = table(r#"allowed_user_agents = ["curl", 7]"#);
        let errors = check_shape(&t, "").unwrap_err();
        assert_eq!(errors[0].field, "allowed_user_agents");
    }

    #[test]
    fn test_shape_rejects_negative_window() {
        let t = table("[rate_limit]\nwindow_ms = -5");
        let errors = check_shape(&t, "").unwrap_err();
        assert_eq!(errors[0].field, "rate_limit.window_ms");
    }

    #[test]
    fn test_resolve_log_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            resolve_log_path(base, Path::new("logs/access.log")),
            Some(PathBuf::from("/srv/app/logs/access.log"))
        );
        assert_eq!(
            resolve_log_path(base, Path::new("./logs/../access.log")),
            Some(PathBuf::from("/srv/app/access.log"))
        );
        assert_eq!(resolve_log_path(base, Path::new("../other/access.log")), None);
        assert_eq!(resolve_log_path(base, Path::new("/var/log/access.log")), None);
        assert_eq!(
            resolve_log_path(base, Path::new("/srv/app/logs/a.log")),
            Some(PathBuf::from("/srv/app/logs/a.log"))
        );
        assert_eq!(resolve_log_path(base, Path::new("..")), None);
    }
}

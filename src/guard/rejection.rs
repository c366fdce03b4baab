//! Terminal rejections and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Why a request was turned away. `Display` is the message sent to the
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Request entity too large")]
    PayloadTooLarge,

    #[error("Forbidden: IP is blacklisted")]
    Blacklisted,

    #[error("Forbidden: IP is not whitelisted")]
    NotWhitelisted,

    #[error("Forbidden: User agent is not allowed")]
    UserAgentNotAllowed,

    #[error("Forbidden: Origin is not allowed")]
    OriginNotAllowed { origin: String },

    #[error("{message}")]
    RateLimited { message: String },
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Rejection::Blacklisted
            | Rejection::NotWhitelisted
            | Rejection::UserAgentNotAllowed
            | Rejection::OriginNotAllowed { .. } => StatusCode::FORBIDDEN,
            Rejection::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::PayloadTooLarge => "payload_too_large",
            Rejection::Blacklisted => "blacklisted",
            Rejection::NotWhitelisted => "not_whitelisted",
            Rejection::UserAgentNotAllowed => "user_agent",
            Rejection::OriginNotAllowed { .. } => "origin",
            Rejection::RateLimited { .. } => "rate_limited",
        }
    }

    /// Message recorded in the audit log.
    pub fn log_message(&self) -> String {
        match self {
            Rejection::PayloadTooLarge => "Request too large".to_string(),
            Rejection::OriginNotAllowed { origin } => {
                format!("Forbidden: Origin is not allowed {origin}")
            }
            Rejection::RateLimited { .. } => "Rate limit exceeded".to_string(),
            other => other.to_string(),
        }
    }

    /// JSON body sent to the client.
    pub fn body(&self) -> Value {
        match self {
            Rejection::RateLimited { message } => json!({ "error": message }),
            other => json!({ "message": other.to_string() }),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

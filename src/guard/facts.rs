//! Per-request inputs to the guard pipeline.

use axum::http::Method;

use crate::security::ClientKey;

/// What the pipeline knows about a request before any check runs.
#[derive(Debug, Clone)]
pub struct RequestFacts {
    pub client: ClientKey,
    pub method: Method,
    pub path: String,
    /// Path and query as received.
    pub url: String,
    /// `Origin`, else `Referer`, else the request's own `scheme://host`.
    pub origin: String,
    pub user_agent: String,
    pub content_length: Option<u64>,
}

impl RequestFacts {
    /// Facts for a bare GET of `path` from `client`; the remaining fields
    /// are empty.
    pub fn new(client: ClientKey, method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            client,
            method,
            url: path.clone(),
            path,
            origin: String::new(),
            user_agent: String::new(),
            content_length: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

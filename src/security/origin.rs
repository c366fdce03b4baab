//! Origin allow-list matching.
//!
//! # Design Decisions
//! - Exact `(scheme, host, port)` equality, no prefix or wildcard matching
//! - `*` is handled by the caller before this matcher runs
//! - Fail closed: anything that does not parse never matches
//! - Ports follow URL parsing rules: a port equal to the scheme default is
//!   dropped, a missing port is never filled in

use url::Url;

/// The comparable parts of an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrigin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl ParsedOrigin {
    /// Parse an origin or URL. Returns `None` for empty input, unparseable
    /// input, or URLs without a host.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let url = Url::parse(raw).ok()?;
        let host = url.host_str()?.to_string();
        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
        })
    }
}

/// Returns true if `request_origin` matches one of `allowed_origins`.
///
/// Allow-list entries that fail to parse are skipped.
pub fn is_origin_allowed<S: AsRef<str>>(request_origin: &str, allowed_origins: &[S]) -> bool {
    let Some(requested) = ParsedOrigin::parse(request_origin) else {
        return false;
    };

    allowed_origins
        .iter()
        .filter_map(|allowed| ParsedOrigin::parse(allowed.as_ref()))
        .any(|allowed| allowed == requested)
}

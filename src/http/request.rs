//! Request inspection.
//!
//! # Responsibilities
//! - Reuse or generate the request correlation ID
//! - Extract the facts the guard pipeline needs (client, origin, UA, size)
//!
//! # Design Decisions
//! - The declared origin falls back from `Origin` to `Referer` to the
//!   request's own `scheme://host`
//! - Non-UTF-8 header values are treated as absent

use std::net::IpAddr;

use axum::http::{header, HeaderMap, Request};
use uuid::Uuid;

use crate::guard::RequestFacts;
use crate::security::limits::parse_content_length;
use crate::security::ClientKey;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The incoming `x-request-id` if present, otherwise a fresh UUID v4.
pub fn request_id<B>(request: &Request<B>) -> String {
    header_str(request.headers(), X_REQUEST_ID)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Collect pipeline inputs from a request and its peer address.
pub fn extract_facts<B>(request: &Request<B>, peer: Option<IpAddr>) -> RequestFacts {
    let headers = request.headers();
    let uri = request.uri();

    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    RequestFacts {
        client: peer.map(ClientKey::from_ip).unwrap_or_else(ClientKey::unknown),
        method: request.method().clone(),
        path: uri.path().to_string(),
        url,
        origin: declared_origin(request),
        user_agent: header_str(headers, header::USER_AGENT.as_str())
            .unwrap_or_default()
            .to_string(),
        content_length: header_str(headers, header::CONTENT_LENGTH.as_str())
            .and_then(parse_content_length),
    }
}

fn declared_origin<B>(request: &Request<B>) -> String {
    let headers = request.headers();
    if let Some(origin) = header_str(headers, header::ORIGIN.as_str()).filter(|o| !o.is_empty()) {
        return origin.to_string();
    }
    if let Some(referer) = header_str(headers, header::REFERER.as_str()).filter(|r| !r.is_empty()) {
        return referer.to_string();
    }

    let uri = request.uri();
    let host = header_str(headers, header::HOST.as_str())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()));
    match host {
        Some(host) => format!("{}://{}", uri.scheme_str().unwrap_or("http"), host),
        None => String::new(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;
    use std::net::Ipv4Addr;

    fn peer() -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)))
    }

    #[test]
    fn test_extract_facts() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login?token=abc")
            .header("Host", "api.example.com")
            .header("User-Agent", "Mozilla/5.0")
            .header("Content-Length", "512")
            .header("Origin", "https://app.example.com")
            .body(Body::empty())
            .unwrap();

        let facts = extract_facts(&request, peer());
        assert_eq!(facts.client.as_str(), "10.0.0.7");
        assert_eq!(facts.method, Method::POST);
        assert_eq!(facts.path, "/login");
        assert_eq!(facts.url, "/login?token=abc");
        assert_eq!(facts.origin, "https://app.example.com");
        assert_eq!(facts.user_agent, "Mozilla/5.0");
        assert_eq!(facts.content_length, Some(512));
    }

    #[test]
    fn test_origin_falls_back_to_referer_then_host() {
        let with_referer = Request::builder()
            .uri("/")
            .header("Host", "api.example.com")
            .header("Referer", "https://app.example.com/page")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_facts(&with_referer, peer()).origin,
            "https://app.example.com/page"
        );

        let host_only = Request::builder()
            .uri("/")
            .header("Host", "api.example.com:8080")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_facts(&host_only, peer()).origin, "http://api.example.com:8080");

        let nothing = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(extract_facts(&nothing, None).origin, "");
    }

    #[test]
    fn test_unknown_peer() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(extract_facts(&request, None).client, ClientKey::unknown());
    }

    #[test]
    fn test_request_id_reused_or_generated() {
        let tagged = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&tagged), "abc-123");

        let untagged = Request::builder().body(Body::empty()).unwrap();
        let id = request_id(&untagged);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use api_guard::config::{GuardConfig, GuardOptions};
use api_guard::guard::Guard;
use api_guard::http::protect;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{any, get};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Downstream app: `/` echoes, `/boom` fails, everything else 404s.
pub fn downstream() -> Router {
    Router::new()
        .route("/", any(|| async { "downstream" }))
        .route("/login", any(|| async { "logged in" }))
        .route("/favicon.ico", get(|| async { "icon" }))
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
}

/// Guarded downstream with no background tasks.
pub fn guarded(options: GuardOptions) -> (Router, Arc<Guard>) {
    let config = GuardConfig::from_options(options).unwrap();
    wrap(config)
}

/// Guarded downstream with file logging rooted at `base`.
pub fn guarded_in(options: GuardOptions, base: &Path) -> (Router, Arc<Guard>) {
    let config = GuardConfig::from_options_in(options, base).unwrap();
    wrap(config)
}

fn wrap(config: GuardConfig) -> (Router, Arc<Guard>) {
    let guard = Arc::new(Guard::new(config).unwrap());
    (protect(downstream(), guard.clone()), guard)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send `request` as if it came from `ip`.
pub async fn send_from(router: &Router, mut request: Request<Body>, ip: &str) -> Response {
    let addr: SocketAddr = format!("{ip}:40000")
        .parse::<SocketAddr>()
        .or_else(|_| format!("[{ip}]:40000").parse::<SocketAddr>())
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap the downstream router with the guard and request tracing
//! - Serve with client addresses available to the guard
//! - Stop the guard's background tasks after the listener drains

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, GuardConfig, ServerConfig};
use crate::guard::Guard;
use crate::http::middleware::protect;

/// HTTP server running a downstream router behind the guard.
pub struct HttpServer {
    router: Router,
    guard: Arc<Guard>,
    config: ServerConfig,
}

impl HttpServer {
    /// Build the guard from `config.guard` and wrap `downstream` with it.
    ///
    /// Must be called from within a Tokio runtime: the guard's background
    /// tasks are spawned here.
    pub fn new(config: ServerConfig, downstream: Router) -> Result<Self, ConfigError> {
        let guard_config = GuardConfig::from_options(config.guard.clone())?;
        let guard = Arc::new(Guard::start(guard_config)?);
        let router = protect(downstream, guard.clone()).layer(TraceLayer::new_for_http());
        Ok(Self {
            router,
            guard,
            config,
        })
    }

    /// Run until `shutdown` resolves, then stop the guard.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.guard.shutdown().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn guard(&self) -> Arc<Guard> {
        self.guard.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Downstream used by the standalone binary: `/health` plus an echo of
/// every other request.
pub fn echo_router() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .fallback(echo_handler)
}

async fn echo_handler(method: Method, uri: Uri) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
    }))
}

//! Guard middleware.
//! Runs the gatekeeper pipeline in front of a downstream router.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::guard::{Guard, Verdict};
use crate::http::request::{extract_facts, request_id};
use crate::http::response::ResponseFinalizer;
use crate::observability::metrics::{self, Outcome};
use crate::security::headers::apply_security_headers;

/// Wrap `router` so every request passes through `guard` first.
///
/// The client address comes from `ConnectInfo<SocketAddr>`; serve the
/// router with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn protect<S>(router: Router<S>, guard: Arc<Guard>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(guard, guard_middleware))
}

pub async fn guard_middleware(
    State(guard): State<Arc<Guard>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if Guard::is_exempt(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let started = Instant::now();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let facts = extract_facts(&request, peer);
    let request_id = request_id(&request);

    match guard.evaluate(&facts, started) {
        Verdict::Rejected(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                client = %facts.client,
                reason = rejection.reason(),
                "Request rejected"
            );
            let entry = guard.log_entry(
                &facts,
                &request_id,
                Some(rejection.status().as_u16()),
                started.elapsed(),
                rejection.log_message(),
            );
            guard.record(&entry);
            metrics::record_rejection(rejection.reason());
            rejection.into_response()
        }
        Verdict::Admitted => {
            let finalizer = {
                let guard = guard.clone();
                ResponseFinalizer::new(move |response: &Response| {
                    let status = response.status().as_u16();
                    let elapsed = started.elapsed();
                    let entry =
                        guard.log_entry(&facts, &request_id, Some(status), elapsed, "Response sent");
                    guard.record(&entry);
                    metrics::record_outcome(Outcome::Admitted);
                    metrics::record_request_duration(status, elapsed);
                })
            };

            let mut response = next.run(request).await;
            apply_security_headers(response.headers_mut());
            finalizer.finalize(response)
        }
    }
}

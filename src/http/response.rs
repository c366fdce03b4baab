//! Response finalization hook.
//!
//! The guard needs to observe the downstream response exactly once to
//! write the closing audit entry. `ResponseFinalizer` is that extension
//! point: armed before forwarding, consumed when the response comes back.

use axum::response::Response;

type Hook = Box<dyn FnOnce(&Response) + Send>;

/// One-shot observer of an outgoing response.
pub struct ResponseFinalizer {
    hook: Hook,
}

impl ResponseFinalizer {
    pub fn new<F>(hook: F) -> Self
    where
        F: FnOnce(&Response) + Send + 'static,
    {
        Self {
            hook: Box::new(hook),
        }
    }

    /// Run the hook against `response` and hand the response back.
    pub fn finalize(self, response: Response) -> Response {
        (self.hook)(&response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_hook_sees_status_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(AtomicU16::new(0));
        let finalizer = {
            let calls = calls.clone();
            let seen = seen.clone();
            ResponseFinalizer::new(move |response: &Response| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.store(response.status().as_u16(), Ordering::SeqCst);
            })
        };

        let response = finalizer.finalize((StatusCode::CREATED, "made").into_response());
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 201);
    }
}

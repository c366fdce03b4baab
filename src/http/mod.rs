//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (ConnectInfo)
//!     → server.rs (Axum setup, tracing layer)
//!     → middleware/guard.rs (exempt? → pipeline → reject | forward)
//!     → request.rs (request ID, RequestFacts)
//!     → downstream router
//!     → response.rs (finalizer writes the closing audit entry)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{guard_middleware, protect};
pub use request::X_REQUEST_ID;
pub use response::ResponseFinalizer;
pub use server::{echo_router, HttpServer};

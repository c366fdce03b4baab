//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger → every subscribed background task leaves its loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop accepting, drain, then stop the guard
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;

//! Request size limits.
//!
//! # Design Decisions
//! - Checked against the declared Content-Length before the body is read
//! - A missing or non-numeric Content-Length is not a rejection
//! - Oversized requests get 413 Payload Too Large

/// Largest declared body accepted, in bytes.
pub const MAX_BODY_SIZE: u64 = 10 * 1024;

/// Parse a Content-Length header value.
pub fn parse_content_length(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Returns true if the declared length is over [`MAX_BODY_SIZE`].
pub fn exceeds_body_limit(content_length: Option<u64>) -> bool {
    content_length.is_some_and(|len| len > MAX_BODY_SIZE)
}

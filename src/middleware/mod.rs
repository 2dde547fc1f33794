//! Middleware components for HTTP request processing.
//!
//! Cross-cutting concerns layered onto the router in [`crate::app::build_app`]:
//! response security headers and per-request timing/logging.

pub mod security_headers;
pub mod timing;

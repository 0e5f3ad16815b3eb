//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one hub per request)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded on the span)
//! 4. Bearer auth (entity routes only)

pub mod auth;
pub mod request_id;

pub use auth::require_bearer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

//! HTTP middleware and request extractors.
//!
//! # Middleware Order (outermost first, as layered in `main`)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Security headers
//!
//! Authentication is not a layer: handlers opt in with the [`RequireAuth`]
//! and [`RequireStaff`] extractors.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAuth, RequireStaff};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;

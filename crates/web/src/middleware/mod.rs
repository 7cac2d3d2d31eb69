//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded into the span, echoed in the response)
//! 4. Security headers
//! 5. Session layer (tower-sessions)
//!
//! Anti-forgery tokens live in the session and are checked by the vote
//! handler through [`csrf`].

pub mod csrf;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csrf::{CSRF_FIELD, CsrfToken, verify_csrf_token};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;

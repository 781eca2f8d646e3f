//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with an expiring moka store)
//! 5. Security headers (CSP, frame and isolation policies)

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_store;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{StorefrontSessionLayer, create_session_layer};
pub use session_store::MokaSessionStore;

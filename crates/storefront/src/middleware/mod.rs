//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions) - added in `main`
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on span, echo in response)
//! 4. Session layer (tower-sessions, in-memory store)
//!
//! The [`visitor`] helpers run inside handlers' extractors rather than as a
//! layer.

pub mod request_id;
pub mod session;
pub mod visitor;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
pub use visitor::visitor_id;

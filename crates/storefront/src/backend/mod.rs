//! Client for the products/orders REST backend.
//!
//! # Endpoints
//!
//! ```text
//! GET  {base}/api/products[?q=<query>]  → JSON array of products
//! POST {base}/api/orders                → any JSON on success,
//!                                          {"detail": "..."} on failure
//! ```
//!
//! The backend owns pricing, inventory and order validation. This client
//! does not retry, cache or time out: every call is a single attempt whose
//! outcome is handed straight back to the caller.

mod client;

pub use client::BackendClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {}", .detail.as_deref().unwrap_or("(no detail)"))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A success response did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot address the API.
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// The backend's own explanation, if it sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether the request never produced an HTTP response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Pull a string `detail` out of an error body.
///
/// Bodies that are not JSON, or whose `detail` is missing or not a string,
/// yield `None`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "out of stock"}"#).as_deref(),
            Some("out of stock")
        );
    }

    #[test]
    fn test_error_detail_missing_or_malformed() {
        assert_eq!(error_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(error_detail(r#"{"detail": [{"loc": ["body"]}]}"#), None);
        assert_eq!(error_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(error_detail(""), None);
    }

    #[test]
    fn test_rejected_display() {
        let err = BackendError::Rejected {
            status: StatusCode::BAD_REQUEST,
            detail: Some("out of stock".to_string()),
        };
        assert_eq!(err.to_string(), "Backend returned 400 Bad Request: out of stock");
        assert_eq!(err.detail(), Some("out of stock"));
        assert!(!err.is_network());

        let err = BackendError::Rejected {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert!(err.to_string().ends_with("(no detail)"));
    }
}

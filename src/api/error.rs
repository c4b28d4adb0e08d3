//! API Error Types
//!
//! Every failure the request wrapper can produce. Clients propagate these
//! verbatim; callers pattern-match instead of catching.

use serde_json::Value;
use thiserror::Error;

/// Fallback detail when an error response body is not valid JSON
pub const GENERIC_FAILURE_DETAIL: &str = "Request failed";

/// Request wrapper error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {}", describe(.body))]
    Http {
        /// Numeric status code
        status: u16,
        /// Parsed error body, `{"detail": "Request failed"}` when unparseable
        body: Value,
    },

    /// A 2xx body did not match the endpoint's expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// The request could not be built (bad header name or value)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build an HTTP failure from a status and the raw response body
    pub(crate) fn from_response(status: u16, raw: &[u8]) -> Self {
        let body = serde_json::from_slice(raw)
            .unwrap_or_else(|_| serde_json::json!({ "detail": GENERIC_FAILURE_DETAIL }));
        ApiError::Http { status, body }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a 401
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the request failed below HTTP
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Server-provided `detail` string, if the error body carries one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } => body.get("detail").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Human-readable message for display: the server detail when present
    pub fn user_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

fn describe(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

/// Result type for request wrapper operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_parses_json_body() {
        let err = ApiError::from_response(401, br#"{"detail":"Invalid credentials"}"#);
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), Some("Invalid credentials"));
        assert_eq!(err.to_string(), "HTTP 401: Invalid credentials");
    }

    #[test]
    fn test_from_response_falls_back_on_garbage() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        match &err {
            ApiError::Http { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body, &json!({ "detail": "Request failed" }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_structured_detail_is_displayed() {
        // Validation errors carry a list under `detail`
        let err = ApiError::Http {
            status: 422,
            body: json!({ "detail": [{ "loc": ["body", "email"], "msg": "field required" }] }),
        };
        assert_eq!(err.detail(), None);
        assert!(err.to_string().starts_with("HTTP 422: ["));
        assert_eq!(err.user_message(), err.to_string());
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let err = ApiError::Decode("missing field `valid`".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_transport());
    }
}

//! Error handling for the stock management client
//!
//! Every remote failure is normalized into one of three shapes: transport
//! failure (status 0), timeout (status 408), or an HTTP error carrying the
//! server's status and detail message. The demo simulator never produces
//! an error.

use serde_json::Value;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure: DNS, connection refused, TLS, ...
    #[error("Network error or server unreachable: {0}")]
    Network(String),

    /// The configured request timeout elapsed before a response arrived.
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx HTTP response. `message` is the server-provided `detail`
    /// or `message` field when present, else a generic status line.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// Raw error payload when the body was JSON.
        data: Option<Value>,
    },

    /// A response body did not match the expected model. Client-side,
    /// reported with status 0 like other non-HTTP failures.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Uniform numeric status: 0 for anything that never reached HTTP.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network(_) | ApiError::Decode(_) => 0,
            ApiError::Timeout => 408,
            ApiError::Http { status, .. } => *status,
        }
    }

    /// Build an HTTP error from a status code and raw body, preferring the
    /// server's `detail`/`message` fields for the human message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let data: Option<Value> = serde_json::from_str(body).ok();
        let message = data
            .as_ref()
            .and_then(|v| {
                v.get("detail")
                    .or_else(|| v.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        ApiError::Http {
            status,
            message,
            data,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;

//! Internal error types for token endpoint requests.
//!
//! These errors are internal to `logtail-token` and are mapped to the core
//! `TokenError` at the port boundary.

use thiserror::Error;

/// Result type alias for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors from talking to the token endpoint.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The endpoint answered with a non-success status.
    #[error("token endpoint request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The response body was valid JSON but not the expected shape.
    #[error("invalid response from token endpoint: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

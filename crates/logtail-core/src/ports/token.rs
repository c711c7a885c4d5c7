//! Access token provider port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AccessToken, TokenParams};

/// Errors from access token acquisition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token endpoint did not answer with a success status.
    #[error("access token request failed (status {status:?}): {message}")]
    RequestFailed {
        /// HTTP status, `None` when no response was received
        status: Option<u16>,
        /// Description of the failure
        message: String,
    },

    /// The success response did not contain a token.
    #[error("could not decode access token response: {message}")]
    DecodeFailed {
        /// What was wrong with the body
        message: String,
    },
}

/// Result type alias for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Port for obtaining access tokens that authorize a log stream.
///
/// The implementation lives in `logtail-token`.
///
/// # Design
///
/// - One call may or may not hit the network depending on the policy
///   (per-call vs cached)
/// - `invalidate` lets the session report a token the stream rejected;
///   providers without state ignore it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Fetch a token scoped to `params`.
    async fn fetch_access_token(&self, params: &TokenParams) -> TokenResult<AccessToken>;

    /// Forget any token held for reuse.
    fn invalidate(&self) {}
}

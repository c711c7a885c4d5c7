//! Public configuration for the token client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

/// JSON field holding the token in the endpoint's response body.
pub const DEFAULT_TOKEN_FIELD: &str = "accessControlToken";

/// Configuration for the access token client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use logtail_token::TokenClientConfig;
/// use std::time::Duration;
///
/// let config = TokenClientConfig::new("https://app.example.com/.netlify/functions/generate-token")
///     .with_session_cookie("nf_jwt=abc")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct TokenClientConfig {
    /// Token endpoint URL (query parameters are appended per request)
    pub(crate) endpoint: String,
    /// JSON field holding the token
    pub(crate) token_field: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Raw `Cookie` header carrying the caller's session
    pub(crate) session_cookie: Option<String>,
    /// Bearer credential for the token endpoint
    pub(crate) bearer_token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl TokenClientConfig {
    /// Create a configuration for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            user_agent: concat!("logtail-token/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            session_cookie: None,
            bearer_token: None,
            max_retries: 0,
            retry_base_delay: Duration::from_millis(500),
        }
    }

    /// Set the JSON field holding the token.
    ///
    /// Defaults to `accessControlToken`.
    #[must_use]
    pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
        self.token_field = field.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send the caller's session cookie with every request.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Set an optional session cookie.
    #[must_use]
    pub fn with_optional_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie;
        self
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set an optional bearer token.
    #[must_use]
    pub fn with_optional_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    /// Set the maximum number of retry attempts for 5xx and network errors.
    ///
    /// Defaults to 0: every fetch is exactly one request.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

//! Per-call access token client.
//!
//! Every `fetch_access_token` issues one request to the token endpoint with
//! the full parameter map as its query string.

use logtail_core::LogtailError;
use url::Url;

use crate::config::TokenClientConfig;
use crate::http::{HttpBackend, ReqwestBackend};

/// Default token client using the reqwest HTTP backend.
pub type DefaultTokenClient = TokenClient<ReqwestBackend>;

/// Client for the token endpoint.
///
/// Generic over the HTTP backend for testing. Use `DefaultTokenClient` in
/// production code and talk to it through `AccessTokenProvider`.
pub struct TokenClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) endpoint: Url,
    pub(crate) token_field: String,
}

impl DefaultTokenClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &TokenClientConfig) -> Result<Self, LogtailError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let backend = ReqwestBackend::new(config)
            .map_err(|e| LogtailError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            backend,
            endpoint,
            token_field: config.token_field.clone(),
        })
    }
}

impl<B: HttpBackend> TokenClient<B> {
    /// Create a new client with a custom backend.
    pub fn with_backend(config: &TokenClientConfig, backend: B) -> Result<Self, LogtailError> {
        Ok(Self {
            backend,
            endpoint: parse_endpoint(&config.endpoint)?,
            token_field: config.token_field.clone(),
        })
    }

    /// The configured endpoint without per-request parameters.
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, LogtailError> {
    Url::parse(endpoint)
        .map_err(|e| LogtailError::Configuration(format!("invalid token endpoint '{endpoint}': {e}")))
}

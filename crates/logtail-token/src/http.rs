//! HTTP backend abstraction for the token endpoint.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with optional retry logic for transient errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, COOKIE};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::TokenClientConfig;
use crate::error::{HttpError, HttpResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
///
/// This is an implementation detail - external code should use the
/// `AccessTokenProvider` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL with the caller's credentials and parse the body as JSON.
    ///
    /// Any status other than 200 is an `ApiRequestFailed` error.
    async fn get_json(&self, url: &Url) -> HttpResult<Value>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Session credentials are sent the way a browser would send same-origin
/// credentials: cookies from the cookie store plus an optional explicit
/// session cookie, and an optional bearer token.
pub struct ReqwestBackend {
    client: reqwest::Client,
    session_cookie: Option<String>,
    bearer_token: Option<String>,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &TokenClientConfig) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            session_cookie: config.session_cookie.clone(),
            bearer_token: config.bearer_token.clone(),
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)] // Duration milliseconds won't exceed u64 in practice
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }

    /// Build a request with the configured credentials.
    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(ref cookie) = self.session_cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(ref token) = self.bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Fetch a URL, retrying server and network errors up to `max_retries` times.
    async fn fetch_with_retry(&self, url: &Url) -> HttpResult<reqwest::Response> {
        let mut attempt: u8 = 0;

        loop {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base_delay_ms, attempt);
                debug!(attempt, ?delay, "Retrying token request");
                tokio::time::sleep(delay).await;
            }
            let can_retry = attempt < self.max_retries;
            attempt = attempt.saturating_add(1);

            match self.build_request(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::OK {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && can_retry {
                        continue;
                    }

                    return Err(HttpError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(_) if can_retry => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): the base delay doubled per
/// earlier retry, saturating instead of overflowing.
fn backoff_delay(base_ms: u64, attempt: u8) -> Duration {
    let factor = 2u64
        .checked_pow(u32::from(attempt.saturating_sub(1)))
        .unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url) -> HttpResult<Value> {
        let response = self.fetch_with_retry(url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

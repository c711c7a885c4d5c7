//! Port trait implementation for `TokenClient`.
//!
//! This module implements the core-owned `AccessTokenProvider` trait for
//! `TokenClient`, handling the conversion from internal HTTP errors to
//! core token errors.

use async_trait::async_trait;
use logtail_core::{AccessToken, AccessTokenProvider, TokenError, TokenParams, TokenResult};
use serde_json::Value;
use tracing::debug;

use crate::client::TokenClient;
use crate::error::HttpError;
use crate::http::HttpBackend;
use crate::url::build_token_url;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `HttpError` to core `TokenError`.
fn map_error(err: HttpError) -> TokenError {
    match err {
        HttpError::ApiRequestFailed { status, url } => TokenError::RequestFailed {
            status: Some(status),
            message: format!("failed to get access control token for user ({url})"),
        },
        HttpError::Network(e) => TokenError::RequestFailed {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        },
        HttpError::InvalidResponse { message } => TokenError::DecodeFailed { message },
        HttpError::JsonParse(e) => TokenError::DecodeFailed {
            message: e.to_string(),
        },
    }
}

/// Pull the token out of the response body.
fn extract_token(body: &Value, field: &str) -> Result<AccessToken, HttpError> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or_else(|| HttpError::InvalidResponse {
            message: format!("response has no '{field}' string"),
        })
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> AccessTokenProvider for TokenClient<B> {
    async fn fetch_access_token(&self, params: &TokenParams) -> TokenResult<AccessToken> {
        let url = build_token_url(&self.endpoint, params);
        debug!(endpoint = %self.endpoint, params = params.len(), "Requesting access token");

        let body = self.backend.get_json(&url).await.map_err(map_error)?;
        extract_token(&body, &self.token_field).map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenClientConfig;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn client(backend: FakeBackend) -> TokenClient<FakeBackend> {
        let config = TokenClientConfig::new("https://example.test/generate-token");
        TokenClient::with_backend(&config, backend).unwrap()
    }

    fn params() -> TokenParams {
        TokenParams::from([
            ("deploy_id".to_string(), "d1".to_string()),
            ("site_id".to_string(), "s1".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_returns_token_and_sends_params() {
        let backend = FakeBackend::new()
            .with_response(CannedResponse::ok(&json!({"accessControlToken": "tok1"})));
        let client = client(backend.clone());

        let token = client.fetch_access_token(&params()).await.unwrap();

        assert_eq!(token.as_str(), "tok1");
        assert_eq!(
            backend.requests(),
            ["https://example.test/generate-token?deploy_id=d1&site_id=s1"]
        );
    }

    #[tokio::test]
    async fn test_every_call_hits_the_endpoint() {
        let backend = FakeBackend::new()
            .with_response(CannedResponse::ok(&json!({"accessControlToken": "a"})))
            .with_response(CannedResponse::ok(&json!({"accessControlToken": "b"})));
        let client = client(backend.clone());

        assert_eq!(client.fetch_access_token(&params()).await.unwrap().as_str(), "a");
        assert_eq!(client.fetch_access_token(&params()).await.unwrap().as_str(), "b");
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_failed() {
        let client = client(FakeBackend::new().with_response(CannedResponse::status(401)));

        let err = client.fetch_access_token(&params()).await.unwrap_err();
        assert!(matches!(
            err,
            TokenError::RequestFailed {
                status: Some(401),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_field_is_decode_failed() {
        let client =
            client(FakeBackend::new().with_response(CannedResponse::ok(&json!({"token": "x"}))));

        let err = client.fetch_access_token(&params()).await.unwrap_err();
        assert!(matches!(err, TokenError::DecodeFailed { message } if message.contains("accessControlToken")));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_failed() {
        let client = client(FakeBackend::new().with_response(CannedResponse {
            status: 200,
            body: "ok".to_string(),
        }));

        let err = client.fetch_access_token(&params()).await.unwrap_err();
        assert!(matches!(err, TokenError::DecodeFailed { .. }));
    }

    #[test]
    fn test_extract_token_rejects_empty_and_non_string() {
        assert!(extract_token(&json!({"t": ""}), "t").is_err());
        assert!(extract_token(&json!({"t": 5}), "t").is_err());
        assert_eq!(
            extract_token(&json!({"t": "v"}), "t").unwrap().as_str(),
            "v"
        );
    }

    #[test]
    fn test_map_error_api_failure() {
        let err = map_error(HttpError::ApiRequestFailed {
            status: 500,
            url: "https://example.test".to_string(),
        });
        assert!(matches!(
            err,
            TokenError::RequestFailed {
                status: Some(500),
                ..
            }
        ));
    }
}

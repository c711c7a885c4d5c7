//! Stream kinds and per-connect identifying parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters sent to the token endpoint.
pub type TokenParams = BTreeMap<String, String>;

/// Base URL of the hosted log socket service.
pub const DEFAULT_SOCKET_BASE: &str = "wss://socketeer.services.netlify.com";

/// The category of log stream a session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamKind {
    /// Deploy build logs.
    Build,
    /// Serverless function logs.
    Function,
    /// Edge function logs.
    EdgeFunction,
}

impl StreamKind {
    /// Path segment of the stream on the socket service.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Function => "function",
            Self::EdgeFunction => "edge-function",
        }
    }

    /// Default socket URL for this stream kind.
    #[must_use]
    pub fn default_url(self) -> String {
        format!("{DEFAULT_SOCKET_BASE}/{}/logs", self.as_path())
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for StreamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" | "deploy" => Ok(Self::Build),
            "function" => Ok(Self::Function),
            "edge-function" | "edge_function" | "edge" => Ok(Self::EdgeFunction),
            other => Err(format!("unknown stream kind: {other}")),
        }
    }
}

/// Identifying parameters supplied to each `connect` call.
///
/// `token_query` scopes the access token request; `payload` is sent on the
/// socket together with the token. The two usually carry the same ids, but
/// only the payload carries the `since` cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectParams {
    /// Query parameters for the token endpoint.
    pub token_query: TokenParams,
    /// Fields of the subscription frame.
    pub payload: BTreeMap<String, String>,
}

impl ConnectParams {
    /// Empty parameters; fill with [`with_id`](Self::with_id).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for a deploy's build log stream.
    #[must_use]
    pub fn deploy(site_id: impl Into<String>, deploy_id: impl Into<String>) -> Self {
        Self::new()
            .with_id("deploy_id", deploy_id)
            .with_id("site_id", site_id)
    }

    /// Parameters for a function's log stream.
    #[must_use]
    pub fn function(
        site_id: impl Into<String>,
        function_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_id("function_id", function_id)
            .with_id("account_id", account_id)
            .with_id("site_id", site_id)
    }

    /// Parameters for a deploy's edge function log stream.
    #[must_use]
    pub fn edge_function(site_id: impl Into<String>, deploy_id: impl Into<String>) -> Self {
        Self::deploy(site_id, deploy_id)
    }

    /// Add an identifier to both the token query and the payload.
    #[must_use]
    pub fn with_id(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        self.token_query.insert(key.clone(), value.clone());
        self.payload.insert(key, value);
        self
    }

    /// Only stream entries newer than `since` (payload only).
    #[must_use]
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.payload.insert(
            "since".to_string(),
            since.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        self
    }

    /// Token query merged over session-level defaults.
    ///
    /// Values from this request take precedence over the defaults.
    #[must_use]
    pub fn token_query_with_defaults(&self, defaults: &TokenParams) -> TokenParams {
        let mut merged = defaults.clone();
        merged.extend(
            self.token_query
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_urls() {
        assert_eq!(
            StreamKind::Build.default_url(),
            "wss://socketeer.services.netlify.com/build/logs"
        );
        assert_eq!(
            StreamKind::Function.default_url(),
            "wss://socketeer.services.netlify.com/function/logs"
        );
        assert_eq!(
            StreamKind::EdgeFunction.default_url(),
            "wss://socketeer.services.netlify.com/edge-function/logs"
        );
    }

    #[test]
    fn test_stream_kind_parse() {
        assert_eq!("build".parse::<StreamKind>(), Ok(StreamKind::Build));
        assert_eq!(
            "edge-function".parse::<StreamKind>(),
            Ok(StreamKind::EdgeFunction)
        );
        assert!("metrics".parse::<StreamKind>().is_err());
    }

    #[test]
    fn test_function_params_fill_both_maps() {
        let params = ConnectParams::function("site", "fn", "acct");
        assert_eq!(params.token_query.len(), 3);
        assert_eq!(params.token_query, params.payload);
        assert_eq!(params.payload["function_id"], "fn");
        assert_eq!(params.payload["account_id"], "acct");
    }

    #[test]
    fn test_since_only_in_payload() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let params = ConnectParams::edge_function("site", "deploy").with_since(since);

        assert_eq!(params.payload["since"], "2024-05-01T12:00:00.000Z");
        assert!(!params.token_query.contains_key("since"));
    }

    #[test]
    fn test_request_values_override_defaults() {
        let defaults = TokenParams::from([
            ("site_id".to_string(), "default-site".to_string()),
            ("account_id".to_string(), "acct".to_string()),
        ]);
        let params = ConnectParams::deploy("site", "deploy");

        let merged = params.token_query_with_defaults(&defaults);
        assert_eq!(merged["site_id"], "site");
        assert_eq!(merged["account_id"], "acct");
        assert_eq!(merged["deploy_id"], "deploy");
    }
}

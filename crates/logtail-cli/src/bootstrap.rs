//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI:
//! - Token provider (via logtail-token), optionally behind the global cache
//! - WebSocket connector (via logtail-session)
//! - Consumer printing entries to stdout and permission failures to stderr

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use logtail_core::{AccessTokenProvider, CallbackConsumer, SessionConfig};
use logtail_session::{LogSession, SessionDeps, WsConnector};
use logtail_token::{CachedTokenProvider, DefaultTokenClient, TokenCache, TokenClientConfig};
use tracing::{debug, error};

use crate::parser::Cli;
use crate::presentation::EntryPrinter;

/// Build the token provider selected by the command line.
pub fn token_provider(cli: &Cli) -> Result<Arc<dyn AccessTokenProvider>> {
    let endpoint = cli
        .token_endpoint
        .as_deref()
        .context("missing token endpoint: pass --token-endpoint or set LOGTAIL_TOKEN_ENDPOINT")?;

    let config = TokenClientConfig::new(endpoint)
        .with_optional_session_cookie(cli.session_cookie.clone())
        .with_optional_bearer_token(cli.bearer_token.clone());
    let client = DefaultTokenClient::new(&config)?;

    if cli.cache_token {
        debug!("Using cached access token policy");
        Ok(Arc::new(CachedTokenProvider::new(client, TokenCache::global())))
    } else {
        Ok(Arc::new(client))
    }
}

/// Session settings for the selected stream.
pub fn session_config(cli: &Cli) -> SessionConfig {
    let config = cli.stream_url.as_ref().map_or_else(
        || SessionConfig::for_stream(cli.command.kind()),
        SessionConfig::new,
    );
    config.with_reconnect_delay(Duration::from_millis(cli.reconnect_ms))
}

/// Compose a session that prints the stream to stdout.
///
/// Must be called inside a tokio runtime.
pub fn bootstrap(cli: &Cli) -> Result<LogSession> {
    let tokens = token_provider(cli)?;
    let printer = Arc::new(EntryPrinter::stdout());

    let consumer = CallbackConsumer::new()
        .with_logs_updated(move |logs| {
            if let Err(e) = printer.print_new(&logs) {
                error!(error = %e, "Failed to write log entries");
            }
        })
        .with_forbidden(|| {
            eprintln!("warning: permission denied by the log stream; check your credentials");
        });

    let deps = SessionDeps::new(tokens, Arc::new(WsConnector::new()), Arc::new(consumer));
    Ok(LogSession::new(session_config(cli), deps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use logtail_core::SessionState;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec!["logtail"];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["build", "--site", "s1", "--deploy", "d1"]);
        Cli::parse_from(args)
    }

    #[test]
    fn test_session_config_defaults_to_stream_kind_url() {
        let mut cli = cli(&["--reconnect-ms", "1000"]);
        cli.stream_url = None;
        let config = session_config(&cli);
        assert_eq!(config.url, "wss://socketeer.services.netlify.com/build/logs");
        assert_eq!(config.reconnect_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_session_config_honours_overrides() {
        let cli = cli(&["--stream-url", "wss://custom.test/logs", "--reconnect-ms", "50"]);
        let config = session_config(&cli);
        assert_eq!(config.url, "wss://custom.test/logs");
        assert_eq!(config.reconnect_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_missing_token_endpoint_is_an_error() {
        let mut cli = cli(&[]);
        cli.token_endpoint = None;
        let err = token_provider(&cli).err().unwrap();
        assert!(err.to_string().contains("--token-endpoint"));
    }

    #[test]
    fn test_invalid_token_endpoint_is_an_error() {
        let cli = cli(&["--token-endpoint", "not a url"]);
        assert!(token_provider(&cli).is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_builds_idle_session() {
        let cli = cli(&["--token-endpoint", "https://app.example.test/token", "--cache-token"]);
        let session = bootstrap(&cli).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        session.destroy();
        assert_eq!(session.state(), SessionState::Destroyed);
    }
}

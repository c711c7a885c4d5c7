//! Main CLI parser and top-level argument handling.
//!
//! Every global option can also come from the environment; `main` loads a
//! `.env` file first so those values apply too.

use clap::Parser;

use crate::commands::Commands;

/// Follow a log stream and print its entries.
#[derive(Debug, Parser)]
#[command(name = "logtail")]
#[command(about = "Follow build, function and edge function logs")]
#[command(version)]
pub struct Cli {
    /// Endpoint that issues stream access tokens
    #[arg(long, env = "LOGTAIL_TOKEN_ENDPOINT", global = true)]
    pub token_endpoint: Option<String>,

    /// Session cookie sent to the token endpoint (raw `Cookie` header value)
    #[arg(long, env = "LOGTAIL_SESSION_COOKIE", global = true, hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Bearer token sent to the token endpoint
    #[arg(long, env = "LOGTAIL_BEARER_TOKEN", global = true, hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Stream URL, overriding the default for the stream kind
    #[arg(long, env = "LOGTAIL_STREAM_URL", global = true)]
    pub stream_url: Option<String>,

    /// Delay before reconnecting after the stream closes, in milliseconds
    #[arg(long, env = "LOGTAIL_RECONNECT_MS", default_value_t = 1000, global = true)]
    pub reconnect_ms: u64,

    /// Reuse one access token across reconnects
    #[arg(long, global = true)]
    pub cache_token: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

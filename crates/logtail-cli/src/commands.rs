//! Stream subcommands.

use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use logtail_core::{ConnectParams, StreamKind};

/// Default look-back window for edge function logs.
pub const DEFAULT_SINCE_MINUTES: i64 = 5;

/// Which log stream to follow.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Follow a deploy's build log
    Build {
        /// Site ID
        #[arg(long)]
        site: String,
        /// Deploy ID
        #[arg(long)]
        deploy: String,
    },

    /// Follow a function's log
    Function {
        /// Site ID
        #[arg(long)]
        site: String,
        /// Function ID
        #[arg(long)]
        function: String,
        /// Account ID
        #[arg(long)]
        account: String,
    },

    /// Follow a deploy's edge function log
    EdgeFunction {
        /// Site ID
        #[arg(long)]
        site: String,
        /// Deploy ID
        #[arg(long)]
        deploy: String,
        /// Only show entries from the last N minutes
        #[arg(long, default_value_t = DEFAULT_SINCE_MINUTES)]
        since_minutes: i64,
    },
}

impl Commands {
    /// The stream this command follows.
    pub const fn kind(&self) -> StreamKind {
        match self {
            Self::Build { .. } => StreamKind::Build,
            Self::Function { .. } => StreamKind::Function,
            Self::EdgeFunction { .. } => StreamKind::EdgeFunction,
        }
    }

    /// Connect parameters for this command, with `since` relative to `now`.
    pub fn connect_params(&self, now: DateTime<Utc>) -> ConnectParams {
        match self {
            Self::Build { site, deploy } => ConnectParams::deploy(site, deploy),
            Self::Function {
                site,
                function,
                account,
            } => ConnectParams::function(site, function, account),
            Self::EdgeFunction {
                site,
                deploy,
                since_minutes,
            } => ConnectParams::edge_function(site, deploy)
                .with_since(now - Duration::minutes(*since_minutes)),
        }
    }
}

//! CLI entry point.
//!
//! Parses arguments, composes the session through `bootstrap` and follows
//! the stream until Ctrl-C.

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use logtail_cli::{Cli, bootstrap};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let session = bootstrap(&cli)?;
    info!(stream = %cli.command.kind(), "Following log stream");
    session.connect(cli.command.connect_params(Utc::now()));

    tokio::signal::ctrl_c().await?;
    info!("Interrupted, closing log stream");
    session.destroy();
    Ok(())
}

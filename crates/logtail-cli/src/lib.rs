//! `logtail`: follow a build, function or edge function log stream from the
//! terminal.
//!
//! The library half holds the argument parser, the composition root and the
//! entry printer so they can be tested; `main.rs` only wires them to the
//! runtime.

#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{bootstrap, session_config, token_provider};
pub use commands::Commands;
pub use parser::Cli;
pub use presentation::EntryPrinter;

#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]
// DefaultTokenClient is meant to be used through the AccessTokenProvider
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod cache;
mod client;
mod config;
mod error;
mod http;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Per-call client
pub use client::DefaultTokenClient;

// Cached policy
pub use cache::{CachedTokenProvider, TokenCache};

// Configuration
pub use config::{DEFAULT_TOKEN_FIELD, TokenClientConfig};

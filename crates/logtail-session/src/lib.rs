#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod session;
mod timer;
mod transport;

// ============================================================================
// Public API
// ============================================================================

// Session
pub use session::{LogSession, SessionDeps};

// Timers
pub use timer::{DebounceTimer, ReconnectTimer};

// Transport
pub use transport::WsConnector;

// Silence unused dev-dependency warnings
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use chrono as _;

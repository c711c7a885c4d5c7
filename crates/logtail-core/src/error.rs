//! Crate-wide error umbrella.
//!
//! Each concern owns its own error enum; `LogtailError` lets adapters and the
//! CLI carry any of them through one type.

use thiserror::Error;

use crate::domain::FrameError;
use crate::ports::{TokenError, TransportError};

/// Any failure raised inside a log session.
///
/// None of these ever escape `LogSession::connect`; the session logs them
/// and recovers. The umbrella exists for adapters that want to report them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogtailError {
    /// Access token acquisition failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A server frame was rejected.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The socket failed or closed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LogtailError {
    /// Whether the failure means the stream rejected our credentials.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Frame(FrameError::PermissionDenied { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_keep_messages() {
        let err: LogtailError = TransportError::Closed.into();
        assert_eq!(err.to_string(), "socket closed");

        let err: LogtailError = TokenError::DecodeFailed {
            message: "no field".to_string(),
        }
        .into();
        assert!(err.to_string().contains("no field"));
    }

    #[test]
    fn test_permission_denied_detection() {
        let err: LogtailError = FrameError::PermissionDenied { status: 401 }.into();
        assert!(err.is_permission_denied());

        let err = LogtailError::Configuration("bad url".to_string());
        assert!(!err.is_permission_denied());
    }
}

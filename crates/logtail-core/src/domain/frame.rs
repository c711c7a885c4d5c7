//! Wire frames exchanged with the log socket.
//!
//! The client sends exactly one subscription frame per connection. The server
//! answers with a sequence of JSON frames, each either a log record
//! (`{ "ts": ..., "message": ... }`) or an error signal
//! (`{ "type": "error", "status": ... }`).

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Map, Value};
use thiserror::Error;

use super::token::AccessToken;

/// Field carrying the access token in the subscription frame.
pub const ACCESS_TOKEN_FIELD: &str = "access_token";

/// Error-signal status denoting a permission failure.
pub const PERMISSION_DENIED_STATUS: u64 = 401;

/// A decoded log record frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// The log line content
    pub message: String,
}

/// Reasons a server frame did not yield a log record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The stream rejected our credentials.
    #[error("permission denied by log stream (status {status})")]
    PermissionDenied {
        /// Status reported by the stream
        status: u64,
    },

    /// The stream sent an error signal other than a permission failure.
    #[error("log stream reported an error (status {status:?}): {detail}")]
    Remote {
        /// Status reported by the stream, if any
        status: Option<u64>,
        /// Raw frame text
        detail: String,
    },

    /// The frame could not be decoded.
    #[error("malformed log frame: {reason}")]
    Malformed {
        /// What was wrong with the frame
        reason: String,
    },
}

impl FrameError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Whether this error is a permission failure.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Decode one server frame into a log record.
pub fn parse_frame(text: &str) -> Result<LogRecord, FrameError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FrameError::malformed(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(FrameError::malformed("frame is not a JSON object"));
    };

    if fields.get("type").and_then(Value::as_str) == Some("error") {
        let status = fields.get("status").and_then(Value::as_u64);
        return Err(match status {
            Some(PERMISSION_DENIED_STATUS) => FrameError::PermissionDenied {
                status: PERMISSION_DENIED_STATUS,
            },
            _ => FrameError::Remote {
                status,
                detail: text.to_string(),
            },
        });
    }

    let timestamp = fields
        .get("ts")
        .ok_or_else(|| FrameError::malformed("missing 'ts'"))
        .and_then(parse_timestamp)?;
    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| FrameError::malformed("missing 'message'"))?
        .to_string();

    Ok(LogRecord { timestamp, message })
}

/// Accepts integer millis, numeric strings and RFC 3339 timestamps.
#[allow(clippy::cast_possible_truncation)]
fn parse_timestamp(value: &Value) -> Result<i64, FrameError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .ok_or_else(|| FrameError::malformed(format!("invalid 'ts': {n}"))),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.timestamp_millis())
            })
            .ok_or_else(|| FrameError::malformed(format!("invalid 'ts': {s}"))),
        other => Err(FrameError::malformed(format!("invalid 'ts': {other}"))),
    }
}

/// Build the subscription frame: the payload fields plus the access token.
#[must_use]
pub fn subscription_frame(payload: &BTreeMap<String, String>, token: &AccessToken) -> String {
    let mut frame: Map<String, Value> = payload
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    frame.insert(
        ACCESS_TOKEN_FIELD.to_string(),
        Value::String(token.as_str().to_string()),
    );
    Value::Object(frame).to_string()
}

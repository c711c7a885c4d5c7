//! Session configuration.
//!
//! Construction-time settings of a log session. Pure data; the session
//! crate reads it when spawning its driver.

use std::time::Duration;

use crate::domain::{StreamKind, TokenParams};

/// Default delay before reconnecting after a socket closes.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Quiet period after the last appended entry before consumers are notified.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(250);

/// Configuration for one log session.
///
/// # Example
///
/// ```
/// use logtail_core::{SessionConfig, StreamKind};
/// use std::time::Duration;
///
/// let config = SessionConfig::for_stream(StreamKind::Function)
///     .with_default_param("account_id", "acct-1")
///     .with_reconnect_delay(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Socket URL of the log stream
    pub url: String,
    /// Token query values used when a connect call does not supply them
    pub default_params: TokenParams,
    /// Delay between a socket close and the next connect attempt
    pub reconnect_delay: Duration,
    /// Debounce window for update notifications
    pub debounce_delay: Duration,
}

impl SessionConfig {
    /// Configuration for an explicit stream URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_params: TokenParams::new(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
        }
    }

    /// Configuration for the hosted URL of a stream kind.
    #[must_use]
    pub fn for_stream(kind: StreamKind) -> Self {
        Self::new(kind.default_url())
    }

    /// Add a default token query parameter.
    #[must_use]
    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }

    /// Set the reconnect delay.
    ///
    /// Defaults to 1 second.
    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set an optional reconnect delay, keeping the default for `None`.
    #[must_use]
    pub fn with_optional_reconnect_delay(self, delay: Option<Duration>) -> Self {
        match delay {
            Some(delay) => self.with_reconnect_delay(delay),
            None => self,
        }
    }

    /// Set the debounce window.
    ///
    /// Defaults to 250ms.
    #[must_use]
    pub const fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::for_stream(StreamKind::Build);
        assert_eq!(config.url, "wss://socketeer.services.netlify.com/build/logs");
        assert_eq!(config.reconnect_delay, Duration::from_millis(1000));
        assert_eq!(config.debounce_delay, Duration::from_millis(250));
        assert!(config.default_params.is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::new("wss://custom.test/logs")
            .with_default_param("site_id", "s1")
            .with_reconnect_delay(Duration::from_millis(100))
            .with_debounce_delay(Duration::from_millis(50));

        assert_eq!(config.url, "wss://custom.test/logs");
        assert_eq!(config.default_params["site_id"], "s1");
        assert_eq!(config.reconnect_delay, Duration::from_millis(100));
        assert_eq!(config.debounce_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_optional_reconnect_delay() {
        let config = SessionConfig::new("wss://a.test").with_optional_reconnect_delay(None);
        assert_eq!(config.reconnect_delay, DEFAULT_RECONNECT_DELAY);

        let config = SessionConfig::new("wss://a.test")
            .with_optional_reconnect_delay(Some(Duration::from_secs(2)));
        assert_eq!(config.reconnect_delay, Duration::from_secs(2));
    }
}

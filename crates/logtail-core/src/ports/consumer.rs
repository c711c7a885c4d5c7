//! Log consumer port.
//!
//! The consumer is the UI-facing side of a session: it receives coalesced
//! buffer snapshots and permission failures.

use std::fmt;

use crate::domain::LogEntry;

/// Port for receiving session notifications.
///
/// Implementations should not block; they run on the session's event loop.
pub trait LogConsumer: Send + Sync {
    /// The buffer changed. `snapshot` holds every entry so far, in order.
    fn on_logs_updated(&self, snapshot: Vec<LogEntry>);

    /// The stream rejected the session's credentials.
    ///
    /// Invoked once per rejection; repeated rejections invoke it again.
    fn on_forbidden(&self) {}
}

type UpdateFn = Box<dyn Fn(Vec<LogEntry>) + Send + Sync>;
type ForbiddenFn = Box<dyn Fn() + Send + Sync>;

/// Consumer built from optional closures.
///
/// # Example
///
/// ```
/// use logtail_core::ports::CallbackConsumer;
///
/// let consumer = CallbackConsumer::new()
///     .with_logs_updated(|logs| println!("{} entries", logs.len()))
///     .with_forbidden(|| eprintln!("permission denied"));
/// ```
#[derive(Default)]
pub struct CallbackConsumer {
    updated: Option<UpdateFn>,
    forbidden: Option<ForbiddenFn>,
}

impl CallbackConsumer {
    /// Consumer with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the update callback.
    #[must_use]
    pub fn with_logs_updated(mut self, f: impl Fn(Vec<LogEntry>) + Send + Sync + 'static) -> Self {
        self.updated = Some(Box::new(f));
        self
    }

    /// Set the forbidden callback.
    #[must_use]
    pub fn with_forbidden(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.forbidden = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CallbackConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackConsumer")
            .field("updated", &self.updated.is_some())
            .field("forbidden", &self.forbidden.is_some())
            .finish()
    }
}

impl LogConsumer for CallbackConsumer {
    fn on_logs_updated(&self, snapshot: Vec<LogEntry>) {
        if let Some(f) = &self.updated {
            f(snapshot);
        }
    }

    fn on_forbidden(&self) {
        if let Some(f) = &self.forbidden {
            f();
        }
    }
}

/// A consumer that discards every notification.
#[derive(Debug, Clone, Default)]
pub struct NoopConsumer;

impl NoopConsumer {
    /// Create a new no-op consumer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogConsumer for NoopConsumer {
    fn on_logs_updated(&self, _snapshot: Vec<LogEntry>) {
        // Intentionally do nothing
    }
}

//! Outcome Reporter - Structured Event Stream
//!
//! Every layer reports through this sink: the wait engine, verified actions,
//! page objects, and the API wrapper. Recording never fails the caller; a
//! detail payload that cannot be serialized is downgraded to a best-effort
//! fallback message. Ordering is preserved only within a single calling task.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Severity level of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal progress.
    Info,
    /// Unexpected but recoverable.
    Warn,
    /// Failure detail.
    Error,
}

impl EventLevel {
    /// Get the level name as used in rendered output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for EventLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded event. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Creation time (wall clock).
    pub timestamp: DateTime<Utc>,
    /// Severity level.
    pub level: EventLevel,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail payload.
    pub detail: Option<Value>,
}

/// Structured outcome reporter.
///
/// Cheaply clonable; clones share the same append-only event stream and flow
/// id, so the collaborators of one logical flow report into one place. Each
/// record is mirrored to `tracing` at the matching level.
///
/// # Example
///
/// ```
/// use tantear::reporter::{EventLevel, Reporter};
///
/// let reporter = Reporter::new();
/// reporter.info("navigated to homepage");
/// reporter.record(
///     EventLevel::Warn,
///     "dropdown slow to expand",
///     Some(serde_json::json!({ "elapsed_ms": 1800 })),
/// );
/// assert_eq!(reporter.events().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Reporter {
    flow: Uuid,
    events: Arc<Mutex<Vec<Event>>>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create a reporter with a fresh flow id and empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flow: Uuid::new_v4(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The flow id shared by all clones of this reporter.
    #[must_use]
    pub const fn flow(&self) -> Uuid {
        self.flow
    }

    /// Record an event. Never fails the caller; if the stream lock is
    /// poisoned the event still reaches `tracing`.
    pub fn record(&self, level: EventLevel, message: impl Into<String>, detail: Option<Value>) {
        let message = message.into();
        match level {
            EventLevel::Debug => tracing::debug!(flow = %self.flow, "{message}"),
            EventLevel::Info => tracing::info!(flow = %self.flow, "{message}"),
            EventLevel::Warn => tracing::warn!(flow = %self.flow, "{message}"),
            EventLevel::Error => tracing::error!(flow = %self.flow, "{message}"),
        }
        let event = Event {
            timestamp: Utc::now(),
            level,
            message,
            detail,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Record an event with a serializable detail payload. If serialization
    /// fails the event is downgraded to a message-only warning instead of
    /// propagating the failure.
    pub fn record_with<T: Serialize>(
        &self,
        level: EventLevel,
        message: impl Into<String>,
        detail: &T,
    ) {
        let message = message.into();
        match serde_json::to_value(detail) {
            Ok(value) => self.record(level, message, Some(value)),
            Err(err) => self.record(
                EventLevel::Warn,
                format!("{message} (detail unavailable: {err})"),
                None,
            ),
        }
    }

    /// Record a debug event.
    pub fn debug(&self, message: impl Into<String>) {
        self.record(EventLevel::Debug, message, None);
    }

    /// Record an info event.
    pub fn info(&self, message: impl Into<String>) {
        self.record(EventLevel::Info, message, None);
    }

    /// Record a warning event.
    pub fn warn(&self, message: impl Into<String>) {
        self.record(EventLevel::Warn, message, None);
    }

    /// Record an error event.
    pub fn error(&self, message: impl Into<String>) {
        self.record(EventLevel::Error, message, None);
    }

    /// Snapshot of the event stream in creation order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of events at the given level.
    #[must_use]
    pub fn count_at(&self, level: EventLevel) -> usize {
        self.events()
            .iter()
            .filter(|e| e.level == level)
            .count()
    }

    /// Messages of all events at the given level, in order.
    #[must_use]
    pub fn messages_at(&self, level: EventLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

//! Port for structured debate event logging.
//!
//! Defines the [`DebateEventLogger`] trait for recording debate events
//! (turns, gate verdicts, rejections, council verdicts) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! deliberation record in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured debate event for logging.
pub struct DebateEvent {
    /// Event type identifier (e.g., "turn_recorded", "session_rejected").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DebateEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging debate events to a structured log.
///
/// `log` is synchronous and infallible; a broken log must not stop a
/// deliberation.
pub trait DebateEventLogger: Send + Sync {
    fn log(&self, event: DebateEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEventLogger;

impl DebateEventLogger for NoEventLogger {
    fn log(&self, _event: DebateEvent) {}
}

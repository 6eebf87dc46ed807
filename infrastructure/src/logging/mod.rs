//! Structured deliberation logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements
//! the [`DebateEventLogger`](council_application::DebateEventLogger) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLogger;

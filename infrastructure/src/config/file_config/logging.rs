//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write operation logs to this file
    pub file: Option<PathBuf>,
    /// Write the structured debate event log (JSONL) here
    pub event_log: Option<PathBuf>,
}

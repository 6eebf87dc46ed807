//! Structured configuration issues.
//!
//! Loaders report problems as a list of [`ConfigIssue`]s instead of failing
//! on the first one, so `council validate` can show everything at once.
//!
//! # Examples
//!
//! ```
//! use council_domain::config::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
//!
//! let issues = vec![ConfigIssue::warning(
//!     ConfigIssueCode::LenientNeverRejects,
//!     "lenient strictness never rejects a turn",
//! )];
//! assert!(!has_errors(&issues));
//! ```

use serde::Serialize;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigIssueCode {
    /// `debate.max_rounds` is zero: no adversary challenge could ever run.
    ZeroMaxRounds,
    /// A timeout or deadline is zero.
    ZeroTimeout,
    /// `server.listen` is not a socket address.
    InvalidListenAddress,
    /// `agents.base_url` is not an http(s) URL.
    InvalidAgentUrl,
    /// A `[[gate.checks]]` entry has a pattern that does not compile.
    InvalidCheckPattern,
    /// A `[[gate.checks]]` entry has an unknown kind.
    UnknownCheckKind,
    /// `council.default` is empty.
    MissingDefaultCouncil,
    /// Strictness is lenient: the gate can warn but never reject.
    LenientNeverRejects,
    /// `debate.retry_backoff_ms` is empty: timeouts are never retried.
    NoRetries,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}", self.message)
    }
}

/// Whether any issue is fatal
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

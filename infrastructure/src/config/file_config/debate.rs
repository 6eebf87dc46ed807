//! Debate configuration from TOML (`[debate]` section)

use council_application::DebateParams;
use council_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_MAX_ROUNDS, StrictnessLevel, ViolationSeverity,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_rounds: u32,
    /// Strictness used when a request does not name one
    pub strictness: StrictnessLevel,
    pub moderate_reject_at: ViolationSeverity,
    pub turn_timeout_ms: u64,
    /// One entry per retry of a timed-out turn
    pub retry_backoff_ms: Vec<u64>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            strictness: StrictnessLevel::default(),
            moderate_reject_at: ViolationSeverity::Critical,
            turn_timeout_ms: 60_000,
            retry_backoff_ms: vec![250, 1_000],
        }
    }
}

impl FileDebateConfig {
    pub fn to_params(&self) -> DebateParams {
        DebateParams::default()
            .with_max_rounds(self.max_rounds)
            .with_moderate_reject_at(self.moderate_reject_at)
            .with_turn_timeout(Duration::from_millis(self.turn_timeout_ms))
            .with_retry_backoff(
                self.retry_backoff_ms
                    .iter()
                    .map(|ms| Duration::from_millis(*ms))
                    .collect(),
            )
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxRounds,
                "debate.max_rounds must be at least 1",
            ));
        }
        if self.turn_timeout_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "debate.turn_timeout_ms cannot be 0",
            ));
        }
        if self.retry_backoff_ms.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoRetries,
                "debate.retry_backoff_ms is empty: timed-out turns are not retried",
            ));
        }
        if self.strictness == StrictnessLevel::Lenient {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::LenientNeverRejects,
                "debate.strictness is lenient: the gate never rejects a turn",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let config = FileDebateConfig {
            retry_backoff_ms: vec![10],
            ..Default::default()
        };
        let params = config.to_params();
        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.retry_backoff, vec![Duration::from_millis(10)]);
        assert_eq!(params.max_attempts(), 2);
    }

    #[test]
    fn test_zero_rounds_is_error() {
        let config = FileDebateConfig {
            max_rounds: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroMaxRounds);
    }
}

//! Debate and council parameters: use case loop control.
//!
//! [`DebateParams`] groups the static parameters that control the debate
//! loop in [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase),
//! [`CouncilParams`] those of vote collection. These are application-layer
//! concerns, not domain policy.

use council_domain::{DEFAULT_MAX_ROUNDS, ViolationSeverity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Debate loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    /// Adversary↔critic rounds when the request does not say.
    pub max_rounds: u32,
    /// Lowest severity that rejects under moderate strictness.
    pub moderate_reject_at: ViolationSeverity,
    /// Budget for a single agent invocation.
    pub turn_timeout: Duration,
    /// Sleep before each retry of a timed-out invocation; its length is the retry count.
    pub retry_backoff: Vec<Duration>,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            moderate_reject_at: ViolationSeverity::Critical,
            turn_timeout: Duration::from_secs(60),
            retry_backoff: vec![Duration::from_millis(250), Duration::from_secs(1)],
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_moderate_reject_at(mut self, severity: ViolationSeverity) -> Self {
        self.moderate_reject_at = severity;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Vec<Duration>) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Total attempts allowed for one turn
    pub fn max_attempts(&self) -> u32 {
        self.retry_backoff.len() as u32 + 1
    }
}

/// Vote collection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilParams {
    /// Shared deadline for all discipline evaluations.
    pub deadline: Duration,
}

impl Default for CouncilParams {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(30),
        }
    }
}

impl CouncilParams {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DebateParams::default();
        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.moderate_reject_at, ViolationSeverity::Critical);
        assert_eq!(params.max_attempts(), 3);
        assert_eq!(CouncilParams::default().deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let params = DebateParams::default()
            .with_max_rounds(5)
            .with_turn_timeout(Duration::from_millis(10))
            .with_retry_backoff(Vec::new());

        assert_eq!(params.max_rounds, 5);
        assert_eq!(params.turn_timeout, Duration::from_millis(10));
        assert_eq!(params.max_attempts(), 1);
    }
}

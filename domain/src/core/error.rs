//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid council configuration: {0}")]
    InvalidCouncilConfig(String),

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("Invalid constitution: {0}")]
    InvalidConstitution(String),

    #[error("Session {0} is terminal and can no longer be modified")]
    SessionTerminal(String),

    #[error("Session {0} has not reached a terminal state")]
    SessionNotTerminal(String),

    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error is a council configuration problem
    pub fn is_council_config(&self) -> bool {
        matches!(self, DomainError::InvalidCouncilConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_council_config_display() {
        let error = DomainError::InvalidCouncilConfig("weights sum to 0.9".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid council configuration: weights sum to 0.9"
        );
    }

    #[test]
    fn test_is_council_config_check() {
        let council = DomainError::InvalidCouncilConfig("x".into());
        let session = DomainError::SessionTerminal("s".into());
        let constitution = DomainError::InvalidConstitution("c".into());
        assert!(council.is_council_config());
        assert!(!session.is_council_config());
        assert!(!constitution.is_council_config());
    }
}

//! Debate session states

use super::role::AgentRole;
use serde::{Deserialize, Serialize};

/// State of a debate session
///
/// ```text
/// PLANNING -> RESEARCH -> SYNTHESIS -> STRATEGY -> ADVERSARY_CHALLENGE
///   ADVERSARY_CHALLENGE -> CONSTITUTIONAL_REVIEW
///   CONSTITUTIONAL_REVIEW -> RECOMMENDATION | ADVERSARY_CHALLENGE | REJECTED
///   RECOMMENDATION -> COMPLETE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebateState {
    Planning,
    Research,
    Synthesis,
    Strategy,
    AdversaryChallenge,
    ConstitutionalReview,
    Recommendation,
    Complete,
    Rejected,
}

impl DebateState {
    /// The agent role whose turn is produced on entering this state.
    ///
    /// `Planning` and the terminal states produce no turn.
    pub fn role(&self) -> Option<AgentRole> {
        match self {
            DebateState::Research => Some(AgentRole::Researcher),
            DebateState::Synthesis => Some(AgentRole::Synthesiser),
            DebateState::Strategy => Some(AgentRole::Strategist),
            DebateState::AdversaryChallenge => Some(AgentRole::Adversary),
            DebateState::ConstitutionalReview => Some(AgentRole::ConstitutionalCritic),
            DebateState::Recommendation => Some(AgentRole::Recommender),
            DebateState::Planning | DebateState::Complete | DebateState::Rejected => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DebateState::Complete | DebateState::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebateState::Planning => "PLANNING",
            DebateState::Research => "RESEARCH",
            DebateState::Synthesis => "SYNTHESIS",
            DebateState::Strategy => "STRATEGY",
            DebateState::AdversaryChallenge => "ADVERSARY_CHALLENGE",
            DebateState::ConstitutionalReview => "CONSTITUTIONAL_REVIEW",
            DebateState::Recommendation => "RECOMMENDATION",
            DebateState::Complete => "COMPLETE",
            DebateState::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for DebateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

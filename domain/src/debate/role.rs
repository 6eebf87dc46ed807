//! Agent roles participating in a debate

use serde::{Deserialize, Serialize};

/// The closed set of agent roles a debate can invoke.
///
/// Every role maps to exactly one working state of the debate state machine,
/// so dispatch is exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Researcher,
    Synthesiser,
    Strategist,
    Adversary,
    ConstitutionalCritic,
    Recommender,
}

impl AgentRole {
    /// All roles in debate order
    pub const ALL: [AgentRole; 6] = [
        AgentRole::Researcher,
        AgentRole::Synthesiser,
        AgentRole::Strategist,
        AgentRole::Adversary,
        AgentRole::ConstitutionalCritic,
        AgentRole::Recommender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Researcher => "researcher",
            AgentRole::Synthesiser => "synthesiser",
            AgentRole::Strategist => "strategist",
            AgentRole::Adversary => "adversary",
            AgentRole::ConstitutionalCritic => "constitutional_critic",
            AgentRole::Recommender => "recommender",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Researcher => "Researcher",
            AgentRole::Synthesiser => "Synthesiser",
            AgentRole::Strategist => "Strategist",
            AgentRole::Adversary => "Adversary",
            AgentRole::ConstitutionalCritic => "Constitutional Critic",
            AgentRole::Recommender => "Recommender",
        }
    }

    /// Whether the constitutional gate runs after this role's turn.
    ///
    /// Gating starts with the adversary and covers every later role.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            AgentRole::Adversary | AgentRole::ConstitutionalCritic | AgentRole::Recommender
        )
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .or(match normalized.as_str() {
                "critic" => Some(AgentRole::ConstitutionalCritic),
                "synthesizer" => Some(AgentRole::Synthesiser),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown agent role: {}", s))
    }
}

//! Debate session entities
//!
//! A [`DebateSession`] is owned by the orchestrator for its whole lifetime.
//! Every mutating method refuses to run once the session is terminal, so a
//! finished transcript cannot change.

use super::role::AgentRole;
use super::state::DebateState;
use crate::constitution::gate::{GateVerdict, Violation};
use crate::constitution::strictness::StrictnessLevel;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of adversary↔critic cycles
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Opaque pointer to evidence owned by the retrieval collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroundingRef(String);

impl GroundingRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroundingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One agent's contribution, gated and recorded in sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Position in the transcript (0-indexed)
    pub index: usize,
    pub role: AgentRole,
    /// Adversary↔critic round this turn belongs to (0 before the first challenge)
    pub round: u32,
    /// Reference to the input payload handed to the agent
    pub context_ref: String,
    pub content: String,
    pub grounding: Vec<GroundingRef>,
    /// Gate verdict, present for gated roles only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateVerdict>,
    /// Invocation attempts it took to produce this turn
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
}

/// Why a session ended in `REJECTED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The gate rejected a turn
    ConstitutionalReject,
    /// Still warning after the last allowed round
    RoundsExhausted,
    /// Agent timed out on every attempt
    AgentUnavailable,
    /// Agent response failed schema validation
    MalformedAgentOutput,
    /// Agent invocation failed with a non-transient error
    AgentFailed,
    /// Caller cancelled the session
    Cancelled,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::ConstitutionalReject => "constitutional_reject",
            RejectionReason::RoundsExhausted => "rounds_exhausted",
            RejectionReason::AgentUnavailable => "agent_unavailable",
            RejectionReason::MalformedAgentOutput => "malformed_agent_output",
            RejectionReason::AgentFailed => "agent_failed",
            RejectionReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured explanation attached to a rejected session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: RejectionReason,
    pub round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AgentRole>,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Original agent payload, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Rejection {
    pub fn new(reason: RejectionReason, round: u32, detail: impl Into<String>) -> Self {
        Self {
            reason,
            round,
            role: None,
            detail: detail.into(),
            violations: Vec::new(),
            payload: None,
        }
    }

    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.violations = violations;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Content of a turn about to be recorded
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub role: AgentRole,
    pub context_ref: String,
    pub content: String,
    pub grounding: Vec<GroundingRef>,
    pub gate: Option<GateVerdict>,
    pub attempts: u32,
}

/// A bounded debate over one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateSession {
    id: Uuid,
    tenant_id: String,
    strategy_ref: String,
    turns: Vec<Turn>,
    state: DebateState,
    round: u32,
    max_rounds: u32,
    strictness: StrictnessLevel,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<Rejection>,
}

impl DebateSession {
    pub fn new(
        tenant_id: impl Into<String>,
        strategy_ref: impl Into<String>,
        max_rounds: u32,
        strictness: StrictnessLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.into(),
            strategy_ref: strategy_ref.into(),
            turns: Vec::new(),
            state: DebateState::Planning,
            round: 0,
            max_rounds,
            strictness,
            created_at: Utc::now(),
            finished_at: None,
            rejection: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn strategy_ref(&self) -> &str {
        &self.strategy_ref
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn state(&self) -> DebateState {
        self.state
    }

    /// Current adversary↔critic round (0 before the first challenge)
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn strictness(&self) -> StrictnessLevel {
        self.strictness
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Content of the recommender's turn, if the debate got that far
    pub fn recommendation(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == AgentRole::Recommender)
            .map(|t| t.content.as_str())
    }

    /// Input reference for the next turn to be recorded
    pub fn next_context_ref(&self) -> String {
        format!("{}/{}", self.id, self.turns.len())
    }

    /// Append a turn at the current round
    pub fn record_turn(&mut self, record: TurnRecord) -> Result<&Turn, DomainError> {
        self.ensure_open()?;
        if self.state.role() != Some(record.role) {
            return Err(DomainError::IllegalTransition {
                from: self.state.to_string(),
                to: format!("{} turn", record.role.as_str()),
            });
        }

        let index = self.turns.len();
        self.turns.push(Turn {
            index,
            role: record.role,
            round: self.round,
            context_ref: record.context_ref,
            content: record.content,
            grounding: record.grounding,
            gate: record.gate,
            attempts: record.attempts,
            timestamp: Utc::now(),
        });
        Ok(&self.turns[index])
    }

    /// Move to a non-rejected state with the given round counter
    pub fn transition(&mut self, next: DebateState, round: u32) -> Result<(), DomainError> {
        self.ensure_open()?;
        if next == DebateState::Rejected || round < self.round || round > self.max_rounds {
            return Err(DomainError::IllegalTransition {
                from: format!("{} (round {})", self.state, self.round),
                to: format!("{} (round {})", next, round),
            });
        }

        self.state = next;
        self.round = round;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Terminate the session as rejected
    pub fn reject(&mut self, rejection: Rejection) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.state = DebateState::Rejected;
        self.rejection = Some(rejection);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::SessionTerminal(self.id.to_string()));
        }
        Ok(())
    }
}

//! Decision brief compilation
//!
//! Merges a terminal debate session with the council verdict into the
//! document handed back to the caller.

use crate::council::aggregate::{CouncilVerdict, Recommendation};
use crate::core::error::DomainError;
use crate::debate::{DebateSession, DebateState, RejectionReason, Turn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBrief {
    pub session_id: Uuid,
    pub tenant_id: String,
    pub strategy_ref: String,
    pub state: DebateState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_detail: Option<String>,
    pub transcript: Vec<Turn>,
    pub council: CouncilVerdict,
    pub final_recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

impl DecisionBrief {
    pub fn is_endorsed(&self) -> bool {
        self.final_recommendation == Recommendation::Endorse
    }
}

/// Compile a brief stamped with the current time
pub fn compile(
    session: &DebateSession,
    verdict: &CouncilVerdict,
) -> Result<DecisionBrief, DomainError> {
    compile_at(session, verdict, Utc::now())
}

/// Compile a brief with an explicit clock.
///
/// A rejected session always yields `not_evidence_qualified` with zero
/// confidence; the verdict is still attached so the vote can be audited.
pub fn compile_at(
    session: &DebateSession,
    verdict: &CouncilVerdict,
    now: DateTime<Utc>,
) -> Result<DecisionBrief, DomainError> {
    let (final_recommendation, recommendation, confidence) = match session.state() {
        DebateState::Complete => (
            verdict.final_recommendation,
            session.recommendation().map(str::to_string),
            verdict.confidence,
        ),
        DebateState::Rejected => (Recommendation::NotEvidenceQualified, None, 0.0),
        _ => return Err(DomainError::SessionNotTerminal(session.id().to_string())),
    };

    let rejection = session.rejection();
    Ok(DecisionBrief {
        session_id: session.id(),
        tenant_id: session.tenant_id().to_string(),
        strategy_ref: session.strategy_ref().to_string(),
        state: session.state(),
        rejection_reason: rejection.map(|r| r.reason),
        rejection_detail: rejection.map(|r| r.detail.clone()),
        transcript: session.turns().to_vec(),
        council: verdict.clone(),
        final_recommendation,
        recommendation,
        confidence,
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constitution::StrictnessLevel;
    use crate::debate::{AgentRole, Rejection, TurnRecord};

    fn verdict(quorum_reached: bool) -> CouncilVerdict {
        CouncilVerdict {
            weighted_score: 0.8,
            consensus_level: 1.0,
            dissenting_views: Vec::new(),
            final_recommendation: if quorum_reached {
                Recommendation::Endorse
            } else {
                Recommendation::EscalateToHuman
            },
            confidence: 0.8,
            quorum_reached,
            tie_break_applied: false,
            veto_applied: false,
            vetoing_disciplines: Vec::new(),
            reduced_quorum: false,
            abstentions: Vec::new(),
        }
    }

    fn completed_session() -> DebateSession {
        let mut s = DebateSession::new("acme", "strategy:1", 3, StrictnessLevel::Moderate);
        s.transition(DebateState::Recommendation, 1).unwrap();
        s.record_turn(TurnRecord {
            role: AgentRole::Recommender,
            context_ref: "ctx".into(),
            content: "Expand into the mid-market segment".into(),
            grounding: Vec::new(),
            gate: None,
            attempts: 1,
        })
        .unwrap();
        s.transition(DebateState::Complete, 1).unwrap();
        s
    }

    #[test]
    fn test_complete_session_uses_verdict() {
        let session = completed_session();
        let now = Utc::now();
        let brief = compile_at(&session, &verdict(true), now).unwrap();

        assert_eq!(brief.final_recommendation, Recommendation::Endorse);
        assert_eq!(
            brief.recommendation.as_deref(),
            Some("Expand into the mid-market segment")
        );
        assert_eq!(brief.confidence, 0.8);
        assert_eq!(brief.generated_at, now);
        assert_eq!(brief.transcript.len(), 1);
        assert!(brief.rejection_reason.is_none());
        assert!(brief.is_endorsed());
    }

    #[test]
    fn test_rejected_session_is_not_evidence_qualified() {
        let mut session = DebateSession::new("acme", "strategy:1", 3, StrictnessLevel::Strict);
        session
            .reject(Rejection::new(
                RejectionReason::ConstitutionalReject,
                1,
                "unsourced claim",
            ))
            .unwrap();

        let brief = compile(&session, &verdict(true)).unwrap();
        assert_eq!(
            brief.final_recommendation,
            Recommendation::NotEvidenceQualified
        );
        assert_eq!(brief.confidence, 0.0);
        assert_eq!(
            brief.rejection_reason,
            Some(RejectionReason::ConstitutionalReject)
        );
        // Verdict still attached for audit
        assert!(brief.council.quorum_reached);
    }

    #[test]
    fn test_non_terminal_session_is_an_error() {
        let session = DebateSession::new("acme", "strategy:1", 3, StrictnessLevel::Moderate);
        assert!(matches!(
            compile(&session, &verdict(true)),
            Err(DomainError::SessionNotTerminal(_))
        ));
    }

    #[test]
    fn test_compile_at_is_deterministic() {
        let session = completed_session();
        let now = Utc::now();
        let a = compile_at(&session, &verdict(false), now).unwrap();
        let b = compile_at(&session, &verdict(false), now).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.final_recommendation, Recommendation::EscalateToHuman);
    }
}

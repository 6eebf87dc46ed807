//! Expert evaluator port
//!
//! Each council discipline is scored by an external evaluator. Failures and
//! late answers never block the council; they become abstentions.

use crate::ports::agent_invoker::InvokeError;
use async_trait::async_trait;
use council_domain::{DebateSession, ExpertSeat};
use serde::{Deserialize, Serialize};

/// What the council is asked to judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilContext {
    pub context_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_ref: Option<String>,
    /// Recommender output, when the debate produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl CouncilContext {
    /// Standalone vote on an existing context (no debate attached)
    pub fn new(context_ref: impl Into<String>) -> Self {
        Self {
            context_ref: context_ref.into(),
            session_id: None,
            tenant_id: None,
            strategy_ref: None,
            recommendation: None,
        }
    }

    /// Context describing a finished debate
    pub fn from_session(session: &DebateSession) -> Self {
        Self {
            context_ref: format!("{}/transcript", session.id()),
            session_id: Some(session.id().to_string()),
            tenant_id: Some(session.tenant_id().to_string()),
            strategy_ref: Some(session.strategy_ref().to_string()),
            recommendation: session.recommendation().map(str::to_string),
        }
    }
}

/// One discipline's judgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertAssessment {
    pub score: f64,
    #[serde(default)]
    pub veto: bool,
    pub rationale: String,
}

impl ExpertAssessment {
    pub fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score,
            veto: false,
            rationale: rationale.into(),
        }
    }

    pub fn with_veto(mut self) -> Self {
        self.veto = true;
        self
    }
}

/// Capability to score the context from one discipline's perspective
#[async_trait]
pub trait ExpertEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        seat: &ExpertSeat,
        context: &CouncilContext,
    ) -> Result<ExpertAssessment, InvokeError>;
}

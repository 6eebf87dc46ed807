//! Agent invoker port
//!
//! Defines the interface for calling the external agent backing each debate
//! role. The orchestrator owns timeouts and retries; adapters only report
//! what happened on a single attempt.

use async_trait::async_trait;
use council_domain::{AgentRole, GroundingRef, Turn, Violation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while invoking an agent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// Transient; retried with backoff
    #[error("Agent timed out")]
    Timeout,

    /// Response did not match the agent output schema
    #[error("Malformed agent output: {detail}")]
    Malformed { detail: String, payload: String },

    /// Non-transient failure (connection refused, 5xx, ...)
    #[error("Agent invocation failed: {0}")]
    Failed(String),
}

impl InvokeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, InvokeError::Timeout)
    }
}

/// Everything an agent sees when asked for a turn
#[derive(Debug, Clone, Serialize)]
pub struct AgentContext {
    pub session_id: String,
    pub tenant_id: String,
    pub strategy_ref: String,
    pub role: AgentRole,
    pub round: u32,
    /// Reference the resulting turn will carry
    pub context_ref: String,
    /// Accumulated transcript so far
    pub transcript: Vec<Turn>,
    /// Violations raised in the previous round, fed back to the adversary
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Violation>,
    /// Ids of the constitutions active for this role
    pub constitutions: Vec<String>,
}

/// A single agent response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub content: String,
    #[serde(default)]
    pub grounding: Vec<GroundingRef>,
}

impl AgentOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            grounding: Vec::new(),
        }
    }

    pub fn with_grounding(mut self, reference: impl Into<String>) -> Self {
        self.grounding.push(GroundingRef::new(reference));
        self
    }
}

/// Capability to produce one turn for a given role
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(
        &self,
        role: AgentRole,
        context: &AgentContext,
    ) -> Result<AgentOutput, InvokeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeout_is_transient() {
        assert!(InvokeError::Timeout.is_transient());
        assert!(!InvokeError::Failed("503".into()).is_transient());
        assert!(
            !InvokeError::Malformed {
                detail: "missing content".into(),
                payload: "{}".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_output_grounding_defaults_empty() {
        let output: AgentOutput = serde_json::from_str(r#"{"content": "ok"}"#).unwrap();
        assert_eq!(output, AgentOutput::new("ok"));
    }
}

//! Run Debate use case
//!
//! Drives a debate session through the bounded state machine. Each working
//! state produces exactly one turn; gated turns pass through the
//! constitutional gate before they are recorded.

use crate::config::DebateParams;
use crate::ports::agent_invoker::{AgentContext, AgentInvoker, AgentOutput, InvokeError};
use crate::ports::event_logger::{DebateEvent, DebateEventLogger, NoEventLogger};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use council_domain::{
    AgentRole, ConstitutionConfig, ConstitutionalGate, DebateMachine, DebateSession, DebateState,
    DomainError, GateStatus, Rejection, RejectionReason, Step, StrictnessLevel, StrictnessPolicy,
    TurnOutput, TurnRecord, Violation, active_for,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a debate from starting (or indicate a bug)
///
/// Everything that goes wrong *during* a debate is recorded on the session
/// as a [`Rejection`] instead.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("At least one house-rules constitution is required")]
    NoHouseRules,

    #[error("max_rounds must be at least 1")]
    InvalidMaxRounds,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub tenant_id: String,
    pub strategy_ref: String,
    pub constitutions: Vec<Arc<ConstitutionConfig>>,
    pub strictness: StrictnessLevel,
    /// Falls back to [`DebateParams::max_rounds`]
    pub max_rounds: Option<u32>,
}

impl RunDebateInput {
    pub fn new(
        tenant_id: impl Into<String>,
        strategy_ref: impl Into<String>,
        constitutions: Vec<Arc<ConstitutionConfig>>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            strategy_ref: strategy_ref.into(),
            constitutions,
            strictness: StrictnessLevel::default(),
            max_rounds: None,
        }
    }

    pub fn with_strictness(mut self, strictness: StrictnessLevel) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// Why a single turn could not be produced
enum TurnFailure {
    Cancelled,
    Exhausted { attempts: u32 },
    Malformed { detail: String, payload: String },
    Failed(String),
}

/// Use case for running one constitutional debate
pub struct RunDebateUseCase<A: AgentInvoker + 'static> {
    invoker: Arc<A>,
    gate: ConstitutionalGate,
    params: DebateParams,
    event_logger: Arc<dyn DebateEventLogger>,
}

impl<A: AgentInvoker + 'static> RunDebateUseCase<A> {
    pub fn new(invoker: Arc<A>, gate: ConstitutionalGate) -> Self {
        Self {
            invoker,
            gate,
            params: DebateParams::default(),
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn DebateEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    pub fn params(&self) -> &DebateParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateSession, RunDebateError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and a cancellation token.
    ///
    /// Returns the terminal session. Only precondition failures and internal
    /// invariant violations are returned as errors.
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<DebateSession, RunDebateError> {
        let max_rounds = input.max_rounds.unwrap_or(self.params.max_rounds);
        if max_rounds == 0 {
            return Err(RunDebateError::InvalidMaxRounds);
        }
        if !input.constitutions.iter().any(|c| c.is_house()) {
            return Err(RunDebateError::NoHouseRules);
        }

        let policy = StrictnessPolicy::new(input.strictness)
            .with_moderate_reject_at(self.params.moderate_reject_at);
        let machine = DebateMachine::new(max_rounds);
        let mut session = DebateSession::new(
            input.tenant_id.clone(),
            input.strategy_ref.clone(),
            max_rounds,
            input.strictness,
        );
        let session_id = session.id();

        info!(
            session = %session_id,
            "Starting debate on {} ({} strictness, {} rounds max)",
            input.strategy_ref, input.strictness, max_rounds
        );
        let constitution_ids: Vec<&str> =
            input.constitutions.iter().map(|c| c.id.as_str()).collect();
        self.log_event(
            "session_started",
            json!({
                "session_id": session_id,
                "tenant_id": session.tenant_id(),
                "strategy_ref": session.strategy_ref(),
                "strictness": input.strictness,
                "max_rounds": max_rounds,
                "constitutions": constitution_ids,
            }),
        );

        let mut adversary_status = GateStatus::Accept;
        let mut round_violations: Vec<Violation> = Vec::new();
        let mut feedback: Vec<Violation> = Vec::new();

        while !session.is_terminal() {
            let state = session.state();
            let round = session.round();

            let status = match state.role() {
                None => None,
                Some(role) => {
                    let context = Self::build_context(&session, role, &input, &feedback);
                    let (output, attempts) =
                        match self.invoke_with_retry(role, &context, progress, cancel).await {
                            Ok(result) => result,
                            Err(failure) => {
                                let rejection = Self::failure_rejection(failure, role, round);
                                self.terminate(&mut session, rejection, progress)?;
                                break;
                            }
                        };

                    let verdict = role.is_gated().then(|| {
                        let active = active_for(role, &input.constitutions);
                        let turn_output = TurnOutput {
                            role,
                            content: &output.content,
                            grounding: &output.grounding,
                        };
                        self.gate.evaluate(&turn_output, &active, &policy)
                    });
                    let status = verdict.as_ref().map(|v| v.status);
                    if let Some(verdict) = &verdict {
                        round_violations.extend(verdict.violations.iter().cloned());
                    }

                    let turn = session.record_turn(TurnRecord {
                        role,
                        context_ref: context.context_ref,
                        content: output.content,
                        grounding: output.grounding,
                        gate: verdict,
                        attempts,
                    })?;
                    match status {
                        Some(status) => info!(
                            "{} turn recorded (round {}, gate: {})",
                            role.display_name(),
                            round,
                            status
                        ),
                        None => info!("{} turn recorded", role.display_name()),
                    }
                    progress.on_turn_complete(turn);
                    self.log_event(
                        "turn_recorded",
                        json!({ "session_id": session_id, "turn": turn }),
                    );
                    status
                }
            };

            // The review decision covers the whole round
            let status = match state {
                DebateState::AdversaryChallenge => {
                    adversary_status = status.unwrap_or(GateStatus::Accept);
                    status
                }
                DebateState::ConstitutionalReview => status.map(|s| s.worst(adversary_status)),
                _ => status,
            };

            match machine.step(state, round, status)? {
                Step::Advance {
                    state: next,
                    round: next_round,
                } => {
                    match next {
                        DebateState::AdversaryChallenge => {
                            feedback = std::mem::take(&mut round_violations);
                        }
                        DebateState::Recommendation => round_violations.clear(),
                        _ => {}
                    }
                    session.transition(next, next_round)?;
                    debug!("{} -> {} (round {})", state, next, next_round);
                    progress.on_transition(state, next, next_round);
                }
                Step::Reject { reason, round } => {
                    let detail = match reason {
                        RejectionReason::RoundsExhausted => {
                            format!("gate still warning after {} rounds", round)
                        }
                        _ => format!(
                            "{} rejected by the constitutional gate in round {}",
                            state, round
                        ),
                    };
                    let mut rejection = Rejection::new(reason, round, detail)
                        .with_violations(std::mem::take(&mut round_violations));
                    if let Some(role) = state.role() {
                        rejection = rejection.with_role(role);
                    }
                    self.terminate(&mut session, rejection, progress)?;
                }
            }
        }

        if session.state() == DebateState::Complete {
            info!(
                session = %session_id,
                "Debate complete after {} round(s)",
                session.round()
            );
            self.log_event(
                "session_complete",
                json!({ "session_id": session_id, "rounds": session.round() }),
            );
        }
        Ok(session)
    }

    fn build_context(
        session: &DebateSession,
        role: AgentRole,
        input: &RunDebateInput,
        feedback: &[Violation],
    ) -> AgentContext {
        AgentContext {
            session_id: session.id().to_string(),
            tenant_id: session.tenant_id().to_string(),
            strategy_ref: session.strategy_ref().to_string(),
            role,
            round: session.round(),
            context_ref: session.next_context_ref(),
            transcript: session.turns().to_vec(),
            feedback: if role == AgentRole::Adversary {
                feedback.to_vec()
            } else {
                Vec::new()
            },
            constitutions: active_for(role, &input.constitutions)
                .iter()
                .map(|c| c.id.clone())
                .collect(),
        }
    }

    /// Invoke an agent, retrying timeouts with the configured backoff
    async fn invoke_with_retry(
        &self,
        role: AgentRole,
        context: &AgentContext,
        progress: &dyn DebateProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(AgentOutput, u32), TurnFailure> {
        let max_attempts = self.params.max_attempts();
        progress.on_turn_start(role, context.round);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TurnFailure::Cancelled),
                result = tokio::time::timeout(
                    self.params.turn_timeout,
                    self.invoker.invoke(role, context),
                ) => result.unwrap_or(Err(InvokeError::Timeout)),
            };

            match result {
                Ok(output) if output.content.trim().is_empty() => {
                    return Err(TurnFailure::Malformed {
                        detail: "empty content".to_string(),
                        payload: output.content,
                    });
                }
                Ok(output) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", role, attempt);
                    }
                    return Ok((output, attempt));
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let backoff = self
                        .params
                        .retry_backoff
                        .get((attempt - 1) as usize)
                        .copied()
                        .unwrap_or_default();
                    warn!(
                        "{} failed transiently (attempt {}/{}): {}, retrying in {:?}",
                        role, attempt, max_attempts, e, backoff
                    );
                    progress.on_turn_retry(role, attempt, &e);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(TurnFailure::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
                Err(InvokeError::Timeout) => {
                    return Err(TurnFailure::Exhausted { attempts: attempt });
                }
                Err(InvokeError::Malformed { detail, payload }) => {
                    return Err(TurnFailure::Malformed { detail, payload });
                }
                Err(InvokeError::Failed(message)) => return Err(TurnFailure::Failed(message)),
            }
        }
    }

    fn failure_rejection(failure: TurnFailure, role: AgentRole, round: u32) -> Rejection {
        let rejection = match failure {
            TurnFailure::Cancelled => Rejection::new(
                RejectionReason::Cancelled,
                round,
                format!("cancelled during {} turn", role),
            ),
            TurnFailure::Exhausted { attempts } => Rejection::new(
                RejectionReason::AgentUnavailable,
                round,
                format!("{} timed out on all {} attempts", role, attempts),
            ),
            TurnFailure::Malformed { detail, payload } => Rejection::new(
                RejectionReason::MalformedAgentOutput,
                round,
                format!("{} returned malformed output: {}", role, detail),
            )
            .with_payload(payload),
            TurnFailure::Failed(message) => Rejection::new(
                RejectionReason::AgentFailed,
                round,
                format!("{} invocation failed: {}", role, message),
            ),
        };
        rejection.with_role(role)
    }

    fn terminate(
        &self,
        session: &mut DebateSession,
        rejection: Rejection,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), DomainError> {
        let from = session.state();
        warn!(
            session = %session.id(),
            "Debate rejected in {} ({}): {}",
            from, rejection.reason, rejection.detail
        );
        self.log_event(
            "session_rejected",
            json!({ "session_id": session.id(), "rejection": &rejection }),
        );
        let round = rejection.round;
        session.reject(rejection)?;
        progress.on_transition(from, DebateState::Rejected, round);
        Ok(())
    }

    fn log_event(&self, event_type: &'static str, payload: serde_json::Value) {
        self.event_logger.log(DebateEvent::new(event_type, payload));
    }
}

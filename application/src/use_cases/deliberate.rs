//! Deliberate use case
//!
//! The full caller flow: debate, vote collection, aggregation, compilation.

use crate::ports::agent_invoker::AgentInvoker;
use crate::ports::event_logger::{DebateEvent, DebateEventLogger, NoEventLogger};
use crate::ports::expert_evaluator::{CouncilContext, ExpertEvaluator};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::use_cases::collect_votes::CollectVotesUseCase;
use crate::use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
use council_domain::{CouncilConfig, DecisionBrief, DomainError, aggregate, compile};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error(transparent)]
    Debate(#[from] RunDebateError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the Deliberate use case
#[derive(Debug, Clone)]
pub struct DeliberateInput {
    pub debate: RunDebateInput,
    pub council: Arc<CouncilConfig>,
}

impl DeliberateInput {
    pub fn new(debate: RunDebateInput, council: Arc<CouncilConfig>) -> Self {
        Self { debate, council }
    }
}

/// Use case for producing a decision brief from a strategy reference
pub struct DeliberateUseCase<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static> {
    debate: RunDebateUseCase<A>,
    votes: CollectVotesUseCase<E>,
    event_logger: Arc<dyn DebateEventLogger>,
}

impl<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static> DeliberateUseCase<A, E> {
    pub fn new(debate: RunDebateUseCase<A>, votes: CollectVotesUseCase<E>) -> Self {
        Self {
            debate,
            votes,
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn DebateEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(
        &self,
        input: DeliberateInput,
    ) -> Result<DecisionBrief, DeliberationError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and a cancellation token.
    ///
    /// The council votes even when the debate was rejected; its verdict is
    /// attached to the brief for audit.
    pub async fn execute_with_progress(
        &self,
        input: DeliberateInput,
        progress: &dyn DebateProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<DecisionBrief, DeliberationError> {
        let session = self
            .debate
            .execute_with_progress(input.debate, progress, cancel)
            .await?;

        let ballot = self
            .votes
            .execute_with_progress(
                &input.council,
                CouncilContext::from_session(&session),
                progress,
                cancel,
            )
            .await;

        let verdict = aggregate(
            &ballot.votes,
            &ballot.abstentions,
            &input.council.aggregation_rule(),
        )?;
        info!(
            "Council {} {}: consensus {:.2}, weighted score {:.2}",
            input.council.id(),
            ballot.summary(),
            verdict.consensus_level,
            verdict.weighted_score
        );
        progress.on_council_complete(&verdict);
        self.event_logger.log(DebateEvent::new(
            "council_verdict",
            json!({
                "session_id": session.id(),
                "council_id": input.council.id(),
                "votes": &ballot.votes,
                "verdict": &verdict,
            }),
        ));

        let brief = compile(&session, &verdict)?;
        info!(
            session = %session.id(),
            "Decision brief: {} (confidence {:.2})",
            brief.final_recommendation,
            brief.confidence
        );
        Ok(brief)
    }
}

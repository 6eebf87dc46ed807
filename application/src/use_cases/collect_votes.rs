//! Collect Votes use case
//!
//! Fans one evaluation per council seat out on a [`JoinSet`] under a shared
//! deadline. Seats that fail, answer late or are cancelled become
//! abstentions; the ballot is always returned in council order.

use crate::config::CouncilParams;
use crate::ports::agent_invoker::InvokeError;
use crate::ports::expert_evaluator::{CouncilContext, ExpertAssessment, ExpertEvaluator};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use council_domain::{Abstention, Ballot, CouncilConfig, ExpertVote};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for gathering one vote per council discipline
pub struct CollectVotesUseCase<E: ExpertEvaluator + 'static> {
    evaluator: Arc<E>,
    params: CouncilParams,
}

impl<E: ExpertEvaluator + 'static> CollectVotesUseCase<E> {
    pub fn new(evaluator: Arc<E>) -> Self {
        Self {
            evaluator,
            params: CouncilParams::default(),
        }
    }

    pub fn with_params(mut self, params: CouncilParams) -> Self {
        self.params = params;
        self
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, council: &CouncilConfig, context: CouncilContext) -> Ballot {
        self.execute_with_progress(council, context, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and a cancellation token
    pub async fn execute_with_progress(
        &self,
        council: &CouncilConfig,
        context: CouncilContext,
        progress: &dyn DebateProgressNotifier,
        cancel: &CancellationToken,
    ) -> Ballot {
        let seats = council.experts();
        info!(
            "Collecting votes from {} disciplines on council '{}'",
            seats.len(),
            council.id()
        );
        progress.on_council_start(seats.len());

        let deadline = Instant::now() + self.params.deadline;
        let context = Arc::new(context);
        let mut join_set = JoinSet::new();

        for (index, seat) in seats.iter().enumerate() {
            let evaluator = Arc::clone(&self.evaluator);
            let seat = seat.clone();
            let context = Arc::clone(&context);

            join_set.spawn(async move {
                let result = evaluator.evaluate(&seat, &context).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<ExpertAssessment, InvokeError>>> =
            seats.iter().map(|_| None).collect();
        let mut unanswered_reason = "evaluator_failed: task did not complete";

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    unanswered_reason = "cancelled";
                    break;
                }
                next = tokio::time::timeout_at(deadline, join_set.join_next()) => match next {
                    Err(_) => {
                        unanswered_reason = "deadline";
                        break;
                    }
                    Ok(None) => break,
                    Ok(Some(Ok((index, result)))) => {
                        progress.on_vote(&seats[index].id, result.is_ok());
                        results[index] = Some(result);
                    }
                    Ok(Some(Err(e))) => warn!("Task join error: {}", e),
                },
            }
        }
        join_set.abort_all();

        let mut votes = Vec::new();
        let mut abstentions = Vec::new();
        for (seat, result) in seats.iter().zip(results) {
            match result {
                Some(Ok(assessment)) if (0.0..=1.0).contains(&assessment.score) => {
                    let mut vote = ExpertVote::new(
                        seat.id.clone(),
                        seat.weight,
                        assessment.score,
                        assessment.rationale,
                    );
                    if assessment.veto {
                        vote = vote.with_veto();
                    }
                    votes.push(vote);
                }
                Some(Ok(assessment)) => {
                    warn!(
                        "{} returned out-of-range score {}",
                        seat.id, assessment.score
                    );
                    abstentions.push(Abstention::new(
                        seat.id.clone(),
                        seat.weight,
                        format!("invalid_score: {}", assessment.score),
                    ));
                }
                Some(Err(e)) => {
                    warn!("{} evaluation failed: {}", seat.id, e);
                    abstentions.push(Abstention::new(
                        seat.id.clone(),
                        seat.weight,
                        format!("evaluator_failed: {}", e),
                    ));
                }
                None => {
                    warn!("{} abstained: {}", seat.id, unanswered_reason);
                    abstentions.push(Abstention::new(
                        seat.id.clone(),
                        seat.weight,
                        unanswered_reason,
                    ));
                }
            }
        }

        info!(
            "Collected {} vote(s), {} abstention(s)",
            votes.len(),
            abstentions.len()
        );
        Ballot::new(votes, abstentions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{ExpertSeat, aggregate};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Clone)]
    enum Answer {
        Score(f64),
        Veto(f64),
        Fail,
        Late(Duration, f64),
    }

    /// Evaluator that answers from a fixed table keyed by discipline
    struct TableEvaluator {
        answers: HashMap<String, Answer>,
    }

    impl TableEvaluator {
        fn new(answers: &[(&str, Answer)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(d, a)| (d.to_string(), a.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl ExpertEvaluator for TableEvaluator {
        async fn evaluate(
            &self,
            seat: &ExpertSeat,
            _context: &CouncilContext,
        ) -> Result<ExpertAssessment, InvokeError> {
            let rationale = format!("{} view", seat.id);
            match self
                .answers
                .get(&seat.id)
                .cloned()
                .unwrap_or(Answer::Score(0.8))
            {
                Answer::Score(score) => Ok(ExpertAssessment::new(score, rationale)),
                Answer::Veto(score) => Ok(ExpertAssessment::new(score, rationale).with_veto()),
                Answer::Fail => Err(InvokeError::Failed("503".to_string())),
                Answer::Late(delay, score) => {
                    tokio::time::sleep(delay).await;
                    Ok(ExpertAssessment::new(score, rationale))
                }
            }
        }
    }

    fn collector(answers: &[(&str, Answer)]) -> CollectVotesUseCase<TableEvaluator> {
        CollectVotesUseCase::new(Arc::new(TableEvaluator::new(answers))).with_params(
            CouncilParams::default().with_deadline(Duration::from_millis(100)),
        )
    }

    fn disciplines(ballot: &Ballot) -> Vec<&str> {
        ballot.votes.iter().map(|v| v.discipline.as_str()).collect()
    }

    #[tokio::test]
    async fn test_all_disciplines_vote_in_council_order() {
        let council = CouncilConfig::default_council();
        let ballot = collector(&[])
            .execute(&council, CouncilContext::new("ctx:1"))
            .await;

        assert!(ballot.abstentions.is_empty());
        assert_eq!(
            disciplines(&ballot),
            vec![
                "strategic_leadership",
                "org_psych",
                "service_design",
                "comms",
                "brand",
                "economics"
            ]
        );
        assert_eq!(ballot.votes[3].weight, 0.15);
    }

    #[tokio::test]
    async fn test_failures_and_late_answers_abstain() {
        let council = CouncilConfig::default_council();
        let ballot = collector(&[
            ("comms", Answer::Fail),
            ("brand", Answer::Late(Duration::from_secs(5), 0.9)),
            ("economics", Answer::Score(1.7)),
        ])
        .execute(&council, CouncilContext::new("ctx:1"))
        .await;

        assert_eq!(ballot.votes.len(), 3);
        let reasons: Vec<(&str, &str)> = ballot
            .abstentions
            .iter()
            .map(|a| (a.discipline.as_str(), a.reason.as_str()))
            .collect();
        assert_eq!(reasons[0].0, "comms");
        assert!(reasons[0].1.starts_with("evaluator_failed"));
        assert_eq!(reasons[1], ("brand", "deadline"));
        assert_eq!(reasons[2], ("economics", "invalid_score: 1.7"));

        // Abstained weight still satisfies the weight invariant
        let verdict = aggregate(
            &ballot.votes,
            &ballot.abstentions,
            &council.aggregation_rule(),
        )
        .unwrap();
        assert!(verdict.reduced_quorum);
        assert_eq!(verdict.abstentions.len(), 3);
    }

    #[tokio::test]
    async fn test_veto_flag_carried_into_vote() {
        let council = CouncilConfig::default_council();
        let ballot = collector(&[("economics", Answer::Veto(0.9))])
            .execute(&council, CouncilContext::new("ctx:1"))
            .await;

        let economics = ballot
            .votes
            .iter()
            .find(|v| v.discipline == "economics")
            .unwrap();
        assert!(economics.veto);
        assert!(economics.approves());
    }

    #[tokio::test]
    async fn test_cancellation_turns_pending_seats_into_abstentions() {
        let council = CouncilConfig::default_council();
        let slow = Answer::Late(Duration::from_secs(5), 0.9);
        let use_case = collector(&[("org_psych", slow.clone()), ("service_design", slow)])
            .with_params(
                CouncilParams::default().with_deadline(Duration::from_secs(10)),
            );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let ballot = use_case
            .execute_with_progress(
                &council,
                CouncilContext::new("ctx:1"),
                &NoProgress,
                &cancel,
            )
            .await;

        assert_eq!(ballot.votes.len(), 4);
        assert!(ballot.abstentions.iter().all(|a| a.reason == "cancelled"));
        assert_eq!(ballot.abstentions.len(), 2);
    }
}

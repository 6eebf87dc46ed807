//! Debate transition table
//!
//! A pure function from (state, round, gate status) to the next step. The
//! round counter is passed explicitly, which is what keeps the
//! adversary↔critic loop bounded by `max_rounds`.

use super::session::RejectionReason;
use super::state::DebateState;
use crate::constitution::gate::GateStatus;
use crate::core::error::DomainError;

/// What happens after the turn of the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Enter `state` with round counter `round`
    Advance { state: DebateState, round: u32 },
    /// Terminate the session as rejected
    Reject { reason: RejectionReason, round: u32 },
}

/// Transition table bounded by `max_rounds`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebateMachine {
    max_rounds: u32,
}

impl DebateMachine {
    pub fn new(max_rounds: u32) -> Self {
        Self { max_rounds }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Compute the step that follows `state`.
    ///
    /// `status` is the gate status for gated states. At
    /// `ConstitutionalReview` it must be the worse of the round's adversary
    /// and critic verdicts. Ungated states ignore it.
    pub fn step(
        &self,
        state: DebateState,
        round: u32,
        status: Option<GateStatus>,
    ) -> Result<Step, DomainError> {
        let status = status.unwrap_or(GateStatus::Accept);
        let advance = |state: DebateState, round: u32| -> Result<Step, DomainError> {
            Ok(Step::Advance { state, round })
        };

        match state {
            DebateState::Planning => advance(DebateState::Research, round),
            DebateState::Research => advance(DebateState::Synthesis, round),
            DebateState::Synthesis => advance(DebateState::Strategy, round),
            DebateState::Strategy => advance(DebateState::AdversaryChallenge, 1),
            DebateState::AdversaryChallenge => match status {
                GateStatus::Reject => Ok(Step::Reject {
                    reason: RejectionReason::ConstitutionalReject,
                    round,
                }),
                GateStatus::Accept | GateStatus::Warn => {
                    advance(DebateState::ConstitutionalReview, round)
                }
            },
            DebateState::ConstitutionalReview => match status {
                GateStatus::Accept => advance(DebateState::Recommendation, round),
                GateStatus::Warn if round < self.max_rounds => {
                    advance(DebateState::AdversaryChallenge, round + 1)
                }
                GateStatus::Warn => Ok(Step::Reject {
                    reason: RejectionReason::RoundsExhausted,
                    round,
                }),
                GateStatus::Reject => Ok(Step::Reject {
                    reason: RejectionReason::ConstitutionalReject,
                    round,
                }),
            },
            DebateState::Recommendation => match status {
                GateStatus::Reject => Ok(Step::Reject {
                    reason: RejectionReason::ConstitutionalReject,
                    round,
                }),
                GateStatus::Accept | GateStatus::Warn => advance(DebateState::Complete, round),
            },
            DebateState::Complete | DebateState::Rejected => Err(DomainError::IllegalTransition {
                from: state.to_string(),
                to: "any".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(state: DebateState, round: u32) -> Step {
        Step::Advance { state, round }
    }

    #[test]
    fn test_linear_prefix() {
        let m = DebateMachine::new(3);
        assert_eq!(
            m.step(DebateState::Planning, 0, None).unwrap(),
            advance(DebateState::Research, 0)
        );
        assert_eq!(
            m.step(DebateState::Research, 0, None).unwrap(),
            advance(DebateState::Synthesis, 0)
        );
        assert_eq!(
            m.step(DebateState::Synthesis, 0, None).unwrap(),
            advance(DebateState::Strategy, 0)
        );
        assert_eq!(
            m.step(DebateState::Strategy, 0, None).unwrap(),
            advance(DebateState::AdversaryChallenge, 1)
        );
    }

    #[test]
    fn test_adversary_reject_terminates_immediately() {
        let m = DebateMachine::new(3);
        assert_eq!(
            m.step(DebateState::AdversaryChallenge, 1, Some(GateStatus::Reject))
                .unwrap(),
            Step::Reject {
                reason: RejectionReason::ConstitutionalReject,
                round: 1
            }
        );
    }

    #[test]
    fn test_review_accept_goes_to_recommendation() {
        let m = DebateMachine::new(3);
        let review = DebateState::ConstitutionalReview;
        let accept = Some(GateStatus::Accept);
        assert_eq!(
            m.step(review, 2, accept).unwrap(),
            advance(DebateState::Recommendation, 2)
        );
    }

    #[test]
    fn test_review_warn_loops_until_max_rounds() {
        let m = DebateMachine::new(3);
        assert_eq!(
            m.step(DebateState::ConstitutionalReview, 1, Some(GateStatus::Warn))
                .unwrap(),
            advance(DebateState::AdversaryChallenge, 2)
        );
        assert_eq!(
            m.step(DebateState::ConstitutionalReview, 2, Some(GateStatus::Warn))
                .unwrap(),
            advance(DebateState::AdversaryChallenge, 3)
        );
        assert_eq!(
            m.step(DebateState::ConstitutionalReview, 3, Some(GateStatus::Warn))
                .unwrap(),
            Step::Reject {
                reason: RejectionReason::RoundsExhausted,
                round: 3
            }
        );
    }

    #[test]
    fn test_single_round_warn_rejects() {
        let m = DebateMachine::new(1);
        assert!(matches!(
            m.step(DebateState::ConstitutionalReview, 1, Some(GateStatus::Warn)),
            Ok(Step::Reject {
                reason: RejectionReason::RoundsExhausted,
                ..
            })
        ));
    }

    #[test]
    fn test_recommendation_completes_unless_rejected() {
        let m = DebateMachine::new(3);
        assert_eq!(
            m.step(DebateState::Recommendation, 1, Some(GateStatus::Warn))
                .unwrap(),
            advance(DebateState::Complete, 1)
        );
        assert!(matches!(
            m.step(DebateState::Recommendation, 1, Some(GateStatus::Reject)),
            Ok(Step::Reject { .. })
        ));
    }

    #[test]
    fn test_terminal_states_have_no_successor() {
        let m = DebateMachine::new(3);
        assert!(m.step(DebateState::Complete, 1, None).is_err());
        assert!(m.step(DebateState::Rejected, 1, None).is_err());
    }

    #[test]
    fn test_rounds_never_exceed_max() {
        // Drive the loop with a permanently warning gate
        for max_rounds in 1..=5 {
            let m = DebateMachine::new(max_rounds);
            let mut state = DebateState::Strategy;
            let mut round = 0;
            loop {
                match m.step(state, round, Some(GateStatus::Warn)).unwrap() {
                    Step::Advance { state: s, round: r } => {
                        assert!(r <= max_rounds);
                        state = s;
                        round = r;
                    }
                    Step::Reject { round: r, reason } => {
                        assert_eq!(reason, RejectionReason::RoundsExhausted);
                        assert_eq!(r, max_rounds);
                        break;
                    }
                }
            }
        }
    }
}

//! Expert council domain
//!
//! Weighted, multi-disciplinary voting over a finished debate.

pub mod aggregate;
pub mod config;
pub mod vote;

pub use aggregate::{
    AggregationRule, CouncilVerdict, Recommendation, TIE_EPSILON, VetoRule, aggregate,
};
pub use config::{CouncilConfig, DEFAULT_QUORUM, ExpertSeat, WEIGHT_TOLERANCE};
pub use vote::{APPROVAL_THRESHOLD, Abstention, Ballot, ExpertVote};

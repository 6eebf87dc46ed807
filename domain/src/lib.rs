//! Domain layer for constitutional-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! A strategy is produced and challenged by a fixed set of agent roles. The
//! adversary↔critic cycle is a bounded state machine with an explicit round
//! counter.
//!
//! ## Constitution
//!
//! Named principle sets checked against each gated turn. The configured
//! strictness level decides whether findings accept, warn or reject.
//!
//! ## Council
//!
//! Weighted expert disciplines vote on the outcome. Quorum, tie-break and veto
//! override are resolved by a pure aggregation function.

pub mod brief;
pub mod config;
pub mod constitution;
pub mod core;
pub mod council;
pub mod debate;

// Re-export commonly used types
pub use brief::{DecisionBrief, compile, compile_at};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity, has_errors};
pub use constitution::{
    ConstitutionConfig, ConstitutionScope, ConstitutionalGate, Finding, GateStatus, GateVerdict,
    Principle, ReviewMetric, RuleChecker, StrictnessLevel, StrictnessPolicy, TurnOutput, Violation,
    ViolationSeverity, active_for,
};
pub use core::error::DomainError;
pub use council::{
    Abstention, AggregationRule, Ballot, CouncilConfig, CouncilVerdict, ExpertSeat, ExpertVote,
    Recommendation, VetoRule, aggregate,
};
pub use debate::{
    AgentRole, DEFAULT_MAX_ROUNDS, DebateMachine, DebateSession, DebateState, GroundingRef,
    Rejection, RejectionReason, Step, Turn, TurnRecord,
};

//! Application layer for constitutional-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CouncilParams, DebateParams};
pub use ports::{
    agent_invoker::{AgentContext, AgentInvoker, AgentOutput, InvokeError},
    event_logger::{DebateEvent, DebateEventLogger, NoEventLogger},
    expert_evaluator::{CouncilContext, ExpertAssessment, ExpertEvaluator},
    progress::{DebateProgressNotifier, NoProgress},
};
pub use use_cases::collect_votes::CollectVotesUseCase;
pub use use_cases::deliberate::{DeliberateInput, DeliberateUseCase, DeliberationError};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};

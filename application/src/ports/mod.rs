//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_invoker;
pub mod event_logger;
pub mod expert_evaluator;
pub mod progress;

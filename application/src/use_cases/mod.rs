//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collect_votes;
pub mod deliberate;
pub mod run_debate;

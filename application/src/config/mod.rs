//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DebateParams`]: debate loop control (rounds, timeouts, retries)
//! - [`CouncilParams`]: vote collection deadline

pub mod debate_params;

pub use debate_params::{CouncilParams, DebateParams};

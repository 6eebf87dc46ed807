//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use crate::ports::agent_invoker::InvokeError;
use council_domain::{AgentRole, CouncilVerdict, DebateState, Turn};

/// Callback for progress updates during a debate and council vote
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, plain log lines, ...).
/// Every method has a no-op default.
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when an agent is about to be invoked
    fn on_turn_start(&self, _role: AgentRole, _round: u32) {}

    /// Called when an attempt failed and will be retried
    fn on_turn_retry(&self, _role: AgentRole, _attempt: u32, _error: &InvokeError) {}

    /// Called once a turn has been gated and recorded
    fn on_turn_complete(&self, _turn: &Turn) {}

    /// Called on every state change, including the terminal one
    fn on_transition(&self, _from: DebateState, _to: DebateState, _round: u32) {}

    /// Called when council evaluation fans out
    fn on_council_start(&self, _disciplines: usize) {}

    /// Called as each discipline answers (or fails)
    fn on_vote(&self, _discipline: &str, _success: bool) {}

    /// Called after aggregation
    fn on_council_complete(&self, _verdict: &CouncilVerdict) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {}

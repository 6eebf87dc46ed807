//! Debate domain
//!
//! Roles, states, the bounded transition table and the session entity that
//! records an ordered, immutable transcript of turns.

pub mod machine;
pub mod role;
pub mod session;
pub mod state;

pub use machine::{DebateMachine, Step};
pub use role::AgentRole;
pub use session::{
    DEFAULT_MAX_ROUNDS, DebateSession, GroundingRef, Rejection, RejectionReason, Turn, TurnRecord,
};
pub use state::DebateState;

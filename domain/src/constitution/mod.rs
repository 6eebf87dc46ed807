//! Constitutions and the gate that enforces them
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Turn output ──► active_for(role) ──► ConstitutionalGate     │
//! │                                         │                    │
//! │                     RuleChecker (per principle) ◄─┘          │
//! │                                         │                    │
//! │           highest severity ──► StrictnessPolicy ──► verdict  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod gate;
pub mod strictness;

pub use config::{ConstitutionConfig, ConstitutionScope, Principle, ReviewMetric};
pub use gate::{
    ConstitutionalGate, Finding, GateStatus, GateVerdict, RuleChecker, TurnOutput, Violation,
    ViolationSeverity, active_for,
};
pub use strictness::{StrictnessLevel, StrictnessPolicy};

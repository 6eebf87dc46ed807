//! Deterministic rule checking for the constitutional gate

mod pattern_checker;

pub use pattern_checker::{CheckKind, GateConfigError, PatternCheck, PatternRuleChecker};

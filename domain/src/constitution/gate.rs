//! Constitutional gate
//!
//! The gate owns the aggregation and escalation policy only. Whether a
//! particular principle holds for a piece of text is decided by a pluggable
//! [`RuleChecker`].

use super::config::{ConstitutionConfig, ConstitutionScope, Principle};
use super::strictness::StrictnessPolicy;
use crate::debate::role::AgentRole;
use crate::debate::session::GroundingRef;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Severity of a single violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Minor,
    Major,
    /// Reject-severity: dominates every other finding
    Critical,
}

impl ViolationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationSeverity::Minor => "minor",
            ViolationSeverity::Major => "major",
            ViolationSeverity::Critical => "critical",
        }
    }
}

impl std::str::FromStr for ViolationSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(ViolationSeverity::Minor),
            "major" => Ok(ViolationSeverity::Major),
            "critical" | "reject" | "severe" => Ok(ViolationSeverity::Critical),
            _ => Err(format!(
                "Unknown severity: {}. Valid: minor, major, critical",
                s
            )),
        }
    }
}

/// Gate outcome for one turn, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Accept,
    Warn,
    Reject,
}

impl GateStatus {
    /// The worse of two statuses
    pub fn worst(self, other: GateStatus) -> GateStatus {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateStatus::Accept => "accept",
            GateStatus::Warn => "warn",
            GateStatus::Reject => "reject",
        }
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a checker found wrong with a turn under one principle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: ViolationSeverity,
    pub message: String,
}

impl Finding {
    pub fn new(severity: ViolationSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// A principle breached by a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub constitution_id: String,
    pub principle_id: String,
    pub severity: ViolationSeverity,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}/{}: {}",
            self.severity.as_str(),
            self.constitution_id,
            self.principle_id,
            self.message
        )
    }
}

/// The gate's verdict on a single turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub status: GateStatus,
    pub violations: Vec<Violation>,
}

impl GateVerdict {
    pub fn accept() -> Self {
        Self {
            status: GateStatus::Accept,
            violations: Vec::new(),
        }
    }

    pub fn highest_severity(&self) -> Option<ViolationSeverity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

/// The text under review
#[derive(Debug, Clone, Copy)]
pub struct TurnOutput<'a> {
    pub role: AgentRole,
    pub content: &'a str,
    pub grounding: &'a [GroundingRef],
}

/// Evaluates one principle against one turn output.
///
/// Implementations must be deterministic: identical inputs yield identical
/// findings. That is what makes gate verdicts replayable.
pub trait RuleChecker: Send + Sync {
    fn check(
        &self,
        constitution: &ConstitutionConfig,
        principle: &Principle,
        output: &TurnOutput<'_>,
    ) -> Vec<Finding>;
}

/// Select the constitutions that apply to a role's turn.
///
/// House constitutions are always active; adversary and critic
/// constitutions only during their own turns. Order is preserved.
pub fn active_for<'a>(
    role: AgentRole,
    constitutions: &'a [Arc<ConstitutionConfig>],
) -> Vec<&'a ConstitutionConfig> {
    constitutions
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| match c.scope() {
            ConstitutionScope::House => true,
            ConstitutionScope::Adversary => role == AgentRole::Adversary,
            ConstitutionScope::Critic => role == AgentRole::ConstitutionalCritic,
        })
        .collect()
}

/// Stateless gate around a rule checker
#[derive(Clone)]
pub struct ConstitutionalGate {
    checker: Arc<dyn RuleChecker>,
}

impl ConstitutionalGate {
    pub fn new(checker: Arc<dyn RuleChecker>) -> Self {
        Self { checker }
    }

    /// Evaluate a turn output against the active constitutions.
    ///
    /// Violations are reported in constitution order, then principle order.
    pub fn evaluate(
        &self,
        output: &TurnOutput<'_>,
        active: &[&ConstitutionConfig],
        strictness: &StrictnessPolicy,
    ) -> GateVerdict {
        let violations: Vec<Violation> = active
            .iter()
            .flat_map(|constitution| {
                constitution.principles.iter().flat_map(move |principle| {
                    self.checker
                        .check(constitution, principle, output)
                        .into_iter()
                        .map(move |finding| Violation {
                            constitution_id: constitution.id.clone(),
                            principle_id: principle.id.clone(),
                            severity: finding.severity,
                            message: finding.message,
                        })
                })
            })
            .collect();

        let highest = violations.iter().map(|v| v.severity).max();
        GateVerdict {
            status: strictness.escalate(highest),
            violations,
        }
    }
}

impl std::fmt::Debug for ConstitutionalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstitutionalGate").finish_non_exhaustive()
    }
}

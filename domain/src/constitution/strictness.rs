//! Strictness levels and the escalation table
//!
//! | level    | minor  | major  | critical |
//! |----------|--------|--------|----------|
//! | strict   | reject | reject | reject   |
//! | moderate | warn   | warn*  | reject*  |
//! | lenient  | accept | warn   | warn     |
//!
//! `*` moderate rejects at or above its configured `reject_at` severity
//! (critical by default).

use super::gate::{GateStatus, ViolationSeverity};
use serde::{Deserialize, Serialize};

/// How constitutional violations escalate into gate verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictnessLevel {
    /// Any violation rejects
    Strict,
    /// Lower-severity violations warn, severe ones reject
    #[default]
    Moderate,
    /// Only major violations warn; nothing rejects outright
    Lenient,
}

impl StrictnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrictnessLevel::Strict => "strict",
            StrictnessLevel::Moderate => "moderate",
            StrictnessLevel::Lenient => "lenient",
        }
    }
}

impl std::fmt::Display for StrictnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrictnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(StrictnessLevel::Strict),
            "moderate" => Ok(StrictnessLevel::Moderate),
            "lenient" => Ok(StrictnessLevel::Lenient),
            _ => Err(format!(
                "Unknown strictness: {}. Valid: strict, moderate, lenient",
                s
            )),
        }
    }
}

/// A strictness level together with its tunable threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictnessPolicy {
    pub level: StrictnessLevel,
    /// Lowest severity that rejects under `moderate`
    pub moderate_reject_at: ViolationSeverity,
}

impl Default for StrictnessPolicy {
    fn default() -> Self {
        Self::new(StrictnessLevel::default())
    }
}

impl StrictnessPolicy {
    pub fn new(level: StrictnessLevel) -> Self {
        Self {
            level,
            moderate_reject_at: ViolationSeverity::Critical,
        }
    }

    pub fn with_moderate_reject_at(mut self, severity: ViolationSeverity) -> Self {
        self.moderate_reject_at = severity;
        self
    }

    /// Map the highest violation severity of a turn to a gate status.
    ///
    /// `None` means the turn produced no violations.
    pub fn escalate(&self, highest: Option<ViolationSeverity>) -> GateStatus {
        let Some(severity) = highest else {
            return GateStatus::Accept;
        };

        match self.level {
            StrictnessLevel::Strict => GateStatus::Reject,
            StrictnessLevel::Moderate => {
                if severity >= self.moderate_reject_at {
                    GateStatus::Reject
                } else {
                    GateStatus::Warn
                }
            }
            StrictnessLevel::Lenient => {
                if severity >= ViolationSeverity::Major {
                    GateStatus::Warn
                } else {
                    GateStatus::Accept
                }
            }
        }
    }
}

impl From<StrictnessLevel> for StrictnessPolicy {
    fn from(level: StrictnessLevel) -> Self {
        Self::new(level)
    }
}

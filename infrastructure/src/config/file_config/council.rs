//! Council configuration from TOML (`[council]` section)

use council_application::CouncilParams;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Council used when a request does not name one
    pub default: String,
    /// Shared deadline for one round of expert evaluations
    pub deadline_ms: u64,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            default: "default".to_string(),
            deadline_ms: 30_000,
        }
    }
}

impl FileCouncilConfig {
    pub fn to_params(&self) -> CouncilParams {
        CouncilParams::default().with_deadline(Duration::from_millis(self.deadline_ms))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.default.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingDefaultCouncil,
                "council.default cannot be empty",
            ));
        }
        if self.deadline_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "council.deadline_ms cannot be 0",
            ));
        }
        issues
    }
}

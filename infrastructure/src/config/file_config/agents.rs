//! Agent endpoint configuration from TOML (`[agents]` section)

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Base URL serving `/agents/{role}/invoke` and `/experts/{discipline}/evaluate`
    pub base_url: String,
    /// Transport-level timeout for a single HTTP request
    pub request_timeout_ms: u64,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            request_timeout_ms: 60_000,
        }
    }
}

impl FileAgentsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidAgentUrl,
                format!("agents.base_url: '{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.request_timeout_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "agents.request_timeout_ms cannot be 0",
            ));
        }
        issues
    }
}

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod council;
mod debate;
mod gate;
mod logging;
mod output;
mod paths;
mod server;

pub use agents::FileAgentsConfig;
pub use council::FileCouncilConfig;
pub use debate::FileDebateConfig;
pub use gate::{CHECK_KINDS, FileCheckConfig, FileGateConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use paths::FilePathsConfig;
pub use server::FileServerConfig;

use council_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP API settings
    pub server: FileServerConfig,
    /// Debate loop settings
    pub debate: FileDebateConfig,
    /// Expert council settings
    pub council: FileCouncilConfig,
    /// Constitution and council library locations
    pub paths: FilePathsConfig,
    /// External agent endpoints
    pub agents: FileAgentsConfig,
    /// Extra rule checks
    pub gate: FileGateConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.server.parse_listen().1);
        issues.extend(self.debate.validate());
        issues.extend(self.council.validate());
        issues.extend(self.agents.validate());
        issues.extend(self.gate.validate());
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ConfigIssueCode, OutputFormat, StrictnessLevel, ViolationSeverity};
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
listen = "0.0.0.0:9090"

[debate]
max_rounds = 5
strictness = "strict"
moderate_reject_at = "major"
retry_backoff_ms = [100, 200, 400]

[council]
default = "finance"
deadline_ms = 5000

[paths]
constitutions = "/etc/council/constitutions"

[agents]
base_url = "https://agents.internal"

[[gate.checks]]
principle = "transparency"
kind = "forbid"
pattern = "(?i)off the record"
severity = "critical"

[logging]
event_log = "logs/debate.jsonl"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:9090");
        assert_eq!(config.debate.max_rounds, 5);
        assert_eq!(config.debate.strictness, StrictnessLevel::Strict);
        assert_eq!(config.debate.moderate_reject_at, ViolationSeverity::Major);
        assert_eq!(config.debate.retry_backoff_ms.len(), 3);
        assert_eq!(config.council.default, "finance");
        assert_eq!(
            config.paths.constitutions,
            PathBuf::from("/etc/council/constitutions")
        );
        // Unset keys keep their defaults
        assert_eq!(config.paths.councils, PathBuf::from("councils"));
        assert_eq!(config.gate.checks[0].severity, ViolationSeverity::Critical);
        assert_eq!(
            config.logging.event_log,
            Some(PathBuf::from("logs/debate.jsonl"))
        );
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.debate.max_rounds, 3);
        assert_eq!(config.debate.retry_backoff_ms, vec![250, 1000]);
        assert_eq!(config.council.default, "default");
        assert!(config.logging.event_log.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[server]
listen = "not-an-address"

[debate]
turn_timeout_ms = 0

[agents]
base_url = "ftp://agents"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::InvalidListenAddress,
                ConfigIssueCode::ZeroTimeout,
                ConfigIssueCode::InvalidAgentUrl,
            ]
        );
    }
}

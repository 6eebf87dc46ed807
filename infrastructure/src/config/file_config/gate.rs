//! Extra rule checks from TOML (`[[gate.checks]]` entries)

use council_domain::{ConfigIssue, ConfigIssueCode, ViolationSeverity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGateConfig {
    pub checks: Vec<FileCheckConfig>,
}

/// One pattern check bound to a principle id
///
/// ```toml
/// [[gate.checks]]
/// principle = "transparency"
/// kind = "forbid"
/// pattern = "(?i)off the record"
/// severity = "major"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCheckConfig {
    pub principle: String,
    /// `forbid`, `require` or `require_grounding`
    pub kind: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_severity() -> ViolationSeverity {
    ViolationSeverity::Major
}

pub const CHECK_KINDS: [&str; 3] = ["forbid", "require", "require_grounding"];

impl FileGateConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (i, check) in self.checks.iter().enumerate() {
            let field = format!("gate.checks[{}]", i);
            if !CHECK_KINDS.contains(&check.kind.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownCheckKind,
                    format!(
                        "{}: unknown kind '{}' (valid: {})",
                        field,
                        check.kind,
                        CHECK_KINDS.join(", ")
                    ),
                ));
                continue;
            }
            if check.kind == "require_grounding" {
                continue;
            }
            match &check.pattern {
                None => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidCheckPattern,
                    format!("{}: '{}' checks need a pattern", field, check.kind),
                )),
                Some(pattern) => {
                    if let Err(e) = regex::Regex::new(pattern) {
                        issues.push(ConfigIssue::error(
                            ConfigIssueCode::InvalidCheckPattern,
                            format!("{}: invalid pattern: {}", field, e),
                        ));
                    }
                }
            }
        }
        issues
    }
}

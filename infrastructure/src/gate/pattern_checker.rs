//! Regex-backed [`RuleChecker`]
//!
//! Checks are keyed by principle id, so the same check applies to a principle
//! in whichever constitution declares it. Principles without a check pass.

use crate::config::FileGateConfig;
use council_domain::{
    ConstitutionConfig, Finding, Principle, RuleChecker, TurnOutput, ViolationSeverity,
};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GateConfigError {
    #[error("check for '{principle}': unknown kind '{kind}'")]
    UnknownKind { principle: String, kind: String },

    #[error("check for '{principle}': '{kind}' needs a pattern")]
    MissingPattern { principle: String, kind: String },

    #[error("check for '{principle}': {source}")]
    Pattern {
        principle: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub enum CheckKind {
    /// The turn must cite at least `min` grounding references
    RequireGrounding { min: usize },
    /// The pattern must not occur in the content
    Forbid(Regex),
    /// The pattern must occur in the content
    Require(Regex),
}

#[derive(Debug, Clone)]
pub struct PatternCheck {
    pub principle: String,
    pub kind: CheckKind,
    pub severity: ViolationSeverity,
    pub message: Option<String>,
}

impl PatternCheck {
    /// Build a check from its textual description (`forbid`, `require`,
    /// `require_grounding`).
    pub fn parse(
        principle: impl Into<String>,
        kind: &str,
        pattern: Option<&str>,
        severity: ViolationSeverity,
    ) -> Result<Self, GateConfigError> {
        let principle = principle.into();
        let compile = |principle: &String| -> Result<Regex, GateConfigError> {
            let pattern = pattern.ok_or_else(|| GateConfigError::MissingPattern {
                principle: principle.clone(),
                kind: kind.to_string(),
            })?;
            Regex::new(pattern).map_err(|source| GateConfigError::Pattern {
                principle: principle.clone(),
                source,
            })
        };

        let kind = match kind {
            "require_grounding" => CheckKind::RequireGrounding { min: 1 },
            "forbid" => CheckKind::Forbid(compile(&principle)?),
            "require" => CheckKind::Require(compile(&principle)?),
            other => {
                return Err(GateConfigError::UnknownKind {
                    principle,
                    kind: other.to_string(),
                });
            }
        };

        Ok(Self {
            principle,
            kind,
            severity,
            message: None,
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn run(&self, output: &TurnOutput<'_>) -> Option<Finding> {
        let failure = match &self.kind {
            CheckKind::RequireGrounding { min } => (output.grounding.len() < *min).then(|| {
                format!(
                    "{} grounding reference(s) cited, at least {} required",
                    output.grounding.len(),
                    min
                )
            }),
            CheckKind::Forbid(re) => re
                .find(output.content)
                .map(|m| format!("forbidden phrase '{}'", m.as_str())),
            CheckKind::Require(re) => (!re.is_match(output.content))
                .then(|| format!("expected content matching /{}/", re.as_str())),
        }?;

        Some(Finding::new(
            self.severity,
            self.message.clone().unwrap_or(failure),
        ))
    }
}

/// Built-in checks for the standard principle ids: (principle, kind, pattern, severity)
const BUILTIN_CHECKS: &[(&str, &str, Option<&str>, ViolationSeverity)] = &[
    ("sourcing", "require_grounding", None, ViolationSeverity::Major),
    (
        "safety",
        "forbid",
        Some(r"(?i)\b(deceive|mislead|manipulat\w*)\b"),
        ViolationSeverity::Critical,
    ),
    (
        "transparency",
        "forbid",
        Some(r"(?i)\b(hide|conceal|undisclosed)\b"),
        ViolationSeverity::Major,
    ),
    (
        "stress_test",
        "require",
        Some(r"(?i)\b(risks?|assumptions?|failures?|weakness(es)?)\b"),
        ViolationSeverity::Major,
    ),
    (
        "red_team",
        "require",
        Some(r"(?i)(\battack|\bexploit|worst[- ]case|failure mode)"),
        ViolationSeverity::Minor,
    ),
    (
        "factual_accuracy",
        "forbid",
        Some(r"(?i)(\bguaranteed\b|\bcertainly\b|100\s?%|never fails)"),
        ViolationSeverity::Major,
    ),
    (
        "proportionality",
        "forbid",
        Some(r"(?i)(at any cost|whatever it takes)"),
        ViolationSeverity::Minor,
    ),
];

#[derive(Debug, Clone, Default)]
pub struct PatternRuleChecker {
    checks: Vec<PatternCheck>,
}

impl PatternRuleChecker {
    /// A checker with no checks; every principle passes
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in checks for the standard principles
    pub fn builtin() -> Self {
        let mut checker = Self::new();
        for (principle, kind, pattern, severity) in BUILTIN_CHECKS {
            match PatternCheck::parse(*principle, kind, *pattern, *severity) {
                Ok(check) => checker.checks.push(check),
                Err(e) => warn!("Skipping built-in check: {}", e),
            }
        }
        checker
    }

    /// Built-in checks followed by the configured `[[gate.checks]]`
    pub fn from_config(config: &FileGateConfig) -> Result<Self, GateConfigError> {
        let mut checker = Self::builtin();
        for entry in &config.checks {
            let mut check = PatternCheck::parse(
                entry.principle.clone(),
                &entry.kind,
                entry.pattern.as_deref(),
                entry.severity,
            )?;
            if let Some(message) = &entry.message {
                check = check.with_message(message.clone());
            }
            checker = checker.with_check(check);
        }
        debug!("Rule checker ready with {} check(s)", checker.len());
        Ok(checker)
    }

    pub fn with_check(mut self, check: PatternCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl RuleChecker for PatternRuleChecker {
    fn check(
        &self,
        _constitution: &ConstitutionConfig,
        principle: &Principle,
        output: &TurnOutput<'_>,
    ) -> Vec<Finding> {
        self.checks
            .iter()
            .filter(|check| check.principle == principle.id)
            .filter_map(|check| check.run(output))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileCheckConfig;
    use council_domain::{AgentRole, GroundingRef};

    fn constitution() -> ConstitutionConfig {
        ConstitutionConfig::new("house_rules", "House Rules", "1")
    }

    fn run(
        checker: &PatternRuleChecker,
        principle: &str,
        content: &str,
        refs: usize,
    ) -> Vec<Finding> {
        let grounding: Vec<GroundingRef> = (0..refs)
            .map(|i| GroundingRef::new(format!("doc:{i}")))
            .collect();
        let output = TurnOutput {
            role: AgentRole::Adversary,
            content,
            grounding: &grounding,
        };
        checker.check(&constitution(), &Principle::new(principle, "rule"), &output)
    }

    #[test]
    fn test_builtin_covers_standard_principles() {
        let checker = PatternRuleChecker::builtin();
        assert_eq!(checker.len(), BUILTIN_CHECKS.len());
    }

    #[test]
    fn test_require_grounding() {
        let checker = PatternRuleChecker::builtin();
        let findings = run(&checker, "sourcing", "Revenue doubles", 0);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, ViolationSeverity::Major);
        assert!(run(&checker, "sourcing", "Revenue doubles", 2).is_empty());
    }

    #[test]
    fn test_forbid_reports_matched_phrase() {
        let checker = PatternRuleChecker::builtin();
        let findings = run(&checker, "safety", "We could Mislead regulators", 1);
        assert_eq!(findings[0].severity, ViolationSeverity::Critical);
        assert!(findings[0].message.contains("Mislead"));

        let open = "Disclose pricing openly";
        assert!(run(&checker, "safety", open, 1).is_empty());
    }

    #[test]
    fn test_require_pattern() {
        let checker = PatternRuleChecker::builtin();
        assert_eq!(run(&checker, "stress_test", "Looks great", 1).len(), 1);
        let stated = "Key assumption: churn stays flat";
        assert!(run(&checker, "stress_test", stated, 1).is_empty());
    }

    #[test]
    fn test_unknown_principle_passes() {
        let checker = PatternRuleChecker::builtin();
        let content = "anything at any cost";
        assert!(run(&checker, "brand_voice", content, 0).is_empty());
    }

    #[test]
    fn test_configured_checks_appended() {
        let config = FileGateConfig {
            checks: vec![FileCheckConfig {
                principle: "transparency".to_string(),
                kind: "forbid".to_string(),
                pattern: Some("(?i)off the record".to_string()),
                severity: ViolationSeverity::Critical,
                message: Some("no off-record claims".to_string()),
            }],
        };
        let checker = PatternRuleChecker::from_config(&config).unwrap();

        let content = "Told off the record; undisclosed";
        let findings = run(&checker, "transparency", content, 1);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[1].message, "no off-record claims");
        assert_eq!(findings[1].severity, ViolationSeverity::Critical);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            PatternCheck::parse("x", "forbid", Some("(unclosed"), ViolationSeverity::Minor),
            Err(GateConfigError::Pattern { .. })
        ));
        assert!(matches!(
            PatternCheck::parse("x", "require", None, ViolationSeverity::Minor),
            Err(GateConfigError::MissingPattern { .. })
        ));
        assert!(matches!(
            PatternCheck::parse("x", "maybe", None, ViolationSeverity::Minor),
            Err(GateConfigError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_checks_are_deterministic() {
        let checker = PatternRuleChecker::builtin();
        let claim = "Growth is guaranteed, 100% certain";
        let a = run(&checker, "factual_accuracy", claim, 1);
        let b = run(&checker, "factual_accuracy", claim, 1);
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }
}

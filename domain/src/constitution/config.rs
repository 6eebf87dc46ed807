//! Constitution definitions
//!
//! A constitution is a named, versioned set of principles used to gate agent
//! output. The YAML shape is:
//!
//! ```yaml
//! title: House Rules
//! id: house_rules
//! version: 1
//! principles:
//!   - id: sourcing
//!     rule: Every material claim must cite a grounding reference.
//! review:
//!   - metric: citation_coverage
//!     guidance: Fraction of claims with at least one reference.
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// When a constitution is active during a debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstitutionScope {
    /// Always active for every gated turn
    House,
    /// Active only during the adversary's turn
    Adversary,
    /// Active only during the constitutional critic's turn
    Critic,
}

impl ConstitutionScope {
    /// Infer a scope from a constitution id when the file does not declare one.
    pub fn infer_from_id(id: &str) -> Self {
        let id = id.to_lowercase();
        if id.contains("adversary") {
            ConstitutionScope::Adversary
        } else if id.contains("critic") {
            ConstitutionScope::Critic
        } else {
            ConstitutionScope::House
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstitutionScope::House => "house",
            ConstitutionScope::Adversary => "adversary",
            ConstitutionScope::Critic => "critic",
        }
    }
}

/// A single rule inside a constitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principle {
    pub id: String,
    pub rule: String,
}

impl Principle {
    pub fn new(id: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rule: rule.into(),
        }
    }
}

/// A metric reviewers track when applying a constitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMetric {
    pub metric: String,
    pub guidance: String,
}

/// A loaded constitution (read-only for the lifetime of a session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstitutionConfig {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "version_as_string")]
    pub version: String,
    #[serde(default)]
    pub principles: Vec<Principle>,
    #[serde(default)]
    pub review: Vec<ReviewMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<ConstitutionScope>,
}

impl ConstitutionConfig {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: version.into(),
            principles: Vec::new(),
            review: Vec::new(),
            scope: None,
        }
    }

    pub fn with_principle(mut self, id: impl Into<String>, rule: impl Into<String>) -> Self {
        self.principles.push(Principle::new(id, rule));
        self
    }

    pub fn with_review(mut self, metric: impl Into<String>, guidance: impl Into<String>) -> Self {
        self.review.push(ReviewMetric {
            metric: metric.into(),
            guidance: guidance.into(),
        });
        self
    }

    pub fn with_scope(mut self, scope: ConstitutionScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Declared scope, or the scope inferred from the id
    pub fn scope(&self) -> ConstitutionScope {
        self.scope
            .unwrap_or_else(|| ConstitutionScope::infer_from_id(&self.id))
    }

    pub fn is_house(&self) -> bool {
        self.scope() == ConstitutionScope::House
    }

    /// Check structural validity: non-empty ids and unique principle ids
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidConstitution(
                "constitution id must not be empty".to_string(),
            ));
        }
        if self.principles.is_empty() {
            return Err(DomainError::InvalidConstitution(format!(
                "{} declares no principles",
                self.id
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for principle in &self.principles {
            if principle.id.trim().is_empty() {
                return Err(DomainError::InvalidConstitution(format!(
                    "{} has a principle with an empty id",
                    self.id
                )));
            }
            if !seen.insert(principle.id.as_str()) {
                return Err(DomainError::InvalidConstitution(format!(
                    "{} declares principle '{}' twice",
                    self.id, principle.id
                )));
            }
        }
        Ok(())
    }
}

/// YAML authors write `version: 1` as often as `version: "1.0"`.
fn version_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Version::deserialize(deserializer)? {
        Version::Text(s) => s,
        Version::Int(i) => i.to_string(),
        Version::Float(f) => f.to_string(),
    })
}

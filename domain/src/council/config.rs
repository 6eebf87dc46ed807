//! Council configuration
//!
//! A [`CouncilConfig`] can only exist in a valid state: weights sum to one,
//! the tie-breaker sits on the council and every veto discipline is known.
//! Deserialization goes through the same checks.

use super::aggregate::{AggregationRule, VetoRule};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tolerance used for every weight-sum comparison
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Default approving weight needed for quorum
pub const DEFAULT_QUORUM: f64 = 0.72;

/// One discipline's seat on the council
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertSeat {
    pub id: String,
    pub weight: f64,
}

impl ExpertSeat {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// On-disk shape of a council file
#[derive(Debug, Clone, Deserialize)]
struct RawCouncilConfig {
    #[serde(default)]
    id: String,
    experts: Vec<ExpertSeat>,
    #[serde(default = "default_quorum")]
    quorum: f64,
    tie_breaker: String,
    #[serde(default, rename = "veto_threshold")]
    veto: Option<VetoRule>,
}

fn default_quorum() -> f64 {
    DEFAULT_QUORUM
}

/// A validated expert council
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCouncilConfig")]
pub struct CouncilConfig {
    id: String,
    experts: Vec<ExpertSeat>,
    quorum: f64,
    tie_breaker: String,
    #[serde(rename = "veto_threshold", skip_serializing_if = "Option::is_none")]
    veto: Option<VetoRule>,
}

impl TryFrom<RawCouncilConfig> for CouncilConfig {
    type Error = DomainError;

    fn try_from(raw: RawCouncilConfig) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.experts, raw.quorum, raw.tie_breaker, raw.veto)
    }
}

impl CouncilConfig {
    pub fn new(
        id: impl Into<String>,
        experts: Vec<ExpertSeat>,
        quorum: f64,
        tie_breaker: impl Into<String>,
        veto: Option<VetoRule>,
    ) -> Result<Self, DomainError> {
        let config = Self {
            id: id.into(),
            experts,
            quorum,
            tie_breaker: tie_breaker.into(),
            veto,
        };
        config.validate()?;
        Ok(config)
    }

    /// The six-discipline council used when nothing else is configured
    pub fn default_council() -> Self {
        Self {
            id: "default".to_string(),
            experts: vec![
                ExpertSeat::new("strategic_leadership", 0.20),
                ExpertSeat::new("org_psych", 0.15),
                ExpertSeat::new("service_design", 0.15),
                ExpertSeat::new("comms", 0.15),
                ExpertSeat::new("brand", 0.15),
                ExpertSeat::new("economics", 0.20),
            ],
            quorum: DEFAULT_QUORUM,
            tie_breaker: "strategic_leadership".to_string(),
            veto: Some(VetoRule::new(["strategic_leadership", "economics"], 0.35)),
        }
    }

    /// Replace the id (loaders fall back to the file stem)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn experts(&self) -> &[ExpertSeat] {
        &self.experts
    }

    pub fn quorum(&self) -> f64 {
        self.quorum
    }

    pub fn tie_breaker(&self) -> &str {
        &self.tie_breaker
    }

    pub fn veto(&self) -> Option<&VetoRule> {
        self.veto.as_ref()
    }

    pub fn seat(&self, discipline: &str) -> Option<&ExpertSeat> {
        self.experts.iter().find(|s| s.id == discipline)
    }

    /// Aggregation rule derived from this council
    pub fn aggregation_rule(&self) -> AggregationRule {
        AggregationRule {
            quorum_threshold: self.quorum,
            tie_break_discipline: self.tie_breaker.clone(),
            veto: self.veto.clone(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        let invalid = |msg: String| Err(DomainError::InvalidCouncilConfig(msg));

        if self.experts.is_empty() {
            return invalid("council has no experts".to_string());
        }

        let mut seen = HashSet::new();
        for seat in &self.experts {
            if seat.id.trim().is_empty() {
                return invalid("expert id must not be empty".to_string());
            }
            if !seen.insert(seat.id.as_str()) {
                return invalid(format!("duplicate expert '{}'", seat.id));
            }
            if !(0.0..=1.0).contains(&seat.weight) {
                return invalid(format!(
                    "weight of '{}' must be within [0, 1], got {}",
                    seat.id, seat.weight
                ));
            }
        }

        let total: f64 = self.experts.iter().map(|s| s.weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return invalid(format!("expert weights sum to {total}, expected 1.0"));
        }

        if !(self.quorum > 0.0 && self.quorum <= 1.0) {
            return invalid(format!(
                "quorum must be within (0, 1], got {}",
                self.quorum
            ));
        }

        if !seen.contains(self.tie_breaker.as_str()) {
            return invalid(format!(
                "tie-breaker '{}' is not on the council",
                self.tie_breaker
            ));
        }

        if let Some(veto) = &self.veto {
            if veto.disciplines.is_empty() {
                return invalid("veto rule names no disciplines".to_string());
            }
            if let Some(unknown) = veto
                .disciplines
                .iter()
                .find(|d| !seen.contains(d.as_str()))
            {
                return invalid(format!("veto discipline '{unknown}' is not on the council"));
            }
            if !(0.0..=1.0).contains(&veto.threshold) {
                return invalid(format!(
                    "veto threshold must be within [0, 1], got {}",
                    veto.threshold
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(pairs: &[(&str, f64)]) -> Vec<ExpertSeat> {
        pairs.iter().map(|(id, w)| ExpertSeat::new(*id, *w)).collect()
    }

    #[test]
    fn test_default_council_is_valid() {
        let council = CouncilConfig::default_council();
        assert!(council.validate().is_ok());
        assert_eq!(council.experts().len(), 6);
        assert_eq!(council.quorum(), 0.72);
        assert_eq!(council.tie_breaker(), "strategic_leadership");
        assert_eq!(council.seat("economics").map(|s| s.weight), Some(0.2));
        assert!(council.seat("marketing").is_none());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let err = CouncilConfig::new("c", seats(&[("a", 0.5), ("b", 0.4)]), 0.72, "a", None)
            .unwrap_err();
        assert!(err.is_council_config());
        assert!(err.to_string().contains("sum"));
    }

    #[test]
    fn test_weight_sum_tolerance() {
        // 0.1 * 10 is not exactly 1.0 in floating point
        let ten: Vec<ExpertSeat> = (0..10).map(|i| ExpertSeat::new(format!("d{i}"), 0.1)).collect();
        assert!(CouncilConfig::new("c", ten, 0.72, "d0", None).is_ok());
    }

    #[test]
    fn test_unknown_tie_breaker_rejected() {
        let err = CouncilConfig::new("c", seats(&[("a", 0.5), ("b", 0.5)]), 0.72, "z", None)
            .unwrap_err();
        assert!(err.to_string().contains("tie-breaker"));
    }

    #[test]
    fn test_unknown_veto_discipline_rejected() {
        let err = CouncilConfig::new(
            "c",
            seats(&[("a", 0.5), ("b", 0.5)]),
            0.72,
            "a",
            Some(VetoRule::new(["a", "q"], 0.3)),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn test_duplicate_expert_rejected() {
        let err = CouncilConfig::new("c", seats(&[("a", 0.5), ("a", 0.5)]), 0.72, "a", None)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_quorum_out_of_range_rejected() {
        let council = |quorum| CouncilConfig::new("c", seats(&[("a", 1.0)]), quorum, "a", None);
        assert!(council(0.0).is_err());
        assert!(council(1.2).is_err());
    }

    #[test]
    fn test_deserialize_from_yaml_validates() {
        let yaml = r#"
experts:
  - { id: strategic_leadership, weight: 0.5 }
  - { id: economics, weight: 0.5 }
quorum: 0.6
tie_breaker: economics
veto_threshold:
  disciplines: [strategic_leadership, economics]
  threshold: 0.35
"#;
        let council: CouncilConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(council.id(), "");
        assert_eq!(council.quorum(), 0.6);
        assert_eq!(council.veto().unwrap().disciplines.len(), 2);

        let council = council.with_id("finance");
        assert_eq!(council.id(), "finance");
        assert_eq!(council.aggregation_rule().tie_break_discipline, "economics");
    }

    #[test]
    fn test_deserialize_rejects_bad_weights() {
        let yaml = r#"
experts:
  - { id: a, weight: 0.3 }
  - { id: b, weight: 0.3 }
tie_breaker: a
"#;
        let result: Result<CouncilConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}

//! Weighted council aggregation
//!
//! [`aggregate`] is a pure function: the same votes in the same order always
//! produce a bit-identical [`CouncilVerdict`].

use super::config::WEIGHT_TOLERANCE;
use super::vote::{Abstention, ExpertVote};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Window in which a consensus level just below the quorum counts as a tie
pub const TIE_EPSILON: f64 = 1e-6;

/// Veto override: named disciplines that can block quorum together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetoRule {
    pub disciplines: Vec<String>,
    /// Combined disagreeing weight must strictly exceed this
    pub threshold: f64,
}

impl VetoRule {
    pub fn new<I, S>(disciplines: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disciplines: disciplines.into_iter().map(Into::into).collect(),
            threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRule {
    pub quorum_threshold: f64,
    pub tie_break_discipline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veto: Option<VetoRule>,
}

/// Outcome a decision brief carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Endorse,
    EscalateToHuman,
    /// The debate never produced a strategy worth voting on
    NotEvidenceQualified,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Endorse => "endorse",
            Recommendation::EscalateToHuman => "escalate_to_human",
            Recommendation::NotEvidenceQualified => "not_evidence_qualified",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of aggregating one council round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilVerdict {
    pub weighted_score: f64,
    /// Weight of approving votes
    pub consensus_level: f64,
    /// Rationales of disagreeing votes, in vote order
    pub dissenting_views: Vec<String>,
    pub final_recommendation: Recommendation,
    pub confidence: f64,
    pub quorum_reached: bool,
    pub tie_break_applied: bool,
    pub veto_applied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vetoing_disciplines: Vec<String>,
    /// Some seat abstained, so consensus is measured over less than the full weight
    pub reduced_quorum: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abstentions: Vec<Abstention>,
}

/// Aggregate council votes into a verdict.
///
/// Abstentions count toward the weight sum but never toward consensus.
/// Fails with [`DomainError::InvalidCouncilConfig`] when the weights do not
/// describe a whole council, and [`DomainError::InvalidVote`] when a score
/// lies outside `[0, 1]`.
pub fn aggregate(
    votes: &[ExpertVote],
    abstentions: &[Abstention],
    rule: &AggregationRule,
) -> Result<CouncilVerdict, DomainError> {
    validate_input(votes, abstentions, rule)?;

    let weighted_score: f64 = votes.iter().map(|v| v.score * v.weight).sum();
    let consensus_level: f64 = votes
        .iter()
        .filter(|v| v.approves())
        .map(|v| v.weight)
        .sum();
    let mut quorum_reached = consensus_level >= rule.quorum_threshold;

    let mut dissenting_views: Vec<String> = votes
        .iter()
        .filter(|v| !v.approves())
        .map(|v| v.rationale.clone())
        .collect();

    let mut tie_break_applied = false;
    if !quorum_reached && rule.quorum_threshold - consensus_level <= TIE_EPSILON {
        if let Some(breaker) = votes
            .iter()
            .find(|v| v.discipline == rule.tie_break_discipline)
        {
            quorum_reached = breaker.approves();
            tie_break_applied = true;
        }
    }

    let mut veto_applied = false;
    let mut vetoing_disciplines = Vec::new();
    if let Some(veto) = &rule.veto {
        let vetoing: Vec<&ExpertVote> = votes
            .iter()
            .filter(|v| veto.disciplines.contains(&v.discipline))
            .filter(|v| !v.approves() || v.veto)
            .collect();
        let disagreeing_weight: f64 = vetoing.iter().map(|v| v.weight).sum();

        if disagreeing_weight > veto.threshold {
            quorum_reached = false;
            veto_applied = true;
            vetoing_disciplines = vetoing.iter().map(|v| v.discipline.clone()).collect();
            dissenting_views.push(format!(
                "veto override: {}",
                vetoing_disciplines.join(", ")
            ));
        }
    }

    let confidence = (weighted_score * consensus_level).clamp(0.0, 1.0);
    let final_recommendation = if quorum_reached {
        Recommendation::Endorse
    } else {
        Recommendation::EscalateToHuman
    };

    Ok(CouncilVerdict {
        weighted_score,
        consensus_level,
        dissenting_views,
        final_recommendation,
        confidence,
        quorum_reached,
        tie_break_applied,
        veto_applied,
        vetoing_disciplines,
        reduced_quorum: !abstentions.is_empty(),
        abstentions: abstentions.to_vec(),
    })
}

fn validate_input(
    votes: &[ExpertVote],
    abstentions: &[Abstention],
    rule: &AggregationRule,
) -> Result<(), DomainError> {
    let abstained = abstentions.iter().map(|a| (a.discipline.as_str(), a.weight));
    let seats = votes
        .iter()
        .map(|v| (v.discipline.as_str(), v.weight))
        .chain(abstained);

    let mut seen = HashSet::new();
    let mut total = 0.0;
    for (discipline, weight) in seats {
        if !seen.insert(discipline) {
            return Err(DomainError::InvalidCouncilConfig(format!(
                "discipline '{discipline}' appears more than once"
            )));
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(DomainError::InvalidCouncilConfig(format!(
                "weight of '{discipline}' must be within [0, 1], got {weight}"
            )));
        }
        total += weight;
    }

    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(DomainError::InvalidCouncilConfig(format!(
            "vote and abstention weights sum to {total}, expected 1.0"
        )));
    }

    if !seen.contains(rule.tie_break_discipline.as_str()) {
        return Err(DomainError::InvalidCouncilConfig(format!(
            "tie-break discipline '{}' neither voted nor abstained",
            rule.tie_break_discipline
        )));
    }

    if let Some(vote) = votes.iter().find(|v| !(0.0..=1.0).contains(&v.score)) {
        return Err(DomainError::InvalidVote(format!(
            "score of '{}' must be within [0, 1], got {}",
            vote.discipline, vote.score
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::config::CouncilConfig;

    const DEFAULT_WEIGHTS: [(&str, f64); 6] = [
        ("strategic_leadership", 0.20),
        ("org_psych", 0.15),
        ("service_design", 0.15),
        ("comms", 0.15),
        ("brand", 0.15),
        ("economics", 0.20),
    ];

    fn rule(tie_breaker: &str) -> AggregationRule {
        AggregationRule {
            quorum_threshold: 0.72,
            tie_break_discipline: tie_breaker.to_string(),
            veto: None,
        }
    }

    fn vote(discipline: &str, weight: f64, score: f64) -> ExpertVote {
        ExpertVote::new(discipline, weight, score, format!("{discipline} rationale"))
    }

    fn votes(entries: &[(&str, f64, f64)]) -> Vec<ExpertVote> {
        entries.iter().map(|&(d, w, s)| vote(d, w, s)).collect()
    }

    #[test]
    fn test_unanimous_council_reaches_quorum() {
        let entries: Vec<_> = DEFAULT_WEIGHTS.iter().map(|(d, w)| (*d, *w, 0.8)).collect();
        let verdict = aggregate(&votes(&entries), &[], &rule("strategic_leadership")).unwrap();

        assert!((verdict.consensus_level - 1.0).abs() < 1e-9);
        assert!((verdict.weighted_score - 0.8).abs() < 1e-9);
        assert!(verdict.quorum_reached);
        assert!(!verdict.tie_break_applied);
        assert!(verdict.dissenting_views.is_empty());
        assert_eq!(verdict.final_recommendation, Recommendation::Endorse);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_dissent_below_quorum() {
        // Dissenters carry 0.40 of the weight
        let entries = [
            ("strategic_leadership", 0.25, 0.9),
            ("org_psych", 0.10, 0.2),
            ("service_design", 0.15, 0.7),
            ("comms", 0.15, 0.3),
            ("brand", 0.15, 0.4),
            ("economics", 0.20, 0.6),
        ];
        let verdict = aggregate(&votes(&entries), &[], &rule("strategic_leadership")).unwrap();

        assert!((verdict.consensus_level - 0.60).abs() < 1e-9);
        assert!(!verdict.quorum_reached);
        assert!(!verdict.tie_break_applied);
        assert_eq!(
            verdict.dissenting_views,
            vec![
                "org_psych rationale".to_string(),
                "comms rationale".to_string(),
                "brand rationale".to_string(),
            ]
        );
        assert_eq!(
            verdict.final_recommendation,
            Recommendation::EscalateToHuman
        );
    }

    #[test]
    fn test_exact_tie_decided_by_tie_breaker() {
        let approving = [("a", 0.36, 0.9), ("b", 0.36, 0.9), ("c", 0.28, 0.1)];
        let verdict = aggregate(&votes(&approving), &[], &rule("a")).unwrap();
        // 0.36 + 0.36 lands within epsilon of 0.72
        assert!(verdict.quorum_reached);

        let entries = [("a", 0.30, 0.9), ("b", 0.42, 0.9), ("c", 0.28, 0.1)];
        let tie_rule = AggregationRule {
            quorum_threshold: 0.7200001,
            ..rule("c")
        };
        let verdict = aggregate(&votes(&entries), &[], &tie_rule).unwrap();
        assert!(verdict.tie_break_applied);
        assert!(!verdict.quorum_reached);

        let tie_rule = AggregationRule {
            quorum_threshold: 0.7200001,
            ..rule("a")
        };
        let verdict = aggregate(&votes(&entries), &[], &tie_rule).unwrap();
        assert!(verdict.tie_break_applied);
        assert!(verdict.quorum_reached);
    }

    #[test]
    fn test_tie_break_skipped_when_breaker_abstained() {
        let entries = [("b", 0.72, 0.9), ("c", 0.18, 0.1)];
        let abstentions = [Abstention::new("a", 0.10, "deadline")];
        let tie_rule = AggregationRule {
            quorum_threshold: 0.7200001,
            ..rule("a")
        };
        let verdict = aggregate(&votes(&entries), &abstentions, &tie_rule).unwrap();
        assert!(!verdict.tie_break_applied);
        assert!(!verdict.quorum_reached);
        assert!(verdict.reduced_quorum);
        assert_eq!(verdict.abstentions.len(), 1);
    }

    #[test]
    fn test_veto_overrides_quorum() {
        let mut council_rule = CouncilConfig::default_council().aggregation_rule();
        council_rule.quorum_threshold = 0.5;

        let entries = [
            ("strategic_leadership", 0.20, 0.2),
            ("org_psych", 0.15, 0.9),
            ("service_design", 0.15, 0.9),
            ("comms", 0.15, 0.9),
            ("brand", 0.15, 0.9),
            ("economics", 0.20, 0.1),
        ];
        let verdict = aggregate(&votes(&entries), &[], &council_rule).unwrap();

        assert!((verdict.consensus_level - 0.60).abs() < 1e-9);
        assert!(verdict.veto_applied);
        assert!(!verdict.quorum_reached);
        assert_eq!(
            verdict.vetoing_disciplines,
            vec!["strategic_leadership".to_string(), "economics".to_string()]
        );
        assert_eq!(
            verdict.dissenting_views.last().map(String::as_str),
            Some("veto override: strategic_leadership, economics")
        );
    }

    #[test]
    fn test_veto_flag_counts_even_with_high_score() {
        let veto_rule = AggregationRule {
            quorum_threshold: 0.5,
            tie_break_discipline: "a".to_string(),
            veto: Some(VetoRule::new(["a", "b"], 0.35)),
        };
        let mut ballot = votes(&[("a", 0.2, 0.9), ("b", 0.2, 0.9), ("c", 0.6, 0.9)]);
        ballot[0] = ballot[0].clone().with_veto();
        ballot[1] = ballot[1].clone().with_veto();

        let verdict = aggregate(&ballot, &[], &veto_rule).unwrap();
        assert!(verdict.veto_applied);
        assert!(!verdict.quorum_reached);
    }

    #[test]
    fn test_veto_threshold_must_be_strictly_exceeded() {
        let veto_rule = AggregationRule {
            quorum_threshold: 0.5,
            tie_break_discipline: "a".to_string(),
            veto: Some(VetoRule::new(["a", "b"], 0.4)),
        };
        let entries = [("a", 0.2, 0.1), ("b", 0.2, 0.1), ("c", 0.6, 0.9)];
        let verdict = aggregate(&votes(&entries), &[], &veto_rule).unwrap();
        assert!(!verdict.veto_applied);
        assert!(verdict.quorum_reached);
    }

    #[test]
    fn test_weights_must_cover_the_council() {
        let entries = [("a", 0.5, 0.9), ("b", 0.3, 0.9)];
        let err = aggregate(&votes(&entries), &[], &rule("a")).unwrap_err();
        assert!(err.is_council_config());

        // Abstained weight still counts toward the sum
        let abstentions = [Abstention::new("c", 0.2, "deadline")];
        assert!(
            aggregate(&votes(&entries), &abstentions, &rule("a")).is_ok()
        );
    }

    #[test]
    fn test_abstention_weight_does_not_count_toward_consensus() {
        let entries = [("a", 0.6, 0.9), ("b", 0.2, 0.9)];
        let abstentions = [Abstention::new("c", 0.2, "cancelled")];
        let verdict = aggregate(&votes(&entries), &abstentions, &rule("a")).unwrap();
        assert!((verdict.consensus_level - 0.8).abs() < 1e-9);
        assert!(verdict.reduced_quorum);
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let entries = [("a", 0.5, 1.2), ("b", 0.5, 0.9)];
        let err = aggregate(&votes(&entries), &[], &rule("a")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidVote(_)));
    }

    #[test]
    fn test_missing_tie_breaker_rejected() {
        let entries = [("a", 0.5, 0.9), ("b", 0.5, 0.9)];
        assert!(aggregate(&votes(&entries), &[], &rule("z")).is_err());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let entries = [
            ("strategic_leadership", 0.20, 0.61),
            ("org_psych", 0.15, 0.33),
            ("service_design", 0.15, 0.72),
            ("comms", 0.15, 0.49),
            ("brand", 0.15, 0.5),
            ("economics", 0.20, 0.88),
        ];
        let ballot = votes(&entries);
        let council_rule = CouncilConfig::default_council().aggregation_rule();
        let first = aggregate(&ballot, &[], &council_rule).unwrap();
        for _ in 0..10 {
            let again = aggregate(&ballot, &[], &council_rule).unwrap();
            assert_eq!(again, first);
            assert_eq!(
                again.weighted_score.to_bits(),
                first.weighted_score.to_bits()
            );
        }
    }
}

//! Vote types for the expert council
//!
//! Each discipline on a council casts at most one [`ExpertVote`] per
//! invocation. A discipline that produced nothing usable is recorded as an
//! [`Abstention`] instead, so its weight is still accounted for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores at or above this value count as "approve"
pub const APPROVAL_THRESHOLD: f64 = 0.5;

/// A single discipline's vote
///
/// # Example
///
/// ```
/// use council_domain::council::ExpertVote;
///
/// let vote = ExpertVote::new("economics", 0.20, 0.8, "Unit economics hold up.");
/// assert!(vote.approves());
///
/// let veto = ExpertVote::new("brand", 0.15, 0.3, "Off-brand tone.").with_veto();
/// assert!(!veto.approves());
/// assert!(veto.veto);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertVote {
    /// Discipline identifier (e.g., "economics", "org_psych")
    pub discipline: String,
    /// Council weight of this discipline (0.0 to 1.0)
    pub weight: f64,
    /// Score given to the strategy (0.0 to 1.0)
    pub score: f64,
    /// Whether the discipline asked for a veto
    #[serde(default)]
    pub veto: bool,
    pub rationale: String,
    pub timestamp: DateTime<Utc>,
}

impl ExpertVote {
    pub fn new(
        discipline: impl Into<String>,
        weight: f64,
        score: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            discipline: discipline.into(),
            weight,
            score,
            veto: false,
            rationale: rationale.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_veto(mut self) -> Self {
        self.veto = true;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether this vote counts toward consensus
    pub fn approves(&self) -> bool {
        self.score >= APPROVAL_THRESHOLD
    }
}

/// A council seat that did not produce a vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abstention {
    pub discipline: String,
    pub weight: f64,
    /// e.g. "deadline", "cancelled", "evaluator_failed: ..."
    pub reason: String,
}

impl Abstention {
    pub fn new(discipline: impl Into<String>, weight: f64, reason: impl Into<String>) -> Self {
        Self {
            discipline: discipline.into(),
            weight,
            reason: reason.into(),
        }
    }
}

/// Everything collected from one council round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub votes: Vec<ExpertVote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abstentions: Vec<Abstention>,
}

impl Ballot {
    pub fn new(votes: Vec<ExpertVote>, abstentions: Vec<Abstention>) -> Self {
        Self { votes, abstentions }
    }

    /// Generate a visual vote summary (e.g., "[●●○-]")
    ///
    /// `●` approve, `○` disagree, `-` abstained.
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        for vote in &self.votes {
            summary.push(if vote.approves() { '●' } else { '○' });
        }
        for _ in &self.abstentions {
            summary.push('-');
        }
        summary.push(']');
        summary
    }
}

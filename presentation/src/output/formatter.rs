//! Output formatter trait

use council_domain::{Ballot, DecisionBrief, OutputFormat};

/// Trait for rendering deliberation results
pub trait BriefFormatter {
    /// Recommendation, verdict and rejection details
    fn format_brief(&self, brief: &DecisionBrief) -> String;

    /// Transcript followed by the brief
    fn format_full(&self, brief: &DecisionBrief) -> String;

    /// Brief as pretty-printed JSON
    fn format_json(&self, brief: &DecisionBrief) -> String;

    /// Votes and abstentions from a standalone council round
    fn format_ballot(&self, council_id: &str, ballot: &Ballot) -> String;

    fn render(&self, brief: &DecisionBrief, format: OutputFormat) -> String {
        match format {
            OutputFormat::Brief => self.format_brief(brief),
            OutputFormat::Full => self.format_full(brief),
            OutputFormat::Json => self.format_json(brief),
        }
    }
}

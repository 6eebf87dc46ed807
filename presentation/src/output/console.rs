//! Console output formatter for decision briefs

use crate::output::formatter::BriefFormatter;
use colored::Colorize;
use council_domain::{
    Ballot, CouncilVerdict, DebateState, DecisionBrief, GateStatus, Recommendation, Turn,
};

/// Formats decision briefs for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_brief(brief: &DecisionBrief) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Decision Brief"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Strategy:".cyan().bold(),
            brief.strategy_ref
        ));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Tenant:".cyan().bold(),
            brief.tenant_id,
            "Session:".cyan().bold(),
            brief.session_id
        ));
        output.push_str(&format!(
            "{} {} ({} turns)\n",
            "Debate:".cyan().bold(),
            Self::state_label(brief.state),
            brief.transcript.len()
        ));

        if let Some(reason) = brief.rejection_reason {
            output.push_str(&format!(
                "\n{} {}\n",
                "Rejected:".red().bold(),
                reason.as_str()
            ));
            if let Some(detail) = &brief.rejection_detail {
                output.push_str(&Self::indent(detail, "  "));
                output.push('\n');
            }
        }

        if let Some(recommendation) = &brief.recommendation {
            output.push_str(&Self::section_header("Recommendation"));
            output.push_str(recommendation);
            output.push('\n');
        }

        output.push_str(&Self::section_header("Council"));
        output.push_str(&Self::verdict_lines(&brief.council));

        output.push_str(&format!(
            "\n{} {}  {} {:.2}\n",
            "Outcome:".bold(),
            Self::recommendation_label(brief.final_recommendation),
            "confidence".dimmed(),
            brief.confidence
        ));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_full(brief: &DecisionBrief) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Debate Transcript"));
        output.push('\n');
        for turn in &brief.transcript {
            output.push_str(&Self::turn_block(turn));
        }
        output.push('\n');
        output.push_str(&Self::format_brief(brief));
        output
    }

    pub fn format_json(brief: &DecisionBrief) -> String {
        serde_json::to_string_pretty(brief).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_ballot(council_id: &str, ballot: &Ballot) -> String {
        let mut output = format!(
            "{} {} {}\n",
            "Council".cyan().bold(),
            council_id.bold(),
            ballot.summary()
        );
        for vote in &ballot.votes {
            let score = format!("{:.2}", vote.score);
            let score = if vote.approves() {
                score.green()
            } else {
                score.red()
            };
            let veto = if vote.veto {
                " VETO".red().bold().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {:<22} w={:.2} score={}{}  {}\n",
                vote.discipline,
                vote.weight,
                score,
                veto,
                vote.rationale.dimmed()
            ));
        }
        for abstention in &ballot.abstentions {
            output.push_str(&format!(
                "  {:<22} w={:.2} {} ({})\n",
                abstention.discipline,
                abstention.weight,
                "abstained".yellow(),
                abstention.reason
            ));
        }
        output
    }

    fn verdict_lines(verdict: &CouncilVerdict) -> String {
        let mut output = format!(
            "weighted score {:.2}, consensus {:.2}, quorum {}\n",
            verdict.weighted_score,
            verdict.consensus_level,
            if verdict.quorum_reached {
                "reached".green()
            } else {
                "not reached".yellow()
            }
        );

        let mut notes = Vec::new();
        if verdict.tie_break_applied {
            notes.push("tie-break applied".to_string());
        }
        if verdict.veto_applied {
            notes.push(format!(
                "veto by {}",
                verdict.vetoing_disciplines.join(", ")
            ));
        }
        if verdict.reduced_quorum {
            notes.push(format!("{} abstention(s)", verdict.abstentions.len()));
        }
        if !notes.is_empty() {
            output.push_str(&format!("{}\n", notes.join("; ").yellow()));
        }

        if !verdict.dissenting_views.is_empty() {
            output.push_str(&format!("{}\n", "Dissent:".yellow().bold()));
            for view in &verdict.dissenting_views {
                output.push_str(&format!("  * {}\n", view));
            }
        }
        output
    }

    fn turn_block(turn: &Turn) -> String {
        let mut title = format!(
            "── #{} {} (round {}) ──",
            turn.index,
            turn.role.display_name(),
            turn.round
        );
        if turn.attempts > 1 {
            title.push_str(&format!(" [{} attempts]", turn.attempts));
        }
        let mut output = format!("\n{}\n{}\n", title.yellow().bold(), turn.content);

        if !turn.grounding.is_empty() {
            let refs: Vec<&str> = turn.grounding.iter().map(|g| g.as_str()).collect();
            output.push_str(&format!(
                "{} {}\n",
                "grounding:".dimmed(),
                refs.join(", ")
            ));
        }
        if let Some(gate) = &turn.gate {
            let status = match gate.status {
                GateStatus::Accept => gate.status.as_str().green(),
                GateStatus::Warn => gate.status.as_str().yellow(),
                GateStatus::Reject => gate.status.as_str().red(),
            };
            output.push_str(&format!("{} {}\n", "gate:".dimmed(), status));
            for violation in &gate.violations {
                output.push_str(&format!("  - {}\n", violation));
            }
        }
        output
    }

    fn state_label(state: DebateState) -> colored::ColoredString {
        match state {
            DebateState::Complete => state.as_str().green(),
            DebateState::Rejected => state.as_str().red(),
            _ => state.as_str().normal(),
        }
    }

    fn recommendation_label(recommendation: Recommendation) -> colored::ColoredString {
        match recommendation {
            Recommendation::Endorse => recommendation.as_str().green().bold(),
            Recommendation::EscalateToHuman => recommendation.as_str().yellow().bold(),
            Recommendation::NotEvidenceQualified => recommendation.as_str().red().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Turn off ANSI colours for everything this process prints
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl BriefFormatter for ConsoleFormatter {
    fn format_brief(&self, brief: &DecisionBrief) -> String {
        Self::format_brief(brief)
    }

    fn format_full(&self, brief: &DecisionBrief) -> String {
        Self::format_full(brief)
    }

    fn format_json(&self, brief: &DecisionBrief) -> String {
        Self::format_json(brief)
    }

    fn format_ballot(&self, council_id: &str, ballot: &Ballot) -> String {
        Self::format_ballot(council_id, ballot)
    }
}

//! Progress reporting for debates and council votes

use colored::Colorize;
use council_application::{DebateProgressNotifier, InvokeError};
use council_domain::{AgentRole, CouncilVerdict, DebateState, GateStatus, Turn};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per debate turn and a bar for the council
pub struct ProgressReporter {
    multi: MultiProgress,
    turn_spinner: Mutex<Option<ProgressBar>>,
    council_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            turn_spinner: Mutex::new(None),
            council_bar: Mutex::new(None),
        }
    }

    fn council_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn gate_mark(turn: &Turn) -> String {
        match turn.gate.as_ref().map(|g| g.status) {
            None | Some(GateStatus::Accept) => "v".green().to_string(),
            Some(GateStatus::Warn) => "!".yellow().to_string(),
            Some(GateStatus::Reject) => "x".red().to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, role: AgentRole, round: u32) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(role.display_name().to_string());
        pb.set_message(format!("round {}", round));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.turn_spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_turn_retry(&self, _role: AgentRole, attempt: u32, error: &InvokeError) {
        if let Ok(slot) = self.turn_spinner.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!(
                "{} (retry {})",
                error.to_string().yellow(),
                attempt
            ));
        }
    }

    fn on_turn_complete(&self, turn: &Turn) {
        if let Ok(mut slot) = self.turn_spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} round {}", Self::gate_mark(turn), turn.round));
        }
    }

    fn on_transition(&self, _from: DebateState, to: DebateState, _round: u32) {
        if to.is_terminal() {
            // A rejected turn never completes; clear its spinner
            if let Ok(mut slot) = self.turn_spinner.lock()
                && let Some(pb) = slot.take()
            {
                let label = match to {
                    DebateState::Complete => to.as_str().green(),
                    _ => to.as_str().red(),
                };
                pb.finish_with_message(label.to_string());
            }
        }
    }

    fn on_council_start(&self, disciplines: usize) {
        let pb = self.multi.add(ProgressBar::new(disciplines as u64));
        pb.set_style(Self::council_style());
        pb.set_prefix("Council");
        pb.set_message("Collecting votes...");

        if let Ok(mut slot) = self.council_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_vote(&self, discipline: &str, success: bool) {
        if let Ok(slot) = self.council_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), discipline)
            } else {
                format!("{} {}", "x".red(), discipline)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_council_complete(&self, verdict: &CouncilVerdict) {
        if let Ok(mut slot) = self.council_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!(
                "{} (consensus {:.2})",
                verdict.final_recommendation.as_str().green(),
                verdict.consensus_level
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, role: AgentRole, round: u32) {
        println!(
            "{} {} (round {})",
            "->".cyan(),
            role.display_name().bold(),
            round
        );
    }

    fn on_turn_retry(&self, role: AgentRole, attempt: u32, error: &InvokeError) {
        println!("  {} {} retry {}: {}", "!".yellow(), role, attempt, error);
    }

    fn on_turn_complete(&self, turn: &Turn) {
        let violations = turn.gate.as_ref().map_or(0, |g| g.violations.len());
        println!(
            "  {} {} violation(s)",
            ProgressReporter::gate_mark(turn),
            violations
        );
    }

    fn on_transition(&self, from: DebateState, to: DebateState, round: u32) {
        println!(
            "  {} -> {} (round {})",
            from.as_str().dimmed(),
            to.as_str(),
            round
        );
    }

    fn on_council_start(&self, disciplines: usize) {
        println!(
            "{} {} ({} disciplines)",
            "->".cyan(),
            "Council vote".bold(),
            disciplines
        );
    }

    fn on_vote(&self, discipline: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), discipline);
        } else {
            println!("  {} {} (failed)", "x".red(), discipline);
        }
    }

    fn on_council_complete(&self, verdict: &CouncilVerdict) {
        println!("  {}\n", verdict.final_recommendation);
    }
}

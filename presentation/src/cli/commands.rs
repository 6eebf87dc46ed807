//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use council_domain::{OutputFormat, StrictnessLevel};
use std::path::PathBuf;

/// Output format for decision briefs
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputArg {
    /// Recommendation, council verdict and rejection details
    Brief,
    /// Full debate transcript followed by the brief
    Full,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Brief => OutputFormat::Brief,
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for the constitutional council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Constitutional debate and expert-council consensus engine")]
#[command(long_about = r#"
Runs a strategy through a constitutional debate and an expert council vote.

The debate passes through a fixed set of roles:
1. Research, synthesis and strategy drafting
2. Adversary and constitutional critic cycles, gated by the active constitutions
3. A final recommendation, voted on by weighted expert disciplines

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/constitutional-council/config.toml   Global config

Example:
  council run --strategy-ref strategy:42 -c house_rules -c adversary -c critic
  council vote --council default --context-ref brief:42
  council serve --listen 0.0.0.0:8080
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Run one debate and council vote, printing the decision brief
    Run(RunArgs),
    /// Collect council votes on an existing context reference
    Vote(VoteArgs),
    /// Validate configuration, constitutions and councils
    Validate,
    /// Show configuration sources and the merged configuration
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides server.listen)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Reference to the strategy under debate
    #[arg(long, value_name = "REF")]
    pub strategy_ref: String,

    /// Tenant the session belongs to
    #[arg(long, default_value = "default")]
    pub tenant: String,

    /// Constitutions to apply (can be specified multiple times)
    #[arg(
        short = 'c',
        long = "constitution",
        value_name = "ID",
        default_values = ["house_rules", "adversary", "critic"]
    )]
    pub constitutions: Vec<String>,

    /// Strictness level (strict, moderate, lenient)
    #[arg(long, value_name = "LEVEL")]
    pub strictness: Option<StrictnessLevel>,

    /// Maximum adversary/critic rounds
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Council to vote with
    #[arg(long, value_name = "ID")]
    pub council: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Council to vote with
    #[arg(long, value_name = "ID")]
    pub council: Option<String>,

    /// Reference to the material being judged
    #[arg(long, value_name = "REF")]
    pub context_ref: String,

    /// Print votes as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["council", "run", "--strategy-ref", "strategy:1"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(
            args.constitutions,
            vec!["house_rules", "adversary", "critic"]
        );
        assert!(args.strictness.is_none());
        assert_eq!(args.tenant, "default");
    }

    #[test]
    fn test_run_full_flags() {
        let cli = Cli::try_parse_from([
            "council",
            "-vv",
            "run",
            "--strategy-ref",
            "strategy:1",
            "-c",
            "house_rules",
            "--strictness",
            "strict",
            "--max-rounds",
            "2",
            "--council",
            "finance",
            "-o",
            "json",
            "--quiet",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.constitutions, vec!["house_rules"]);
        assert_eq!(args.strictness, Some(StrictnessLevel::Strict));
        assert_eq!(args.max_rounds, Some(2));
        assert_eq!(args.council.as_deref(), Some("finance"));
        assert_eq!(OutputFormat::from(args.output.unwrap()), OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_strictness() {
        assert!(
            Cli::try_parse_from([
                "council",
                "run",
                "--strategy-ref",
                "s",
                "--strictness",
                "harsh"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_vote_requires_context_ref() {
        assert!(Cli::try_parse_from(["council", "vote"]).is_err());
        let cli = Cli::try_parse_from(["council", "vote", "--context-ref", "brief:1", "--json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Vote(VoteArgs { json: true, .. })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["council", "validate", "--no-config", "--config", "x.toml"])
                .unwrap();
        assert!(cli.no_config);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Command::Validate));
    }
}

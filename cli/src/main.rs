//! CLI entrypoint for the constitutional council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    CollectVotesUseCase, CouncilContext, DebateEventLogger, DebateProgressNotifier,
    DeliberateInput, DeliberateUseCase, NoEventLogger, NoProgress, RunDebateInput,
    RunDebateUseCase,
};
use council_domain::{ConstitutionalGate, OutputFormat, Severity, aggregate, has_errors};
use council_infrastructure::{
    ConfigLoader, ConstitutionLibrary, CouncilLibrary, FileConfig, HttpAgentInvoker,
    HttpExpertEvaluator, JsonEndpointClient, JsonlEventLogger, PatternRuleChecker,
};
use council_presentation::http::{self, AppState, Catalog, RequestDefaults};
use council_presentation::{
    BriefFormatter, Cli, Command, ConsoleFormatter, ProgressReporter, RunArgs, ServeArgs,
    VoteArgs,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type Deliberation = DeliberateUseCase<HttpAgentInvoker, HttpExpertEvaluator>;
type VoteCollector = CollectVotesUseCase<HttpExpertEvaluator>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    if !config.output.color {
        ConsoleFormatter::disable_color();
    }

    info!("Starting constitutional council");

    match cli.command {
        Command::Serve(args) => serve(&config, args).await,
        Command::Run(args) => run(&config, args, cli.quiet).await,
        Command::Vote(args) => vote(&config, args, cli.quiet).await,
        Command::Validate => validate(&config),
        Command::ShowConfig => show_config(&config, &cli),
    }
}

/// Console logging filtered by `-v` (or `RUST_LOG` when no `-v` is given),
/// plus a non-blocking file writer when `logging.file` is set.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| {
                    anyhow!("logging.file must name a file: {}", path.display())
                })?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Fail on configuration errors; log warnings
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }
    if has_errors(&issues) {
        let errors: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.clone())
            .collect();
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn load_libraries(config: &FileConfig) -> Result<(ConstitutionLibrary, CouncilLibrary)> {
    let constitutions = ConstitutionLibrary::load_dir(&config.paths.constitutions)
        .context("Failed to load constitutions")?;
    let councils =
        CouncilLibrary::load_dir(&config.paths.councils).context("Failed to load councils")?;
    Ok((constitutions, councils))
}

fn event_logger(config: &FileConfig) -> Arc<dyn DebateEventLogger> {
    match config
        .logging
        .event_log
        .as_ref()
        .and_then(JsonlEventLogger::open)
    {
        Some(logger) => {
            info!("Writing debate events to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoEventLogger),
    }
}

// === Dependency Injection ===
fn build_use_cases(config: &FileConfig) -> Result<(Deliberation, VoteCollector)> {
    let client = JsonEndpointClient::new(
        config.agents.base_url.clone(),
        Duration::from_millis(config.agents.request_timeout_ms),
    )
    .context("Failed to build HTTP client")?;
    let invoker = Arc::new(HttpAgentInvoker::new(client.clone()));
    let evaluator = Arc::new(HttpExpertEvaluator::new(client));

    let checker = PatternRuleChecker::from_config(&config.gate)?;
    let logger = event_logger(config);

    let debate = RunDebateUseCase::new(invoker, ConstitutionalGate::new(Arc::new(checker)))
        .with_params(config.debate.to_params())
        .with_event_logger(Arc::clone(&logger));
    let council_votes =
        CollectVotesUseCase::new(Arc::clone(&evaluator)).with_params(config.council.to_params());
    let deliberate = DeliberateUseCase::new(debate, council_votes).with_event_logger(logger);

    let votes = CollectVotesUseCase::new(evaluator).with_params(config.council.to_params());
    Ok((deliberate, votes))
}

/// Token cancelled on Ctrl-C
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}

async fn serve(config: &FileConfig, args: ServeArgs) -> Result<()> {
    check_config(config)?;
    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", listen))?;

    let (constitutions, councils) = load_libraries(config)?;
    let catalog = Catalog::new(
        constitutions.iter().cloned(),
        councils.iter().cloned(),
    );
    let (deliberate, votes) = build_use_cases(config)?;

    let shutdown = ctrl_c_token();
    let state = AppState::new(deliberate, votes, catalog)
        .with_defaults(RequestDefaults {
            strictness: config.debate.strictness,
            council_id: config.council.default.clone(),
            ..RequestDefaults::default()
        })
        .with_shutdown(shutdown.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    http::serve(listener, http::create_router(state), shutdown).await?;
    info!("Server stopped");
    Ok(())
}

async fn run(config: &FileConfig, args: RunArgs, quiet: bool) -> Result<()> {
    check_config(config)?;
    let (constitutions, councils) = load_libraries(config)?;
    let constitutions = constitutions.resolve(&args.constitutions)?;
    let council_id = args
        .council
        .unwrap_or_else(|| config.council.default.clone());
    let council = councils.resolve(&council_id)?;

    let mut debate = RunDebateInput::new(args.tenant, args.strategy_ref, constitutions)
        .with_strictness(args.strictness.unwrap_or(config.debate.strictness));
    if let Some(max_rounds) = args.max_rounds {
        debate = debate.with_max_rounds(max_rounds);
    }

    let (deliberate, _) = build_use_cases(config)?;
    let cancel = ctrl_c_token();
    let progress: Box<dyn DebateProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let brief = deliberate
        .execute_with_progress(
            DeliberateInput::new(debate, council),
            progress.as_ref(),
            &cancel,
        )
        .await?;

    let format = args
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&brief, format));
    Ok(())
}

async fn vote(config: &FileConfig, args: VoteArgs, quiet: bool) -> Result<()> {
    check_config(config)?;
    let councils = CouncilLibrary::load_dir(&config.paths.councils)?;
    let council_id = args
        .council
        .unwrap_or_else(|| config.council.default.clone());
    let council = councils.resolve(&council_id)?;

    let (_, votes) = build_use_cases(config)?;
    let cancel = ctrl_c_token();
    let progress: Box<dyn DebateProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let ballot = votes
        .execute_with_progress(
            &council,
            CouncilContext::new(args.context_ref),
            progress.as_ref(),
            &cancel,
        )
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ballot.votes)?);
    } else {
        print!("{}", ConsoleFormatter.format_ballot(council.id(), &ballot));
        let verdict = aggregate(
            &ballot.votes,
            &ballot.abstentions,
            &council.aggregation_rule(),
        )?;
        println!(
            "=> {} (consensus {:.2}, weighted score {:.2})",
            verdict.final_recommendation, verdict.consensus_level, verdict.weighted_score
        );
    }
    Ok(())
}

fn validate(config: &FileConfig) -> Result<()> {
    let mut failed = false;

    for issue in config.validate() {
        println!("{}", issue);
        failed |= issue.severity == Severity::Error;
    }

    if let Err(e) = PatternRuleChecker::from_config(&config.gate) {
        println!("error: {}", e);
        failed = true;
    }

    match ConstitutionLibrary::load_dir(&config.paths.constitutions) {
        Ok(library) => {
            println!("{} constitution(s) loaded", library.len());
            if !library.iter().any(|c| c.is_house()) {
                println!(
                    "warning: no house-rules constitution; every debate will be refused"
                );
            }
        }
        Err(e) => {
            println!("error: {}", e);
            failed = true;
        }
    }

    match CouncilLibrary::load_dir(&config.paths.councils) {
        Ok(library) => {
            println!(
                "{} council(s) loaded: {}",
                library.len(),
                library.ids().collect::<Vec<_>>().join(", ")
            );
            if library.get(&config.council.default).is_none() {
                println!(
                    "error: default council '{}' is not defined",
                    config.council.default
                );
                failed = true;
            }
        }
        Err(e) => {
            println!("error: {}", e);
            failed = true;
        }
    }

    if failed {
        bail!("Validation failed");
    }
    println!("Configuration OK");
    Ok(())
}

fn show_config(config: &FileConfig, cli: &Cli) -> Result<()> {
    if cli.no_config {
        println!("Configuration files disabled (--no-config)");
    } else {
        for line in ConfigLoader::config_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
    }
    println!();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

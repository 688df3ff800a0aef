//! Run wiring for the CLI

use anyhow::Result;
use sage_agent::{Orchestrator, RunReport, Toolkit};
use sage_core::{Plan, ResearchMode, SageConfig};
use sage_providers::GroqProvider;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::Cli;
use crate::interactive::choose_goal;
use crate::output::{render_header, render_results};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "sage_agent=info,sage_tools=info,sage_providers=info,sage_cli=info";

/// Opens `path` for appending, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Installs the global subscriber writing to `path` without ANSI colours.
///
/// # Errors
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(path: &Path) -> Result<()> {
    let log_file = open_log_file(path)?;

    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(
            fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()?;
    Ok(())
}

fn prompt_for_goal() -> Result<String> {
    let stdin = io::stdin();
    choose_goal(&mut stdin.lock(), &mut io::stdout().lock())
}

fn print_header(research_mode: &ResearchMode, plan: &Plan) -> Result<()> {
    render_header(research_mode, plan, &mut io::stdout().lock())
}

fn print_results(report: &RunReport) -> Result<()> {
    render_results(report, &mut io::stdout().lock())
}

/// Runs one goal end to end, printing the mode and plan before execution
/// starts and the results once it finishes.
///
/// # Errors
/// Returns an error if configuration, goal selection, the API key, provider
/// availability, mode inference, planning or intent classification fails.
pub async fn handle_run(cli: Cli) -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let (mut config, config_fallback) = SageConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_logging(&config.logging.file)?;

    if let Some(error) = config_fallback {
        tracing::warn!(%error, "Default config file unusable, continuing with defaults");
    }

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Failed to read .env: {err}"),
    }

    let goal = match cli.goal {
        Some(goal) => goal,
        None => prompt_for_goal()?,
    };

    let provider = GroqProvider::from_config(&config.provider, config.groq_api_key()?)?;
    let toolkit = Toolkit::from_config(&config);
    let orchestrator = Orchestrator::new(Arc::new(provider), toolkit, &config);

    let (research_mode, plan) = orchestrator.prepare(&goal).await?;
    print_header(&research_mode, &plan)?;

    let report = orchestrator.execute(research_mode, plan).await?;
    print_results(&report)
}

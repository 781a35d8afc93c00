//! CLI entrypoint for Innovation Casino
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod simulate;

use anyhow::{Context, Result, anyhow, bail};
use casino_domain::ConfigIssue;
use casino_infrastructure::{ConfigLoader, FileConfig};
use clap::Parser;
use commands::{Cli, Command};
use simulate::SimulationOptions;
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting Innovation Casino");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    match cli.command {
        Command::Config => show_config(&file_config, cli.config.as_deref()),
        Command::Simulate {
            participants,
            seed,
            events,
            compact,
        } => {
            report_issues(&file_config.validate())?;
            let engine_config = file_config
                .to_engine_config()
                .context("Invalid catalog configuration")?;

            let seed = seed
                .or(file_config.routing.seed)
                .unwrap_or_else(rand::random);
            let report = simulate::run(
                engine_config,
                SimulationOptions {
                    participants,
                    seed,
                    events,
                },
            )
            .await?;

            info!(
                "Session {} finished: {} participants, {} events broadcast",
                report.results.session_id,
                report.results.summary.total_participants,
                report.events_seen
            );

            let output = if compact {
                serde_json::to_string(&report.results)?
            } else {
                serde_json::to_string_pretty(&report.results)?
            };
            println!("{}", output);
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Could not create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            // stdout carries the results document
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Log warnings; refuse to run on any error-severity issue
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(ToString::to_string)
        .collect();
    if !errors.is_empty() {
        bail!("Configuration is invalid:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&Path>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();
    println!("Effective configuration:");
    println!("{}", toml::to_string_pretty(config)?);

    let issues = config.validate();
    if issues.is_empty() {
        println!("No configuration issues found.");
        return Ok(());
    }

    println!("Issues:");
    for issue in &issues {
        println!("  {}", issue);
    }
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Configuration is invalid");
    }
    Ok(())
}

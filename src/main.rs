//! Church-Harvest main entry point
//!
//! This is the command-line interface for the Church-Harvest contact harvester.

use anyhow::Context;
use church_harvest::config::{load_or_default, validate};
use church_harvest::harvest::harvest;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Church-Harvest: a resumable contact harvester
///
/// Walks every region of the church directory, scrapes the email addresses
/// from each listed organization's page, and writes one CSV per region.
/// Finished regions are checkpointed; rerunning resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "church-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable church directory contact harvester", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only harvest these region ids (repeatable)
    #[arg(short, long = "region", value_name = "ID")]
    regions: Vec<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })?;

    if !cli.regions.is_empty() {
        config.harvest.regions = Some(cli.regions);
        validate(&config).context("Invalid --region argument")?;
    }

    let summary = harvest(config).await.context("Harvest aborted")?;

    tracing::info!(
        "Done: {} regions completed, {} already complete",
        summary.regions_completed,
        summary.regions_skipped
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("church_harvest=info,warn"),
            1 => EnvFilter::new("church_harvest=debug,info"),
            2 => EnvFilter::new("church_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_config::TriageConfig;

mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

/// Overrides the `--quiet`/`--verbose` level, e.g. `TRIAGE_LOG=triage_pipeline=debug`.
const LOG_ENV: &str = "TRIAGE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("triage error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli::Cli { flags, command } = cli::Cli::parse();
    setup_logging(&flags)?;
    ui::init(&flags);

    let config = TriageConfig::load_with_dotenv().context("loading configuration")?;
    let ctx = context::AppContext::new(config);
    commands::dispatch::dispatch(command, &ctx, &flags).await
}

fn setup_logging(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let fallback = match (flags.quiet, flags.verbose) {
        (true, _) => "error",
        (false, true) => "debug",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(flags.verbose)
        .try_init()
        .map_err(|error| anyhow::anyhow!("tracing already initialised: {error}"))
}

//! gcm - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use gcm::commit::{Outcome, TerminalConsole, run_session};
use gcm::git::{GitCli, ensure_repository};
use gcm::llm::{ModelConfig, ProcessRunner, check_runner_installed};
use gcm::logging::init_tracing;

/// Generate a commit message for the staged changes with a local LLM.
#[derive(Parser, Debug)]
#[command(name = "gcm")]
#[command(about = "Generate a commit message for the staged changes with a local LLM")]
#[command(version)]
struct Cli {
    /// Model to run (overrides GCM_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Give up on the model after this many seconds (overrides GCM_TIMEOUT)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<Outcome> {
    // Step 1: Check prerequisites
    ensure_repository(Path::new("."))
        .context("gcm must be run from within a git work tree")?;

    let config = model_config(cli);
    check_runner_installed(&config).context("A local model runner is required")?;

    // Step 2: Propose, then loop on the user's answer
    let runner = ProcessRunner::new(config);
    let git = GitCli::new();
    let mut console = TerminalConsole;

    run_session(&git, &runner, &mut console)
        .await
        .context("Failed to read staged changes")
}

/// Environment config with CLI overrides applied.
fn model_config(cli: &Cli) -> ModelConfig {
    let mut config = ModelConfig::from_env();
    if let Some(ref model) = cli.model {
        config = config.with_model(model.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

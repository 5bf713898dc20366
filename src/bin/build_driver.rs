//! build-driver - CLI entry point.
//!
//! Exits with the code of the last build stage that ran, or 1 when the
//! container could not be set up.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use gcm::build::config::{DEFAULT_DOTNET_VERSION, DEFAULT_ENGINE, DOTNET_VERSION_ENV_VAR};
use gcm::build::{BuildConfig, DockerCli, check_engine_installed, run_pipeline};
use gcm::logging::init_tracing;

/// Restore, build, test, pack and document a .NET project in a containerized SDK.
#[derive(Parser, Debug)]
#[command(name = "build-driver")]
#[command(about = "Restore, build, test, pack and document a .NET project in a containerized SDK")]
#[command(version)]
struct Cli {
    /// SDK image tag
    #[arg(long, env = DOTNET_VERSION_ENV_VAR, default_value = DEFAULT_DOTNET_VERSION)]
    dotnet_version: String,

    /// Container engine executable (docker-compatible CLI)
    #[arg(long, default_value = DEFAULT_ENGINE)]
    engine: String,

    /// Project source directory
    #[arg(long, default_value = ".")]
    source: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> BuildConfig {
        BuildConfig::new(&self.engine, &self.dotnet_version, &self.source)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(code) => ExitCode::from(clamp_exit_code(code)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    let config = cli.config();

    check_engine_installed(&config.engine).context("A container engine is required")?;

    let engine = DockerCli::new(config.engine.clone());
    run_pipeline(&engine, &config)
        .await
        .context("Build pipeline could not run")
}

/// Map a stage exit code onto a process exit code.
///
/// Codes outside `0..=255` become 1.
fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

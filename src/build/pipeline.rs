//! Sequential stage execution inside a provisioned container.

use tracing::{info, warn};

use crate::build::config::BuildConfig;
use crate::build::engine::ContainerEngine;
use crate::build::stages::{STAGES, Stage};
use crate::error::BuildError;

/// Run all build stages and return the exit code of the last one that ran.
///
/// Execution stops at the first stage exiting non-zero. The container is
/// removed whatever the result.
pub async fn run_pipeline<E>(engine: &E, config: &BuildConfig) -> Result<i32, BuildError>
where
    E: ContainerEngine + ?Sized,
{
    run_stages_in_container(engine, config, &STAGES).await
}

pub(crate) async fn run_stages_in_container<E>(
    engine: &E,
    config: &BuildConfig,
    stages: &[Stage],
) -> Result<i32, BuildError>
where
    E: ContainerEngine + ?Sized,
{
    if !config.source.is_dir() {
        return Err(BuildError::MissingSource(
            config.source.display().to_string(),
        ));
    }

    let image = config.image();
    println!("Provisioning {} ...", image);
    let container = engine
        .provision(&image, &config.source, &config.workdir)
        .await?;
    info!(container = %container, image = %image, "Container ready");

    let result = run_stages(engine, &container, &config.workdir, stages).await;

    if let Err(e) = engine.teardown(&container).await {
        warn!("Failed to remove container {}: {}", container, e);
    }

    result
}

async fn run_stages<E>(
    engine: &E,
    container: &str,
    workdir: &str,
    stages: &[Stage],
) -> Result<i32, BuildError>
where
    E: ContainerEngine + ?Sized,
{
    let mut last_code = 0;

    for (idx, stage) in stages.iter().enumerate() {
        println!(
            "  [RUN]  ({}/{}) {}",
            idx + 1,
            stages.len(),
            stage.command_line()
        );

        last_code = engine.exec(container, workdir, &stage.argv()).await?;

        if last_code != 0 {
            eprintln!("  [FAIL] {} exited with code {}", stage.name, last_code);
            break;
        }
        println!("  [DONE] {}", stage.name);
    }

    Ok(last_code)
}

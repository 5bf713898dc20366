//! Container engine operations through the docker-compatible CLI.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::BuildError;

/// Operations the pipeline needs from a container engine.
///
/// This abstraction allows mocking the engine in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Start a container from `image` with a snapshot of `source` at `workdir`.
    /// Returns the container id.
    async fn provision(&self, image: &str, source: &Path, workdir: &str)
        -> Result<String, BuildError>;

    /// Run `args` in the container and return the exit code.
    async fn exec(&self, container: &str, workdir: &str, args: &[String])
        -> Result<i32, BuildError>;

    /// Stop and remove the container.
    async fn teardown(&self, container: &str) -> Result<(), BuildError>;
}

/// Check that the engine executable is on `PATH`.
pub fn check_engine_installed(program: &str) -> Result<(), BuildError> {
    which::which(program)
        .map(|_| ())
        .map_err(|_| BuildError::EngineNotInstalled(program.to_string()))
}

/// [`ContainerEngine`] driving `docker` (or a CLI-compatible engine such as `podman`).
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run an engine command with captured output.
    async fn run_captured(
        &self,
        args: &[&str],
        operation: &str,
    ) -> Result<(ExitStatus, String, String), BuildError> {
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BuildError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Ok((output.status, stdout, stderr))
    }
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn provision(
        &self,
        image: &str,
        source: &Path,
        workdir: &str,
    ) -> Result<String, BuildError> {
        let (status, stdout, stderr) = self
            .run_captured(
                &["run", "-d", "--rm", "-w", workdir, image, "sleep", "infinity"],
                "provision",
            )
            .await?;

        let container = stdout.lines().last().unwrap_or_default().trim().to_string();
        if !status.success() || container.is_empty() {
            return Err(BuildError::ProvisionFailed {
                image: image.to_string(),
                stderr,
            });
        }

        // "<dir>/." copies the directory contents rather than the directory.
        let from = format!("{}/.", source.display());
        let to = format!("{}:{}", container, workdir);
        let (status, _, stderr) = self
            .run_captured(&["cp", from.as_str(), to.as_str()], "copy")
            .await?;
        if !status.success() {
            if let Err(e) = self.teardown(&container).await {
                warn!("Failed to remove container {}: {}", container, e);
            }
            return Err(BuildError::CopyFailed(stderr));
        }

        Ok(container)
    }

    async fn exec(
        &self,
        container: &str,
        workdir: &str,
        args: &[String],
    ) -> Result<i32, BuildError> {
        debug!("Running {} exec {} {}", self.program, container, args.join(" "));

        // Stage output goes straight to the user's terminal.
        let status = Command::new(&self.program)
            .args(["exec", "-w", workdir, container])
            .args(args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| BuildError::SpawnFailed {
                operation: "exec".to_string(),
                source,
            })?;

        Ok(exit_code(status))
    }

    async fn teardown(&self, container: &str) -> Result<(), BuildError> {
        let (status, _, stderr) = self
            .run_captured(&["rm", "-f", container], "teardown")
            .await?;
        if !status.success() {
            warn!("{} rm -f {} failed: {}", self.program, container, stderr);
        }
        Ok(())
    }
}

/// Exit code of a finished process; signals map to 128 + signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

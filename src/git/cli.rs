//! Staged diff and commit through the system `git` binary.
//!
//! Shelling out inherits the user's git config, hooks, and signing setup,
//! which a library-level commit would bypass.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::VcsError;

/// Version-control operations needed by the commit session.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Diff of the staged changes only.
    async fn staged_diff(&self) -> Result<String, VcsError>;

    /// Create a commit from the index with the given message.
    async fn commit(&self, message: &str) -> Result<(), VcsError>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    workdir: Option<PathBuf>,
}

impl GitCli {
    /// Run git in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git in an explicit working directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(ref dir) = self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run a git command and return its stdout or a descriptive error.
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, VcsError> {
        debug!("Running git {}", args.join(" "));

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| VcsError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::NonZeroExit {
                operation: operation.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn staged_diff(&self) -> Result<String, VcsError> {
        self.run_git(&["diff", "--cached"], "diff").await
    }

    async fn commit(&self, message: &str) -> Result<(), VcsError> {
        let stdout = self.run_git(&["commit", "-m", message], "commit").await?;
        debug!("git commit: {}", stdout.trim());
        Ok(())
    }
}

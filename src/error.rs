//! Error types for gcm modules using thiserror.

use thiserror::Error;

/// Errors from version-control operations (staged diff, commit).
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Not a git repository: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Bare repository not supported")]
    BareRepository,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} exited with {}: {stderr}",
        code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        operation: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from the local model runner.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model runner '{0}' not found on PATH")]
    NotInstalled(String),

    #[error("Failed to spawn model runner: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("I/O error talking to model runner: {0}")]
    Io(#[source] std::io::Error),

    #[error("Model runner timed out after {0} seconds")]
    Timeout(u64),

    #[error("Model runner exited with {}: {stderr}",
        code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit { code: Option<i32>, stderr: String },
}

/// A menu answer that matched none of the known choices.
///
/// Never fatal: the session reports it and asks again.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("Invalid choice '{0}'")]
    Invalid(String),
}

/// Errors from the containerized build driver.
///
/// A stage exiting non-zero is not an error here; it is reported as the
/// pipeline's exit code.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Container engine '{0}' not found on PATH")]
    EngineNotInstalled(String),

    #[error("Failed to run container engine for {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to provision container from {image}: {stderr}")]
    ProvisionFailed { image: String, stderr: String },

    #[error("Failed to copy sources into container: {0}")]
    CopyFailed(String),

    #[error("Source directory does not exist: {0}")]
    MissingSource(String),
}

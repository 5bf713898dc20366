//! gcm - generate git commit messages with a local LLM.
//!
//! # Overview
//!
//! The `gcm` binary feeds the staged diff to a locally running model
//! (`ollama run llama3.1:8b` by default), proposes the answer as a commit
//! message and lets the user accept, edit, regenerate, or cancel it.
//!
//! The `build-driver` binary runs restore, build, test, pack and docs
//! generation for a .NET project inside a containerized SDK.

pub mod build;
pub mod commit;
pub mod error;
pub mod git;
pub mod llm;
pub mod logging;

// Re-export commonly used types
pub use build::{BuildConfig, ContainerEngine, DockerCli, run_pipeline};
pub use commit::{Outcome, generate_commit_message, run_session};
pub use error::{BuildError, ChoiceError, ModelError, VcsError};
pub use git::{GitCli, Vcs};
pub use llm::{ModelConfig, ModelRunner, ProcessRunner, query_llm};

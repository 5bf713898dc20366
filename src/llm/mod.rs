//! Local model invocation.

pub mod config;
pub mod query;
pub mod runner;

pub use config::ModelConfig;
pub use query::query_llm;
pub use runner::{ModelRunner, ProcessRunner, check_runner_installed};

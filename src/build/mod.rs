//! Containerized .NET build pipeline.

pub mod config;
pub mod engine;
pub mod pipeline;
pub mod stages;

pub use config::BuildConfig;
pub use engine::{ContainerEngine, DockerCli, check_engine_installed};
pub use pipeline::run_pipeline;
pub use stages::{STAGES, Stage};

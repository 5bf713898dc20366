//! Git operations: repository preflight, staged diff, commit.

pub mod cli;
pub mod repo;

pub use cli::{GitCli, Vcs};
pub use repo::ensure_repository;

//! AI-generated commit messages from the staged diff.

pub mod message;
pub mod prompt;
pub mod session;

pub use message::{clean_message, generate_commit_message, is_breaking};
pub use prompt::build_commit_prompt;
pub use session::{Choice, Console, Outcome, ScriptedConsole, TerminalConsole, run_session};

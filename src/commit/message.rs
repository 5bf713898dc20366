//! Commit message generation and cleanup.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::commit::prompt::build_commit_prompt;
use crate::error::VcsError;
use crate::git::Vcs;
use crate::llm::{ModelRunner, query_llm};

/// Characters models like to wrap a one-line answer in.
pub const WRAPPING_CHARS: &[char] = &['´', '`', '\'', '"', '\n'];

static BREAKING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(\s*breaking\s*\)").expect("valid regex"));

/// Strip quote, backtick and newline wrapping from both ends of `raw`.
pub fn clean_message(raw: &str) -> String {
    raw.trim_matches(WRAPPING_CHARS).to_string()
}

/// Whether the message carries the `(Breaking)` marker the prompt asks for.
pub fn is_breaking(message: &str) -> bool {
    BREAKING_PREFIX.is_match(message.trim_start())
}

/// Generate a candidate commit message for the staged changes.
///
/// Diff failures propagate; model failures yield an empty candidate.
pub async fn generate_commit_message<V, R>(vcs: &V, runner: &R) -> Result<String, VcsError>
where
    V: Vcs + ?Sized,
    R: ModelRunner + ?Sized,
{
    let diff = vcs.staged_diff().await?;
    if diff.trim().is_empty() {
        debug!("Staged diff is empty");
    }

    let prompt = build_commit_prompt(&diff);
    debug!("Commit prompt length: {} chars", prompt.len());

    let raw = query_llm(runner, &prompt, false).await;
    Ok(clean_message(&raw))
}

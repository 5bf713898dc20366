//! Fail-safe model query used by the commit session.

use tracing::warn;

use crate::error::ModelError;

use super::runner::ModelRunner;

/// Printed when the model does not answer within the configured bound.
pub const TIMEOUT_MESSAGE: &str = "Error: LLM query timed out.";

/// Query the model and return its trimmed output.
///
/// Never fails: a timeout or a runner failure is reported on stderr and
/// yields an empty string, which the session presents as an empty proposal.
pub async fn query_llm<R>(runner: &R, prompt: &str, echo: bool) -> String
where
    R: ModelRunner + ?Sized,
{
    match runner.run(prompt, echo).await {
        Ok(output) => output.trim().to_string(),
        Err(ModelError::Timeout(secs)) => {
            warn!("Model query timed out after {}s", secs);
            eprintln!("{}", TIMEOUT_MESSAGE);
            String::new()
        }
        Err(e) => {
            warn!("Model query failed: {}", e);
            eprintln!("Error running LLM: {}", e);
            String::new()
        }
    }
}

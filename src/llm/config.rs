//! Model runner configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default model runner executable.
pub const DEFAULT_RUNNER: &str = "ollama";

/// Default model identifier passed to `<runner> run`.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Default bound on a whole model invocation (24 hours).
pub const DEFAULT_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Environment variable to override the runner executable.
pub const RUNNER_ENV_VAR: &str = "GCM_RUNNER";

/// Environment variable to override the model identifier.
pub const MODEL_ENV_VAR: &str = "GCM_MODEL";

/// Environment variable to override the timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "GCM_TIMEOUT";

/// How to launch the local model and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Executable to spawn, resolved through `PATH`.
    pub program: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNNER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ModelConfig {
    /// Build a config from `GCM_RUNNER`, `GCM_MODEL` and `GCM_TIMEOUT`,
    /// falling back to the defaults for unset or invalid values.
    pub fn from_env() -> Self {
        Self {
            program: env_or(RUNNER_ENV_VAR, DEFAULT_RUNNER),
            model: env_or(MODEL_ENV_VAR, DEFAULT_MODEL),
            timeout: get_timeout(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments passed to the runner executable.
    pub fn args(&self) -> Vec<String> {
        vec!["run".to_string(), self.model.clone()]
    }

    /// Full command line, for display.
    pub fn command_line(&self) -> Vec<String> {
        let mut line = vec![self.program.clone()];
        line.extend(self.args());
        line
    }
}

fn env_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Get the configured timeout duration.
///
/// Logs a warning if the environment variable is set but contains
/// an invalid value (non-numeric, zero, or negative).
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

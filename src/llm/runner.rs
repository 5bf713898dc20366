//! Model runner spawning.

use std::io::{self, Write};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ModelError;

use super::config::ModelConfig;

/// Trait for submitting a prompt to a local model.
///
/// This abstraction allows mocking the model subprocess in tests.
/// Implementations own their timeout and must cancel the in-flight
/// request when it expires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Run the model on `prompt` and return its raw output.
    ///
    /// With `echo` set, output is streamed to stdout as it arrives.
    async fn run(&self, prompt: &str, echo: bool) -> Result<String, ModelError>;
}

/// Check that the configured runner executable is on `PATH`.
pub fn check_runner_installed(config: &ModelConfig) -> Result<(), ModelError> {
    which::which(&config.program)
        .map(|_| ())
        .map_err(|_| ModelError::NotInstalled(config.program.clone()))
}

/// Runner that spawns `<program> run <model>` and talks to it over pipes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    config: ModelConfig,
}

impl ProcessRunner {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

#[async_trait]
impl ModelRunner for ProcessRunner {
    async fn run(&self, prompt: &str, echo: bool) -> Result<String, ModelError> {
        let command_line = self.config.command_line();
        if echo {
            println!("Running LLM: {:?}", command_line);
            println!();
            println!("---");
            println!();
        }
        debug!("Spawning model runner: {}", command_line.join(" "));

        let mut command = Command::new(&self.config.program);
        command.args(self.config.args());
        run_command(command, prompt, echo, self.config.timeout).await
    }
}

/// Spawn `command`, hand it the prompt and wait at most `limit` for it.
///
/// On expiry the child is killed before returning `ModelError::Timeout`.
async fn run_command(
    mut command: Command,
    prompt: &str,
    echo: bool,
    limit: Duration,
) -> Result<String, ModelError> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(ModelError::SpawnFailed)?;

    match timeout(limit, converse(&mut child, prompt, echo)).await {
        Ok(result) => result,
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!("Failed to kill timed out model runner: {}", e);
            }
            Err(ModelError::Timeout(limit.as_secs()))
        }
    }
}

/// Feed the prompt, drain stdout until EOF, then collect the exit status.
///
/// Stdin and stderr are serviced on their own tasks so a runner that
/// writes before it has read all of its input cannot wedge the pipes.
async fn converse(child: &mut Child, prompt: &str, echo: bool) -> Result<String, ModelError> {
    let mut stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let mut stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    let input = prompt.as_bytes().to_vec();
    let writer = tokio::spawn(async move {
        let result = stdin.write_all(&input).await;
        // Dropping stdin closes the pipe, signalling end of input.
        drop(stdin);
        result
    });

    let stderr_reader = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).await.map(|_| buf)
    });

    let mut reader = BufReader::new(stdout);
    let mut output = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(ModelError::Io)?;
        if read == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&line);
        if echo {
            print!("{}", decoded);
            let _ = io::stdout().flush();
        }
        output.push_str(&decoded);
    }

    match writer.await {
        Ok(Ok(())) => {}
        // The runner may exit without reading everything; its status says more.
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Model runner closed stdin early");
        }
        Ok(Err(e)) => return Err(ModelError::Io(e)),
        Err(e) => return Err(ModelError::Io(io::Error::other(e))),
    }

    let status = child.wait().await.map_err(ModelError::Io)?;

    if !status.success() {
        let stderr = match stderr_reader.await {
            Ok(Ok(buf)) => String::from_utf8_lossy(&buf).trim().to_string(),
            _ => String::new(),
        };
        return Err(ModelError::NonZeroExit {
            code: status.code(),
            stderr,
        });
    }

    Ok(output)
}

fn missing_pipe(name: &str) -> ModelError {
    ModelError::Io(io::Error::other(format!("model runner {} was not captured", name)))
}

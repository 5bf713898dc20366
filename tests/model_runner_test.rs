//! Integration tests for the model runner and the fail-safe query.
//!
//! Shell scripts stand in for `ollama`, so these tests exercise the real
//! pipe handling, timeout and kill path of `ProcessRunner`.
#![cfg(unix)]

mod common;

use std::fs;
use std::time::{Duration, Instant};

use common::create_mock_script;
use gcm::llm::{ModelConfig, ModelRunner, ProcessRunner, query_llm};
use gcm::ModelError;

fn runner_for(script: &std::path::Path, timeout: Duration) -> ProcessRunner {
    ProcessRunner::new(ModelConfig {
        program: script.display().to_string(),
        model: "llama3.1:8b".to_string(),
        timeout,
    })
}

#[tokio::test]
async fn test_runner_receives_args_and_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("captured");
    let script = create_mock_script(
        dir.path(),
        "ollama",
        &format!(
            "#!/bin/sh\necho \"$@\" > '{args}'\ncat > '{stdin}'\necho 'Add greeting'\n",
            args = capture.with_extension("args").display(),
            stdin = capture.with_extension("stdin").display(),
        ),
    );

    let runner = runner_for(&script, Duration::from_secs(10));
    let output = runner.run("diff with ünïcode", false).await.unwrap();

    assert_eq!(output, "Add greeting\n");
    assert_eq!(
        fs::read_to_string(capture.with_extension("args")).unwrap(),
        "run llama3.1:8b\n"
    );
    assert_eq!(
        fs::read_to_string(capture.with_extension("stdin")).unwrap(),
        "diff with ünïcode"
    );
}

#[tokio::test]
async fn test_query_concatenates_lines_and_trims() {
    let dir = tempfile::tempdir().unwrap();
    let script = create_mock_script(
        dir.path(),
        "ollama",
        "#!/bin/sh\ncat > /dev/null\nprintf '\\n  first line\\nsecond line  \\n\\n'\n",
    );

    let runner = runner_for(&script, Duration::from_secs(10));
    assert_eq!(
        query_llm(&runner, "prompt", false).await,
        "first line\nsecond line"
    );
}

#[tokio::test]
async fn test_echo_does_not_change_result() {
    let dir = tempfile::tempdir().unwrap();
    let script = create_mock_script(
        dir.path(),
        "ollama",
        "#!/bin/sh\ncat > /dev/null\necho one\necho two\n",
    );

    let runner = runner_for(&script, Duration::from_secs(10));
    assert_eq!(query_llm(&runner, "prompt", true).await, "one\ntwo");
}

#[tokio::test]
async fn test_non_zero_exit_yields_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    let script = create_mock_script(
        dir.path(),
        "ollama",
        "#!/bin/sh\ncat > /dev/null\necho partial\necho 'Error: model \"nope\" not found' >&2\nexit 1\n",
    );

    let runner = runner_for(&script, Duration::from_secs(10));

    match runner.run("prompt", false).await {
        Err(ModelError::NonZeroExit { code, stderr }) => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("not found"));
        }
        other => panic!("Expected NonZeroExit, got {other:?}"),
    }
    assert_eq!(query_llm(&runner, "prompt", false).await, "");
}

#[tokio::test]
async fn test_timeout_kills_runner_and_yields_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");
    let script = create_mock_script(
        dir.path(),
        "ollama",
        &format!(
            "#!/bin/sh\ncat > /dev/null\necho thinking\nsleep 3\ntouch '{}'\n",
            marker.display()
        ),
    );

    let runner = runner_for(&script, Duration::from_millis(300));
    let start = Instant::now();
    let output = query_llm(&runner, "prompt", false).await;
    let elapsed = start.elapsed();

    assert_eq!(output, "");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");

    // The killed script must never reach its final line.
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(!marker.exists(), "runner kept going after the timeout");
}

#[tokio::test]
async fn test_missing_runner_yields_empty_string() {
    let runner = ProcessRunner::new(ModelConfig {
        program: "/nonexistent/ollama".to_string(),
        ..ModelConfig::default()
    });
    assert_eq!(query_llm(&runner, "prompt", false).await, "");
}

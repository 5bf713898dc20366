//! End-to-end commit session tests: real git repository, scripted model,
//! scripted user answers.
#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use common::{TestRepo, create_mock_script};
use gcm::commit::ScriptedConsole;
use gcm::git::GitCli;
use gcm::llm::{ModelConfig, ProcessRunner};
use gcm::{Outcome, run_session};

/// Model script that answers `answer` and counts its invocations in `calls`.
fn counting_model(dir: &Path, answer: &str) -> ProcessRunner {
    let calls = dir.join("calls");
    let script = create_mock_script(
        dir,
        "ollama",
        &format!(
            "#!/bin/sh\ncat > /dev/null\necho x >> '{calls}'\nprintf '%s\\n' '{answer}'\n",
            calls = calls.display(),
        ),
    );
    ProcessRunner::new(ModelConfig {
        program: script.display().to_string(),
        model: "llama3.1:8b".to_string(),
        timeout: Duration::from_secs(10),
    })
}

fn model_calls(dir: &Path) -> usize {
    fs::read_to_string(dir.join("calls"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_accept_commits_generated_message() {
    let repo = TestRepo::new();
    repo.stage("greeting.txt", "hello\n");
    let model_dir = tempfile::tempdir().unwrap();
    let runner = counting_model(model_dir.path(), "`Add greeting file`");
    let mut console = ScriptedConsole::new(["a"]);

    let outcome = run_session(&GitCli::in_dir(repo.path()), &runner, &mut console)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(repo.head_message().trim(), "Add greeting file");
    assert_eq!(repo.commit_count(), 2);
    assert_eq!(model_calls(model_dir.path()), 1);
}

#[tokio::test]
async fn test_regenerate_then_cancel_leaves_repo_untouched() {
    let repo = TestRepo::new();
    repo.stage("greeting.txt", "hello\n");
    let model_dir = tempfile::tempdir().unwrap();
    let runner = counting_model(model_dir.path(), "Add greeting file");
    let mut console = ScriptedConsole::new(["r", "c"]);

    let outcome = run_session(&GitCli::in_dir(repo.path()), &runner, &mut console)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(model_calls(model_dir.path()), 2);
    assert_eq!(repo.commit_count(), 1);
}

#[tokio::test]
async fn test_empty_diff_still_queries_model() {
    let repo = TestRepo::new();
    let model_dir = tempfile::tempdir().unwrap();
    let runner = counting_model(model_dir.path(), "No changes");
    let mut console = ScriptedConsole::new(["c"]);

    let outcome = run_session(&GitCli::in_dir(repo.path()), &runner, &mut console)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(model_calls(model_dir.path()), 1);
    assert!(console.shown.contains(&"No changes".to_string()));
}

#[tokio::test]
async fn test_edited_message_is_committed() {
    let repo = TestRepo::new();
    repo.stage("greeting.txt", "hello\n");
    let model_dir = tempfile::tempdir().unwrap();
    let runner = counting_model(model_dir.path(), "Generated");
    let mut console = ScriptedConsole::new(["e", "", "e", "Write greeting to disk"]);

    let outcome = run_session(&GitCli::in_dir(repo.path()), &runner, &mut console)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(repo.head_message().trim(), "Write greeting to disk");
}

#[tokio::test]
async fn test_commit_failure_exits_one() {
    // Nothing staged, so `git commit` refuses.
    let repo = TestRepo::new();
    let model_dir = tempfile::tempdir().unwrap();
    let runner = counting_model(model_dir.path(), "Phantom change");
    let mut console = ScriptedConsole::new(["a"]);

    let outcome = run_session(&GitCli::in_dir(repo.path()), &runner, &mut console)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::CommitFailed);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(repo.commit_count(), 1);
}

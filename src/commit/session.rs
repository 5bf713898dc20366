//! Interactive accept / edit / regenerate / cancel loop.
//!
//! The session proposes a candidate, then waits for one of four answers:
//!
//! ```text
//! Proposing ──a──▶ Accepting   ──▶ commit, exit 0 (or 1 on failure)
//!     │ ───e──▶ Editing     ──▶ commit the replacement; empty → Proposing
//!     │ ───r──▶ Regenerating ──▶ Proposing with a fresh candidate
//!     │ ───c──▶ Cancelling  ──▶ exit 1
//!     └── other ──▶ Proposing (same candidate)
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::str::FromStr;

use dialoguer::Input;
use tracing::{debug, warn};

use crate::commit::message::{generate_commit_message, is_breaking};
use crate::error::{ChoiceError, VcsError};
use crate::git::Vcs;
use crate::llm::ModelRunner;

pub const MENU_PROMPT: &str = "Do you want to (a)ccept, (e)dit, (r)egenerate, or (c)ancel?";
pub const EDIT_PROMPT: &str = "Enter your commit message";

/// A menu answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Edit,
    Regenerate,
    Cancel,
}

impl FromStr for Choice {
    type Err = ChoiceError;

    /// Parse a trimmed, case-insensitive single-letter answer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Choice::Accept),
            "e" => Ok(Choice::Edit),
            "r" => Ok(Choice::Regenerate),
            "c" => Ok(Choice::Cancel),
            other => Err(ChoiceError::Invalid(other.to_string())),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    CommitFailed,
    Cancelled,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Committed => 0,
            Outcome::CommitFailed | Outcome::Cancelled => 1,
        }
    }
}

/// Where the session writes its messages and reads answers from.
pub trait Console {
    fn show(&mut self, text: &str);

    /// Ask for a line of input. Errors (including end of input) cancel the session.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Console on the process's stdout/stdin.
///
/// Uses dialoguer when stdin is a terminal and plain line reads otherwise,
/// so answers can be piped in.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            return Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(io::Error::other);
        }

        print!("{} ", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line)
    }
}

/// Console fed from a fixed list of answers, recording everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub shown: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))
    }
}

/// Run the session to completion.
///
/// Only a failing staged diff is returned as an error; every other failure
/// is reported on the console and folded into the [`Outcome`].
pub async fn run_session<V, R, C>(vcs: &V, runner: &R, console: &mut C) -> Result<Outcome, VcsError>
where
    V: Vcs + ?Sized,
    R: ModelRunner + ?Sized,
    C: Console + ?Sized,
{
    console.show("Generating...");
    let mut candidate = generate_commit_message(vcs, runner).await?;

    loop {
        console.show("");
        console.show("Proposed commit message:");
        console.show(&candidate);
        if is_breaking(&candidate) {
            console.show("(flagged as a breaking change)");
        }

        let answer = match console.ask(MENU_PROMPT) {
            Ok(answer) => answer,
            Err(e) => return Ok(cancel_on_input_error(console, e)),
        };

        match answer.parse::<Choice>() {
            Ok(Choice::Accept) => {
                if candidate.trim().is_empty() {
                    console.show("The proposed message is empty. Edit or regenerate it first.");
                    continue;
                }
                return Ok(commit(
                    vcs,
                    console,
                    &candidate,
                    "Changes committed successfully!",
                    "Commit failed. Please check your changes and try again.",
                )
                .await);
            }
            Ok(Choice::Edit) => {
                let edited = match console.ask(EDIT_PROMPT) {
                    Ok(line) => line.trim().to_string(),
                    Err(e) => return Ok(cancel_on_input_error(console, e)),
                };
                if edited.is_empty() {
                    console.show("Empty message, keeping the proposed one.");
                    continue;
                }
                return Ok(commit(
                    vcs,
                    console,
                    &edited,
                    "Changes committed successfully with your message!",
                    "Commit failed. Please check your message and try again.",
                )
                .await);
            }
            Ok(Choice::Regenerate) => {
                console.show("Regenerating commit message...");
                candidate = generate_commit_message(vcs, runner).await?;
            }
            Ok(Choice::Cancel) => {
                console.show("Commit cancelled.");
                return Ok(Outcome::Cancelled);
            }
            Err(e) => {
                debug!("{}", e);
                console.show("Invalid choice. Please try again.");
            }
        }
    }
}

async fn commit<V, C>(vcs: &V, console: &mut C, message: &str, ok: &str, failed: &str) -> Outcome
where
    V: Vcs + ?Sized,
    C: Console + ?Sized,
{
    match vcs.commit(message).await {
        Ok(()) => {
            console.show(ok);
            Outcome::Committed
        }
        Err(e) => {
            warn!("{}", e);
            console.show(failed);
            Outcome::CommitFailed
        }
    }
}

fn cancel_on_input_error<C: Console + ?Sized>(console: &mut C, e: io::Error) -> Outcome {
    debug!("Input ended: {}", e);
    console.show("Commit cancelled.");
    Outcome::Cancelled
}

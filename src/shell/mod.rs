// file: src/shell/mod.rs
// version: 1.0.0
// guid: 8a2e4f71-0c3b-4d9e-a6f5-1b7c2d9e0f34

//! Shell fact reader
//!
//! Every fact in this crate is sourced from exactly one shell invocation.
//! The [`CommandRunner`] trait is the seam between the parsers and the
//! operating system: [`ShellRunner`] runs real commands, tests plug in
//! canned output.

pub mod local;

pub use local::ShellRunner;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Outcome of one shell invocation: trimmed stdout, or why there is none
pub type ShellResult = std::result::Result<String, ShellError>;

/// Classification of a failed shell invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShellErrorKind {
    /// The command ran and exited with a non-zero status
    CommandFailed,
    /// The shell (or the command it was asked to run) does not exist
    CommandNotFound,
    /// The command did not finish within the configured timeout
    TimedOut,
}

impl fmt::Display for ShellErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShellErrorKind::CommandFailed => "command failed",
            ShellErrorKind::CommandNotFound => "command not found",
            ShellErrorKind::TimedOut => "command timed out",
        };
        f.write_str(text)
    }
}

/// Structured failure of a shell invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: '{command}' (code {exit_code:?}): {message}")]
pub struct ShellError {
    pub kind: ShellErrorKind,
    pub command: String,
    pub exit_code: Option<i32>,
    pub message: String,
}

impl ShellError {
    /// Create a new command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ShellErrorKind::CommandFailed,
            command: command.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create a new command not found error
    pub fn command_not_found(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ShellErrorKind::CommandNotFound,
            command: command.into(),
            exit_code: Some(127),
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timed_out(command: impl Into<String>, timeout_secs: f64) -> Self {
        Self {
            kind: ShellErrorKind::TimedOut,
            command: command.into(),
            exit_code: None,
            message: format!("no result after {} seconds", timeout_secs),
        }
    }
}

/// Trait for executing one fact-gathering command
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through a command interpreter and return trimmed stdout.
    ///
    /// Implementations never panic and log each failure exactly once.
    async fn run(&self, command: &str) -> ShellResult;
}

//! Shell-level administration command execution and the per-stone
//! command log.
//!
//! Commands are composed as typed program-plus-arguments values and only
//! rendered to a display line for logging. Execution always captures the
//! child's output and reports a [`CommandOutcome`]; interpretation of a
//! non-zero exit is the caller's business — probe commands read it as a
//! boolean, lifecycle commands treat it as fatal.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::process::{Command, Output};

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::env::ProcessEnv;

/// A typed administration command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
}

impl ShellCommand {
    /// Starts a command for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The program this command invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn to_std(&self, env: &ProcessEnv) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        env.apply(&mut command);
        command
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.program)?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a completed administration command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    success: bool,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CommandOutcome {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Whether the command exited successfully.
    pub fn success(&self) -> bool {
        self.success
    }

    /// The exit code, when the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Captured standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Captured output with stderr appended after stdout, the form the
    /// command log records.
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs a command with the given child environment, capturing output.
///
/// Only a failure to launch the child is an error; a non-zero exit is
/// reported through the returned [`CommandOutcome`].
pub fn run(command: &ShellCommand, env: &ProcessEnv) -> Result<CommandOutcome, ShellError> {
    debug!(command = %command, "running administration command");
    let output = command
        .to_std(env)
        .output()
        .map_err(|source| ShellError::Launch {
            command: command.to_string(),
            source,
        })?;
    Ok(CommandOutcome::from_output(output))
}

/// Runs a command and records it in the stone's command log.
///
/// A `SHELL_CMD` line with a timestamp is appended before the command
/// runs, then the command's combined output. The log and its parent
/// directory are created lazily on first write.
pub fn run_logged(
    command: &ShellCommand,
    env: &ProcessEnv,
    log_path: &Utf8Path,
) -> Result<CommandOutcome, ShellError> {
    append_to_log(
        log_path,
        &format!("SHELL_CMD {}: {command}\n", timestamp()),
    )?;
    let outcome = run(command, env)?;
    append_to_log(log_path, &outcome.combined_output())?;
    Ok(outcome)
}

fn append_to_log(path: &Utf8Path, text: &str) -> Result<(), ShellError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ShellError::CommandLog {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ShellError::CommandLog {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(text.as_bytes())
        .map_err(|source| ShellError::CommandLog {
            path: path.to_path_buf(),
            source,
        })
}

/// `YYYY-MM-DD HH:MM:SS` stamp for command-log records, in local time
/// when the offset is determinable and UTC otherwise.
fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Errors raised by command execution or logging.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The child process could not be launched at all.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        /// Rendered command line.
        command: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The command log could not be created or appended to.
    #[error("failed to append to command log '{path}': {source}")]
    CommandLog {
        /// The log file being written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

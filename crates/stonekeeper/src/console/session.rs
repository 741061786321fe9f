//! Drives a `topaz` subprocess with a rendered session script.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use camino::Utf8PathBuf;
use thiserror::Error;
use tracing::debug;

use super::script::{ConsoleCommand, ConsoleScript, SessionLogin};
use crate::env::ProcessEnv;

/// Overrides the console binary name, primarily for test harnesses.
pub const TOPAZ_BIN_ENV: &str = "STONEKEEPER_TOPAZ_BIN";

const DEFAULT_TOPAZ_BIN: &str = "topaz";

/// A console session bound to one stone's login and console log.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    env: ProcessEnv,
    login: SessionLogin,
    console_log: Utf8PathBuf,
}

impl ConsoleSession {
    /// Creates a session carrying the stone's child environment, login,
    /// and console log path.
    pub const fn new(env: ProcessEnv, login: SessionLogin, console_log: Utf8PathBuf) -> Self {
        Self {
            env,
            login,
            console_log,
        }
    }

    /// Runs the caller's commands inside the standard session assembly
    /// and returns the captured output.
    pub fn run_commands(
        &self,
        commands: Vec<ConsoleCommand>,
    ) -> Result<ConsoleOutput, ConsoleError> {
        let script = ConsoleScript::session(self.login.clone(), &self.console_log, commands);
        self.execute(&script)
    }

    /// Executes an already-assembled script.
    pub fn execute(&self, script: &ConsoleScript) -> Result<ConsoleOutput, ConsoleError> {
        let binary = topaz_binary();
        debug!(binary = ?binary, stone = %self.login.stone, "opening console session");
        let mut command = Command::new(&binary);
        command
            .arg("-l")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        self.env.apply(&mut command);
        let mut child = command
            .spawn()
            .map_err(|source| ConsoleError::Launch { binary, source })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.render().as_bytes())
                .map_err(|source| ConsoleError::FeedScript { source })?;
        }
        let output = child
            .wait_with_output()
            .map_err(|source| ConsoleError::Capture { source })?;
        let captured = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(ConsoleError::SessionFailed {
                code: output.status.code(),
                output: captured,
            });
        }
        Ok(ConsoleOutput::new(captured))
    }
}

fn topaz_binary() -> OsString {
    env::var_os(TOPAZ_BIN_ENV).unwrap_or_else(|| OsString::from(DEFAULT_TOPAZ_BIN))
}

/// Captured output of a completed console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutput {
    raw: String,
}

impl ConsoleOutput {
    /// Wraps captured session output.
    pub const fn new(raw: String) -> Self {
        Self { raw }
    }

    /// The output exactly as captured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The output line by line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw.lines()
    }

    /// The final non-blank line, where the console reports a command's
    /// result.
    pub fn final_line(&self) -> Option<&str> {
        self.raw
            .lines()
            .rev()
            .map(str::trim_end)
            .find(|line| !line.is_empty())
    }
}

/// Errors raised while driving a console session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The console binary could not be launched.
    #[error("failed to launch console binary '{binary:?}': {source}")]
    Launch {
        /// Binary that was being spawned.
        binary: OsString,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The rendered script could not be written to the console's stdin.
    #[error("failed to feed script to console: {source}")]
    FeedScript {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The console's output could not be collected.
    #[error("failed to capture console output: {source}")]
    Capture {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The console exited with a non-zero status.
    #[error("console session exited with status {code:?}; captured output:\n{output}")]
    SessionFailed {
        /// Exit code, when the process exited normally.
        code: Option<i32>,
        /// Everything the session printed before failing.
        output: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_line_skips_trailing_blanks() {
        let output = ConsoleOutput::new("topaz 1> ready\n[Info]: tranlog 12\n\n  \n".to_owned());
        assert_eq!(output.final_line(), Some("[Info]: tranlog 12"));
    }

    #[test]
    fn final_line_of_empty_output_is_none() {
        let output = ConsoleOutput::new(String::new());
        assert_eq!(output.final_line(), None);
    }

    #[test]
    fn default_binary_is_topaz() {
        if env::var_os(TOPAZ_BIN_ENV).is_none() {
            assert_eq!(topaz_binary(), OsString::from(DEFAULT_TOPAZ_BIN));
        }
    }
}

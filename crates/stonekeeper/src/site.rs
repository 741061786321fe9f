//! Host-level operations not bound to a single stone.

use thiserror::Error;
use stonekeeper_config::{Installation, InstallationError};
use tracing::info;

use crate::env::ProcessEnv;
use crate::shell::{self, CommandOutcome, ShellCommand, ShellError};

/// The host seen as one installation with its stones and its network
/// listener.
#[derive(Debug, Clone)]
pub struct Site {
    installation: Installation,
}

impl Site {
    /// Wraps an installation for host-level operations.
    pub const fn new(installation: Installation) -> Self {
        Self { installation }
    }

    /// The underlying installation.
    pub const fn installation(&self) -> &Installation {
        &self.installation
    }

    /// Names of the stones configured on this host.
    pub fn stones(&self) -> Result<Vec<String>, InstallationError> {
        self.installation.stones()
    }

    /// Combined status listing for every stone on the host.
    pub fn status(&self) -> Result<String, SiteError> {
        let command = ShellCommand::new("gslist").arg("-clv");
        let outcome = self.run_expecting_success("status", &command)?;
        Ok(outcome.combined_output())
    }

    /// Starts the network listener in guest mode.
    pub fn start_netldi(&self) -> Result<(), SiteError> {
        info!("starting network listener");
        self.run_expecting_success("netldi start", &ShellCommand::new("startnetldi").arg("-g"))?;
        Ok(())
    }

    /// Stops the network listener.
    pub fn stop_netldi(&self) -> Result<(), SiteError> {
        info!("stopping network listener");
        self.run_expecting_success("netldi stop", &ShellCommand::new("stopnetldi"))?;
        Ok(())
    }

    fn run_expecting_success(
        &self,
        step: &'static str,
        command: &ShellCommand,
    ) -> Result<CommandOutcome, SiteError> {
        let env = ProcessEnv::for_installation(&self.installation);
        let outcome = shell::run(command, &env)?;
        if outcome.success() {
            Ok(outcome)
        } else {
            Err(SiteError::CommandFailed {
                step,
                command: command.to_string(),
                code: outcome.code(),
            })
        }
    }
}

/// Errors raised by host-level operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A host-level command exited with a non-zero status.
    #[error("{step} command '{command}' exited with status {code:?}")]
    CommandFailed {
        /// Operation the command belonged to.
        step: &'static str,
        /// Rendered command line.
        command: String,
        /// Exit code, when the process exited normally.
        code: Option<i32>,
    },
    /// The installation's configured set could not be read.
    #[error(transparent)]
    Installation(#[from] InstallationError),
    /// Command execution failed.
    #[error(transparent)]
    Shell(#[from] ShellError),
}

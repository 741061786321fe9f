//! One stone's identity, paths, and lifecycle.
//!
//! This module is split so each concern stays small and testable:
//! - [`lifecycle`] covers start/stop/restart, the running probe, status,
//!   and the guarded destroy.
//! - [`provision`] sets up a brand-new stone: configuration file,
//!   directories, seeded extent, first start, and the bootstrap console
//!   session.
//! - [`backup`] sequences the online backup and restore protocols and
//!   holds the transaction-log number parser.
//! - [`error`] is the error surface shared by all of them.

mod backup;
mod error;
mod lifecycle;
mod provision;

pub use backup::{TranlogIdError, parse_tranlog_id};
pub use error::StoneError;
pub use lifecycle::{NO_WAIT, STARTUP_WAIT_SECONDS};

use camino::Utf8PathBuf;
use stonekeeper_config::{Installation, StonePaths};
use tracing::debug;

use crate::console::{ConsoleCommand, ConsoleOutput, ConsoleSession, SessionLogin};
use crate::env::ProcessEnv;
use crate::shell::{self, CommandOutcome, ShellCommand};

/// Default administrative username for console logins and stop requests.
pub const DEFAULT_USERNAME: &str = "DataCurator";

/// Default password paired with [`DEFAULT_USERNAME`].
pub const DEFAULT_PASSWORD: &str = "swordfish";

/// A named database server instance bound to one installation.
///
/// Handles are obtained through [`Stone::existing`] (adopt a configured
/// stone) or [`Stone::create`] (provision a new one); both guard against
/// the opposite precondition so a handle never refers to a
/// half-configured instance.
#[derive(Debug, Clone)]
pub struct Stone {
    name: String,
    username: String,
    password: String,
    installation: Installation,
    paths: StonePaths,
}

impl Stone {
    /// Adopts a stone already configured on this host.
    ///
    /// Fails with [`StoneError::DoesNotExist`] when `name` is not in the
    /// installation's configured set; nothing is created.
    pub fn existing(installation: Installation, name: &str) -> Result<Self, StoneError> {
        if !installation.has_stone(name)? {
            return Err(StoneError::DoesNotExist {
                name: name.to_owned(),
            });
        }
        Ok(Self::bind(installation, name))
    }

    /// Provisions a brand-new stone and leaves it running.
    ///
    /// Fails with [`StoneError::AlreadyExists`] when `name` is already
    /// configured, before touching any file. On success the stone's
    /// configuration, directories, and seeded extent exist, the stone has
    /// been started, and the one-time bootstrap console session has run:
    /// callers always get back a ready-to-use handle, never a
    /// half-initialised one.
    pub fn create(installation: Installation, name: &str) -> Result<Self, StoneError> {
        if installation.has_stone(name)? {
            let paths = StonePaths::new(&installation, name);
            return Err(StoneError::AlreadyExists {
                name: name.to_owned(),
                config_file: paths.config_file().to_path_buf(),
            });
        }
        let stone = Self::bind(installation, name);
        stone.provision()?;
        Ok(stone)
    }

    fn bind(installation: Installation, name: &str) -> Self {
        let paths = StonePaths::new(&installation, name);
        Self {
            name: name.to_owned(),
            username: DEFAULT_USERNAME.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
            installation,
            paths,
        }
    }

    /// Replaces the default credentials on an adopted handle.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// The stone's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Administrative username used for console logins and stop requests.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The installation this stone belongs to.
    pub const fn installation(&self) -> &Installation {
        &self.installation
    }

    /// The stone's derived filesystem layout.
    pub const fn paths(&self) -> &StonePaths {
        &self.paths
    }

    /// Child-process environment for commands acting on this stone.
    pub fn process_env(&self) -> ProcessEnv {
        ProcessEnv::for_installation(&self.installation).with_stone(
            &self.name,
            self.paths.log_directory(),
            self.paths.data_directory(),
        )
    }

    pub(crate) fn session_login(&self) -> SessionLogin {
        SessionLogin {
            user: self.username.clone(),
            password: self.password.clone(),
            stone: self.name.clone(),
        }
    }

    /// Runs console commands in the stone's standard session.
    pub(crate) fn run_console(
        &self,
        commands: Vec<ConsoleCommand>,
    ) -> Result<ConsoleOutput, StoneError> {
        let session = ConsoleSession::new(
            self.process_env(),
            self.session_login(),
            self.paths.topaz_log_file(),
        );
        session
            .run_commands(commands)
            .map_err(|source| StoneError::Console {
                name: self.name.clone(),
                source,
            })
    }

    /// Runs a single Smalltalk expression sequence in one `run` block.
    pub(crate) fn run_expressions(
        &self,
        expressions: Vec<String>,
    ) -> Result<ConsoleOutput, StoneError> {
        self.run_console(vec![ConsoleCommand::Run(expressions)])
    }

    /// Runs a logged administration command, failing the current step on
    /// a non-zero exit.
    pub(crate) fn run_logged_expecting_success(
        &self,
        step: &'static str,
        command: &ShellCommand,
    ) -> Result<CommandOutcome, StoneError> {
        let log_file = self.paths.command_log_file();
        let outcome = shell::run_logged(command, &self.process_env(), &log_file)?;
        if outcome.success() {
            Ok(outcome)
        } else {
            debug!(
                stone = %self.name,
                step,
                code = ?outcome.code(),
                "administration command failed"
            );
            Err(StoneError::CommandFailed {
                name: self.name.clone(),
                step,
                command: command.to_string(),
                code: outcome.code(),
            })
        }
    }

    pub(crate) fn bootstrap_script_path(&self) -> Utf8PathBuf {
        self.installation
            .product_directory()
            .join("seaside/topaz/installMonticello.topaz")
    }
}

//! Error surface of the stone lifecycle.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;
use stonekeeper_config::InstallationError;

use super::backup::TranlogIdError;
use crate::console::ConsoleError;
use crate::shell::ShellError;

/// Errors raised by stone lifecycle, backup, and restore operations.
#[derive(Debug, Error)]
pub enum StoneError {
    /// The named stone is not in the installation's configured set.
    #[error("stone '{name}' does not exist on this host")]
    DoesNotExist {
        /// Name that was looked up.
        name: String,
    },
    /// A stone of this name is already configured; creating it again
    /// would clobber its files.
    #[error("cannot create stone '{name}': configuration file '{config_file}' already exists")]
    AlreadyExists {
        /// Name that was being created.
        name: String,
        /// The configuration file that already exists.
        config_file: Utf8PathBuf,
    },
    /// Destroy was requested while the stone is running.
    #[error("refusing to destroy stone '{name}' while it is running")]
    DestroyWhileRunning {
        /// The running stone.
        name: String,
    },
    /// An administration command exited with a non-zero status.
    #[error("stone '{name}': {step} command '{command}' exited with status {code:?}")]
    CommandFailed {
        /// The stone being operated on.
        name: String,
        /// Lifecycle step the command belonged to.
        step: &'static str,
        /// Rendered command line.
        command: String,
        /// Exit code, when the process exited normally.
        code: Option<i32>,
    },
    /// The backup's transaction-log number could not be taken from the
    /// console output.
    #[error("stone '{name}': backup aborted: {source}")]
    TranlogId {
        /// The stone being backed up.
        name: String,
        /// What was wrong with the console output.
        #[source]
        source: TranlogIdError,
    },
    /// A console session failed.
    #[error("stone '{name}': console session failed: {source}")]
    Console {
        /// The stone the session was attached to.
        name: String,
        /// The session failure.
        #[source]
        source: ConsoleError,
    },
    /// The configuration file could not be written.
    #[error("failed to write configuration file '{path}': {source}")]
    WriteConfig {
        /// The file being written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A stone directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDirectory {
        /// The directory being created.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The template extent could not be copied into place.
    #[error("failed to seed extent '{target}' from '{template}': {source}")]
    SeedExtent {
        /// The shipped template extent.
        template: Utf8PathBuf,
        /// The new stone's extent file.
        target: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A stone path could not be removed during destroy.
    #[error("failed to remove '{path}': {source}")]
    Remove {
        /// The path being removed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The installation's configured set could not be read.
    #[error(transparent)]
    Installation(#[from] InstallationError),
    /// Command execution or command-log writing failed.
    #[error(transparent)]
    Shell(#[from] ShellError),
}

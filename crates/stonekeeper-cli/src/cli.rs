//! CLI argument definitions for the stonekeeper toolchain.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use stonekeeper_config::{
    DEFAULT_BACKUP_DIRECTORY, DEFAULT_CONFIG_DIRECTORY, DEFAULT_DATA_DIRECTORY,
    DEFAULT_LOG_DIRECTORY, DEFAULT_PRODUCT_DIRECTORY,
};

/// Command-line interface for managing GemStone/S stones on this host.
#[derive(Parser, Debug)]
#[command(name = "stonekeeper", version, about = "Manage GemStone/S stones on this host")]
pub(crate) struct Cli {
    /// Product installation root.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PRODUCT_DIRECTORY)]
    pub(crate) product_dir: Utf8PathBuf,
    /// Directory holding one NAME.conf per configured stone.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CONFIG_DIRECTORY)]
    pub(crate) config_dir: Utf8PathBuf,
    /// Root under which each stone keeps its extents and tranlogs.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIRECTORY)]
    pub(crate) data_dir: Utf8PathBuf,
    /// Root under which each stone keeps its log files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LOG_DIRECTORY)]
    pub(crate) log_dir: Utf8PathBuf,
    /// Directory receiving backup archives.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_BACKUP_DIRECTORY)]
    pub(crate) backup_dir: Utf8PathBuf,
    /// Tracing filter expression, e.g. `info` or `stonekeeper=debug`.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub(crate) log_filter: String,
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations exposed by the CLI.
#[derive(Subcommand, Debug)]
pub(crate) enum CliCommand {
    /// Lists the stones configured on this host.
    List,
    /// Prints the status of one stone, or of every stone when no name is
    /// given.
    Status {
        /// Stone to report on; all stones when omitted.
        name: Option<String>,
    },
    /// Creates a new stone and leaves it running.
    Create {
        /// Name for the new stone.
        name: String,
    },
    /// Starts a configured stone.
    Start {
        /// Stone to start.
        name: String,
    },
    /// Stops a running stone.
    Stop {
        /// Stone to stop.
        name: String,
    },
    /// Restarts a stone: stop, then start.
    Restart {
        /// Stone to restart.
        name: String,
    },
    /// Takes a consistent online backup of a stone.
    Backup {
        /// Stone to back up.
        name: String,
    },
    /// Restores a stone from its most recent same-day backup.
    Restore {
        /// Stone to restore.
        name: String,
    },
    /// Destroys a stopped stone's files. Irreversible.
    Destroy {
        /// Stone to destroy.
        name: String,
    },
    /// Controls the host's network listener.
    Netldi {
        /// Listener action.
        #[command(subcommand)]
        action: NetldiAction,
    },
}

/// Network-listener actions.
#[derive(Subcommand, Debug, Clone, Copy)]
pub(crate) enum NetldiAction {
    /// Starts the listener in guest mode.
    Start,
    /// Stops the listener.
    Stop,
}

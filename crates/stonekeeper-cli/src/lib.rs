//! Binary entry logic for the stonekeeper CLI.
//!
//! [`run`] parses the command line, initialises telemetry, resolves the
//! host [`Installation`] from the directory flags, and executes the
//! requested operation, writing results to the supplied output streams
//! and mapping failures to a non-zero [`ExitCode`].

mod cli;
mod telemetry;

use std::error::Error as _;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use stonekeeper::{Site, SiteError, Stone, StoneError};
use stonekeeper_config::{Installation, InstallationError};
use thiserror::Error;
use tracing::debug;

use crate::cli::{Cli, CliCommand, NetldiAction};
pub use crate::telemetry::{TelemetryError, init_telemetry};

/// Exit code clap conventionally uses for usage errors.
const USAGE_ERROR: u8 = 2;

/// Parses `args` and executes the requested operation.
pub fn run<I, T, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let rendered = error.render();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = write!(stdout, "{rendered}");
                    ExitCode::SUCCESS
                }
                _ => {
                    let _ = write!(stderr, "{rendered}");
                    ExitCode::from(USAGE_ERROR)
                }
            };
        }
    };
    if let Err(error) = init_telemetry(&cli.log_filter) {
        let _ = writeln!(stderr, "stonekeeper: {error}");
        return ExitCode::FAILURE;
    }
    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(stderr, &error);
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), AppError> {
    let installation = Installation::new(cli.product_dir.clone())
        .with_config_directory(cli.config_dir.clone())
        .with_data_directory(cli.data_dir.clone())
        .with_log_directory(cli.log_dir.clone())
        .with_backup_directory(cli.backup_dir.clone());
    debug!(product = %installation.product_directory(), "resolved installation");
    match &cli.command {
        CliCommand::List => {
            let mut stones = installation.stones()?;
            stones.sort();
            for name in stones {
                writeln!(stdout, "{name}")?;
            }
            Ok(())
        }
        CliCommand::Status { name: None } => {
            let status = Site::new(installation).status()?;
            writeln!(stdout, "{}", status.trim_end())?;
            Ok(())
        }
        CliCommand::Status { name: Some(name) } => {
            let stone = Stone::existing(installation, name)?;
            writeln!(stdout, "{}", stone.status()?.trim_end())?;
            Ok(())
        }
        CliCommand::Create { name } => {
            Stone::create(installation, name)?;
            writeln!(stdout, "stone '{name}' created and running")?;
            Ok(())
        }
        CliCommand::Start { name } => {
            Stone::existing(installation, name)?.start()?;
            writeln!(
                stdout,
                "start issued for stone '{name}'; confirm with `stonekeeper status {name}`"
            )?;
            Ok(())
        }
        CliCommand::Stop { name } => {
            Stone::existing(installation, name)?.stop()?;
            writeln!(stdout, "stop issued for stone '{name}'")?;
            Ok(())
        }
        CliCommand::Restart { name } => {
            Stone::existing(installation, name)?.restart()?;
            writeln!(
                stdout,
                "restart issued for stone '{name}'; confirm with `stonekeeper status {name}`"
            )?;
            Ok(())
        }
        CliCommand::Backup { name } => {
            let bundle = Stone::existing(installation, name)?.backup()?;
            writeln!(stdout, "backup bundle written to {bundle}")?;
            Ok(())
        }
        CliCommand::Restore { name } => {
            Stone::existing(installation, name)?.restore()?;
            writeln!(stdout, "restore completed for stone '{name}'; start and verify it")?;
            Ok(())
        }
        CliCommand::Destroy { name } => {
            Stone::existing(installation, name)?.destroy()?;
            writeln!(stdout, "stone '{name}' destroyed")?;
            Ok(())
        }
        CliCommand::Netldi { action } => {
            let site = Site::new(installation);
            match action {
                NetldiAction::Start => {
                    site.start_netldi()?;
                    writeln!(stdout, "netldi started")?;
                }
                NetldiAction::Stop => {
                    site.stop_netldi()?;
                    writeln!(stdout, "netldi stopped")?;
                }
            }
            Ok(())
        }
    }
}

fn report<E: Write>(stderr: &mut E, error: &AppError) {
    let _ = writeln!(stderr, "stonekeeper: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  caused by: {cause}");
        source = cause.source();
    }
}

/// Errors surfaced to the operator by the CLI.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Installation(#[from] InstallationError),
    #[error(transparent)]
    Stone(#[from] StoneError),
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

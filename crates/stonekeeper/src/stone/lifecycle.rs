//! Start, stop, status, and the guarded destroy.

use std::fs;
use std::io;

use camino::Utf8Path;
use tracing::{debug, info};

use super::{Stone, StoneError};
use crate::shell::{self, ShellCommand};

/// Wait budget handed to the running probe after a start request.
pub const STARTUP_WAIT_SECONDS: i64 = 10;

/// Probe argument meaning "report the current state without waiting".
pub const NO_WAIT: i64 = -1;

impl Stone {
    /// Starts the stone.
    ///
    /// Issues the start command, then probes for readiness with a bounded
    /// wait of [`STARTUP_WAIT_SECONDS`]. The probe's outcome is advisory:
    /// the method returns success whether or not the stone reported
    /// running within the budget, so callers needing a hard guarantee
    /// must check [`Stone::is_running`] themselves. A probe that cannot
    /// even be launched still fails.
    pub fn start(&self) -> Result<(), StoneError> {
        info!(stone = %self.name(), "starting stone");
        let command = ShellCommand::new("startstone")
            .arg("-z")
            .arg(self.paths().config_file().as_str())
            .arg("-l")
            .arg(self.paths().stone_log_file().as_str())
            .arg(self.name());
        self.run_logged_expecting_success("start", &command)?;
        let ready = self.running(STARTUP_WAIT_SECONDS)?;
        debug!(stone = %self.name(), ready, "startup probe finished");
        Ok(())
    }

    /// Stops the stone. Does not wait for the process to terminate.
    pub fn stop(&self) -> Result<(), StoneError> {
        info!(stone = %self.name(), "stopping stone");
        let command = ShellCommand::new("stopstone")
            .arg("-i")
            .arg(self.name())
            .arg(self.username())
            .arg(self.password.as_str());
        self.run_logged_expecting_success("stop", &command)?;
        Ok(())
    }

    /// Stops, then starts the stone.
    pub fn restart(&self) -> Result<(), StoneError> {
        self.stop()?;
        self.start()
    }

    /// Probes whether the stone is running, waiting up to `wait_seconds`
    /// for it to come up. The probe's exit status is the answer; a
    /// non-zero exit is "not running", never an error. Only a failure to
    /// launch the probe itself propagates.
    pub fn running(&self, wait_seconds: i64) -> Result<bool, StoneError> {
        let command = ShellCommand::new("waitstone")
            .arg(self.name())
            .arg(wait_seconds.to_string());
        let outcome = shell::run(&command, &self.process_env())?;
        Ok(outcome.success())
    }

    /// Probes the current running state without waiting.
    pub fn is_running(&self) -> Result<bool, StoneError> {
        self.running(NO_WAIT)
    }

    /// Returns the stone's status listing when it is running, or a plain
    /// "not running" message otherwise. The not-running case is an
    /// answer, not an error.
    pub fn status(&self) -> Result<String, StoneError> {
        if self.is_running()? {
            let command = ShellCommand::new("gslist").arg("-clv").arg(self.name());
            let outcome = shell::run(&command, &self.process_env())?;
            if !outcome.success() {
                return Err(StoneError::CommandFailed {
                    name: self.name().to_owned(),
                    step: "status",
                    command: command.to_string(),
                    code: outcome.code(),
                });
            }
            Ok(outcome.combined_output())
        } else {
            Ok(format!("{} not running", self.name()))
        }
    }

    /// Removes the stone's configuration file, extent directory, log
    /// directory, and transaction-log directory. Irreversible.
    ///
    /// Refuses to touch anything while the stone is running; that check
    /// is the only guard, so callers get exactly one chance to keep a
    /// live stone's files.
    pub fn destroy(&self) -> Result<(), StoneError> {
        if self.is_running()? {
            return Err(StoneError::DestroyWhileRunning {
                name: self.name().to_owned(),
            });
        }
        info!(stone = %self.name(), "destroying stone");
        remove_file_if_present(self.paths().config_file())?;
        remove_dir_if_present(&self.paths().extent_directory())?;
        remove_dir_if_present(self.paths().log_directory())?;
        remove_dir_if_present(&self.paths().tranlog_directory())?;
        Ok(())
    }
}

fn remove_file_if_present(path: &Utf8Path) -> Result<(), StoneError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoneError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn remove_dir_if_present(path: &Utf8Path) -> Result<(), StoneError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoneError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

//! Online backup and restore sequencing.
//!
//! Both sequences execute in strict order with no retry and no rollback:
//! a failed step aborts the remainder and leaves earlier steps' effects
//! in place. Backup filenames carry the stone name and the calendar date
//! only, so a second backup on the same day overwrites the first.

use camino::Utf8PathBuf;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::info;

use super::{Stone, StoneError};
use crate::console::ConsoleOutput;
use crate::shell::ShellCommand;

impl Stone {
    /// Takes a consistent online backup, dated today.
    ///
    /// See [`Stone::backup_on`] for the sequence and the same-day
    /// overwrite caveat.
    pub fn backup(&self) -> Result<Utf8PathBuf, StoneError> {
        self.backup_on(current_date())
    }

    /// Takes a consistent online backup dated `date`.
    ///
    /// The sequence: rotate to a fresh transaction log and parse the new
    /// segment's number from the console's final output line (an invalid
    /// number aborts here, before any backup file exists); force a
    /// synchronized checkpoint; abort any open transaction and write the
    /// compressed full-extent copy; then bundle the extent copy with the
    /// fresh transaction-log segment into the dated archive. Returns the
    /// bundle path.
    ///
    /// Filenames embed only the stone name and calendar date: a second
    /// backup on the same date silently overwrites the first.
    pub fn backup_on(&self, date: Date) -> Result<Utf8PathBuf, StoneError> {
        info!(stone = %self.name(), "starting online backup");
        let output = self.run_expressions(vec!["SystemRepository startNewLog".to_owned()])?;
        let tranlog_id = parse_tranlog_id(&output).map_err(|source| StoneError::TranlogId {
            name: self.name().to_owned(),
            source,
        })?;
        info!(stone = %self.name(), tranlog_id, "rotated to fresh transaction log");

        self.run_expressions(vec!["System startCheckpointSync".to_owned()])?;

        let extent_backup = self.paths().extent_backup_file(date);
        self.run_expressions(vec![
            "System abortTransaction".to_owned(),
            format!("SystemRepository fullBackupCompressedTo: '{extent_backup}'"),
        ])?;

        let bundle = self.paths().backup_bundle_file(date);
        let segment = self.paths().tranlog_segment(tranlog_id);
        let archive = ShellCommand::new("tar")
            .arg("zcf")
            .arg(bundle.as_str())
            .arg(extent_backup.as_str())
            .arg(segment.as_str());
        self.run_logged_expecting_success("backup archive", &archive)?;
        info!(stone = %self.name(), bundle = %bundle, "backup bundle written");
        Ok(bundle)
    }

    /// Restores from today's backup bundle.
    ///
    /// See [`Stone::restore_on`].
    pub fn restore(&self) -> Result<(), StoneError> {
        self.restore_on(current_date())
    }

    /// Restores from the backup bundle dated `date`.
    ///
    /// The sequence: extract the bundle under the backup directory,
    /// restore from the full-extent copy, replay the current transaction
    /// logs, then commit the restore. No verification follows; the
    /// caller is responsible for starting and probing the stone.
    pub fn restore_on(&self, date: Date) -> Result<(), StoneError> {
        info!(stone = %self.name(), "restoring from backup");
        let bundle = self.paths().backup_bundle_file(date);
        let extract = ShellCommand::new("tar")
            .arg("-C")
            .arg(self.paths().backup_directory().as_str())
            .arg("-zxf")
            .arg(bundle.as_str());
        self.run_logged_expecting_success("restore extract", &extract)?;

        let extent_backup = self.paths().extent_backup_file(date);
        self.run_expressions(vec![format!(
            "SystemRepository restoreFromBackup: '{extent_backup}'"
        )])?;
        self.run_expressions(vec!["SystemRepository restoreFromCurrentLogs".to_owned()])?;
        self.run_expressions(vec!["SystemRepository commitRestore".to_owned()])?;
        Ok(())
    }
}

/// Today's calendar date, local when the offset is determinable and UTC
/// otherwise.
fn current_date() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Extracts the freshly started transaction-log segment's number from
/// captured console output.
///
/// The number is the decimal suffix of the final non-blank line. The
/// parser is deliberately narrow: it has exactly the failure modes the
/// backup protocol needs (no digits, an explicit negative, a value too
/// large to be a segment number) and no notion of the console's wider
/// output grammar.
pub fn parse_tranlog_id(output: &ConsoleOutput) -> Result<u64, TranlogIdError> {
    let Some(line) = output.final_line() else {
        return Err(TranlogIdError::EmptyOutput);
    };
    let mut preceding = line.chars().rev().peekable();
    let mut digits_reversed = Vec::new();
    while let Some(character) = preceding.peek().copied() {
        if character.is_ascii_digit() {
            digits_reversed.push(character);
            preceding.next();
        } else {
            break;
        }
    }
    if digits_reversed.is_empty() {
        return Err(TranlogIdError::Missing {
            line: line.to_owned(),
        });
    }
    if preceding.peek() == Some(&'-') {
        return Err(TranlogIdError::Negative {
            line: line.to_owned(),
        });
    }
    let digits: String = digits_reversed.into_iter().rev().collect();
    digits.parse().map_err(|_| TranlogIdError::OutOfRange {
        line: line.to_owned(),
    })
}

/// Why a transaction-log number could not be taken from console output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranlogIdError {
    /// The console produced no output at all.
    #[error("console produced no output to take a transaction-log number from")]
    EmptyOutput,
    /// The final output line does not end in digits.
    #[error("console output ended without a transaction-log number: '{line}'")]
    Missing {
        /// The offending line.
        line: String,
    },
    /// The console reported a negative number.
    #[error("console reported a negative transaction-log number: '{line}'")]
    Negative {
        /// The offending line.
        line: String,
    },
    /// The trailing digits do not fit an unsigned 64-bit integer.
    #[error("transaction-log number out of range: '{line}'")]
    OutOfRange {
        /// The offending line.
        line: String,
    },
}

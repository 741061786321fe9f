//! Derives the filesystem layout owned by a single stone.
//!
//! Only the four roots are stored; everything else is computed on demand
//! so the layout has exactly one source of truth. The lifecycle crate
//! creates and removes these paths; nothing here touches the filesystem.

use camino::{Utf8Path, Utf8PathBuf};
use time::Date;

use crate::installation::Installation;

/// Per-instance path set derived from an [`Installation`] and a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StonePaths {
    name: String,
    config_file: Utf8PathBuf,
    data_directory: Utf8PathBuf,
    log_directory: Utf8PathBuf,
    backup_directory: Utf8PathBuf,
}

impl StonePaths {
    /// Derives the layout for the stone `name` under `installation`.
    pub fn new(installation: &Installation, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            config_file: installation.config_directory().join(format!("{name}.conf")),
            data_directory: installation.data_directory().join(name),
            log_directory: installation.log_directory().join(name),
            backup_directory: installation.backup_directory().to_path_buf(),
        }
    }

    /// Name of the stone this layout belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stone's configuration file.
    pub fn config_file(&self) -> &Utf8Path {
        self.config_file.as_path()
    }

    /// Root of the stone's data tree.
    pub fn data_directory(&self) -> &Utf8Path {
        self.data_directory.as_path()
    }

    /// Directory holding the stone's log files.
    pub fn log_directory(&self) -> &Utf8Path {
        self.log_directory.as_path()
    }

    /// Directory receiving the stone's backup archives.
    pub fn backup_directory(&self) -> &Utf8Path {
        self.backup_directory.as_path()
    }

    /// Directory holding the primary extent.
    pub fn extent_directory(&self) -> Utf8PathBuf {
        self.data_directory.join("extent")
    }

    /// The primary extent file.
    pub fn extent_file(&self) -> Utf8PathBuf {
        self.extent_directory().join("extent0.dbf")
    }

    /// Scratch space used by gems attached to this stone.
    pub fn scratch_directory(&self) -> Utf8PathBuf {
        self.data_directory.join("scratch")
    }

    /// Directory holding the numbered transaction-log segments.
    pub fn tranlog_directory(&self) -> Utf8PathBuf {
        self.data_directory.join("tranlog")
    }

    /// A numbered transaction-log segment file.
    pub fn tranlog_segment(&self, id: u64) -> Utf8PathBuf {
        self.tranlog_directory().join(format!("tranlog{id}.dbf"))
    }

    /// The stone process's own log file.
    pub fn stone_log_file(&self) -> Utf8PathBuf {
        self.log_directory.join(format!("{}.log", self.name))
    }

    /// Session log appended to by every console run.
    pub fn topaz_log_file(&self) -> Utf8PathBuf {
        self.log_directory.join("topaz.log")
    }

    /// Append-only log of administrative shell invocations.
    pub fn command_log_file(&self) -> Utf8PathBuf {
        self.log_directory.join("stone_command_output.log")
    }

    /// The dated compressed full-extent copy written by a backup.
    pub fn extent_backup_file(&self, date: Date) -> Utf8PathBuf {
        self.backup_directory
            .join(format!("{}_{}.full.gz", self.name, date_stamp(date)))
    }

    /// The dated outer archive bundling the extent copy with the active
    /// transaction-log segment.
    pub fn backup_bundle_file(&self, date: Date) -> Utf8PathBuf {
        self.backup_directory
            .join(format!("{}_{}.bak.tgz", self.name, date_stamp(date)))
    }
}

/// Renders a calendar date as the `YYYY-MM-DD` stamp embedded in backup
/// filenames. Two backups on the same calendar day therefore share their
/// filenames; the later one overwrites the earlier.
pub fn date_stamp(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::Month;

    fn paths() -> StonePaths {
        let installation = Installation::new("/opt/gemstone/product");
        StonePaths::new(&installation, "seaside")
    }

    #[test]
    fn derives_the_declared_layout() {
        let paths = paths();
        assert_eq!(paths.config_file().as_str(), "/etc/gemstone/seaside.conf");
        assert_eq!(paths.data_directory().as_str(), "/var/local/gemstone/seaside");
        assert_eq!(
            paths.extent_file().as_str(),
            "/var/local/gemstone/seaside/extent/extent0.dbf"
        );
        assert_eq!(
            paths.tranlog_segment(7).as_str(),
            "/var/local/gemstone/seaside/tranlog/tranlog7.dbf"
        );
        assert_eq!(
            paths.stone_log_file().as_str(),
            "/var/log/gemstone/seaside/seaside.log"
        );
        assert_eq!(
            paths.command_log_file().as_str(),
            "/var/log/gemstone/seaside/stone_command_output.log"
        );
    }

    #[test]
    fn backup_names_embed_stone_and_date() {
        let paths = paths();
        let date = Date::from_calendar_date(2026, Month::August, 5).expect("valid date");
        assert_eq!(
            paths.extent_backup_file(date).as_str(),
            "/var/backups/gemstone/seaside_2026-08-05.full.gz"
        );
        assert_eq!(
            paths.backup_bundle_file(date).as_str(),
            "/var/backups/gemstone/seaside_2026-08-05.bak.tgz"
        );
    }

    #[rstest]
    #[case(2026, Month::August, 5, "2026-08-05")]
    #[case(2024, Month::December, 31, "2024-12-31")]
    #[case(999, Month::January, 1, "0999-01-01")]
    fn date_stamp_is_zero_padded(
        #[case] year: i32,
        #[case] month: Month,
        #[case] day: u8,
        #[case] expected: &str,
    ) {
        let date = Date::from_calendar_date(year, month, day).expect("valid date");
        assert_eq!(date_stamp(date), expected);
    }
}

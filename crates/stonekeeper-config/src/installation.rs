//! Host-level installation context shared by every stone.
//!
//! An [`Installation`] is an immutable value holding the five directories
//! that anchor the product on a host. It answers two questions the
//! lifecycle layer keeps asking: which stones are configured here, and
//! where does the shipped template extent live.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::defaults;

/// Shared, host-level product paths referenced by all stones.
///
/// Construction performs no filesystem or environment mutation; the value
/// only records where things live. Child-process environment for the
/// product's executables is composed per invocation by the lifecycle
/// crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    product_directory: Utf8PathBuf,
    config_directory: Utf8PathBuf,
    data_directory: Utf8PathBuf,
    log_directory: Utf8PathBuf,
    backup_directory: Utf8PathBuf,
}

impl Installation {
    /// Creates an installation rooted at `product_directory` with default
    /// host directories for configuration, data, logs, and backups.
    pub fn new(product_directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            product_directory: product_directory.into(),
            config_directory: Utf8PathBuf::from(defaults::DEFAULT_CONFIG_DIRECTORY),
            data_directory: Utf8PathBuf::from(defaults::DEFAULT_DATA_DIRECTORY),
            log_directory: Utf8PathBuf::from(defaults::DEFAULT_LOG_DIRECTORY),
            backup_directory: Utf8PathBuf::from(defaults::DEFAULT_BACKUP_DIRECTORY),
        }
    }

    /// The installation at the default product root.
    pub fn current() -> Self {
        Self::new(defaults::DEFAULT_PRODUCT_DIRECTORY)
    }

    /// Replaces the configuration directory.
    #[must_use]
    pub fn with_config_directory(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config_directory = path.into();
        self
    }

    /// Replaces the data-extent root.
    #[must_use]
    pub fn with_data_directory(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.data_directory = path.into();
        self
    }

    /// Replaces the base log root.
    #[must_use]
    pub fn with_log_directory(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.log_directory = path.into();
        self
    }

    /// Replaces the backup root.
    #[must_use]
    pub fn with_backup_directory(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.backup_directory = path.into();
        self
    }

    /// Product installation root.
    pub fn product_directory(&self) -> &Utf8Path {
        self.product_directory.as_path()
    }

    /// Directory holding one `NAME.conf` per configured stone.
    pub fn config_directory(&self) -> &Utf8Path {
        self.config_directory.as_path()
    }

    /// Root under which each stone keeps its extents and tranlogs.
    pub fn data_directory(&self) -> &Utf8Path {
        self.data_directory.as_path()
    }

    /// Root under which each stone keeps its log files.
    pub fn log_directory(&self) -> &Utf8Path {
        self.log_directory.as_path()
    }

    /// Directory receiving backup archives for every stone.
    pub fn backup_directory(&self) -> &Utf8Path {
        self.backup_directory.as_path()
    }

    /// Directory holding the product's executables.
    pub fn bin_directory(&self) -> Utf8PathBuf {
        self.product_directory.join("bin")
    }

    /// The template extent shipped with the product, used to seed a brand
    /// new stone.
    pub fn initial_extent_path(&self) -> Utf8PathBuf {
        self.bin_directory().join("extent0.dbf")
    }

    /// Names of the stones configured on this host.
    ///
    /// Lists entries directly under the configuration directory and takes
    /// each entry's base name before its first `.`. Order is not
    /// guaranteed. A missing configuration directory is a host with no
    /// stones, not an error; any other read failure propagates.
    pub fn stones(&self) -> Result<Vec<String>, InstallationError> {
        let entries = match fs::read_dir(&self.config_directory) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(InstallationError::ListConfigDirectory {
                    path: self.config_directory.clone(),
                    source,
                });
            }
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| InstallationError::ListConfigDirectory {
                path: self.config_directory.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            // Non-UTF-8 entries cannot name a stone; skip them.
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let base = file_name.split('.').next().unwrap_or(file_name);
            if !base.is_empty() {
                names.push(base.to_owned());
            }
        }
        Ok(names)
    }

    /// Reports whether `name` appears in the configured-stone set.
    pub fn has_stone(&self, name: &str) -> Result<bool, InstallationError> {
        Ok(self.stones()?.iter().any(|stone| stone == name))
    }
}

impl Default for Installation {
    fn default() -> Self {
        Self::current()
    }
}

/// Errors raised while inspecting an installation.
#[derive(Debug, Error)]
pub enum InstallationError {
    /// The configuration directory exists but could not be listed.
    #[error("failed to list configuration directory '{path}': {source}")]
    ListConfigDirectory {
        /// Directory that was being listed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_installation() -> (TempDir, Installation) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let installation = Installation::new(root.join("product"))
            .with_config_directory(root.join("etc"))
            .with_data_directory(root.join("data"))
            .with_log_directory(root.join("log"))
            .with_backup_directory(root.join("backup"));
        (dir, installation)
    }

    #[test]
    fn missing_config_directory_yields_no_stones() {
        let (_dir, installation) = temp_installation();
        assert_eq!(installation.stones().expect("stones"), Vec::<String>::new());
    }

    #[test]
    fn stones_take_base_names_before_first_dot() {
        let (_dir, installation) = temp_installation();
        fs::create_dir_all(installation.config_directory()).expect("create config dir");
        fs::write(installation.config_directory().join("seaside.conf"), b"").expect("write conf");
        fs::write(installation.config_directory().join("demo.conf.bak"), b"").expect("write bak");
        let mut stones = installation.stones().expect("stones");
        stones.sort();
        assert_eq!(stones, vec!["demo".to_owned(), "seaside".to_owned()]);
    }

    #[test]
    fn has_stone_matches_configured_names() {
        let (_dir, installation) = temp_installation();
        fs::create_dir_all(installation.config_directory()).expect("create config dir");
        fs::write(installation.config_directory().join("seaside.conf"), b"").expect("write conf");
        assert!(installation.has_stone("seaside").expect("lookup"));
        assert!(!installation.has_stone("absent").expect("lookup"));
    }

    #[test]
    fn initial_extent_lives_under_product_bin() {
        let (_dir, installation) = temp_installation();
        assert!(
            installation
                .initial_extent_path()
                .ends_with("product/bin/extent0.dbf")
        );
    }

    #[test]
    fn defaults_point_at_the_stock_host_layout() {
        let installation = Installation::current();
        assert_eq!(
            installation.product_directory().as_str(),
            crate::defaults::DEFAULT_PRODUCT_DIRECTORY
        );
        assert_eq!(
            installation.config_directory().as_str(),
            crate::defaults::DEFAULT_CONFIG_DIRECTORY
        );
    }
}

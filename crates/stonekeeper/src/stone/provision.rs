//! First-time setup of a brand-new stone.
//!
//! Provisioning ends with the stone started and bootstrapped so
//! [`Stone::create`] hands back a running, ready instance. There is no
//! rollback: a failed step leaves whatever it had already written for
//! the operator to inspect.

use std::fs;

use tracing::info;

use super::{Stone, StoneError};
use crate::console::ConsoleCommand;

/// Symbol-dictionary alias installed for the duration of the bootstrap
/// session and removed again once the base code is loaded.
const BOOTSTRAP_DICTIONARY_ALIAS: &str = "BootStrapSymbolDictionaryName";

impl Stone {
    pub(crate) fn provision(&self) -> Result<(), StoneError> {
        info!(stone = %self.name(), "provisioning new stone");
        self.write_config_file()?;
        self.create_directories()?;
        self.seed_initial_extent()?;
        self.start()?;
        self.bootstrap()
    }

    fn write_config_file(&self) -> Result<(), StoneError> {
        let path = self.paths().config_file();
        let rendered = stonekeeper_config::render_config(self.paths());
        fs::write(path, rendered).map_err(|source| StoneError::WriteConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    fn create_directories(&self) -> Result<(), StoneError> {
        for directory in [
            self.paths().extent_directory(),
            self.paths().log_directory().to_path_buf(),
            self.paths().tranlog_directory(),
        ] {
            fs::create_dir_all(&directory).map_err(|source| StoneError::CreateDirectory {
                path: directory.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn seed_initial_extent(&self) -> Result<(), StoneError> {
        let template = self.installation().initial_extent_path();
        let target = self.paths().extent_file();
        let seed_error = |source| StoneError::SeedExtent {
            template: template.clone(),
            target: target.clone(),
            source,
        };
        fs::copy(&template, &target).map_err(seed_error)?;
        // The stone and its gems share the extent through the same group.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(0o660)).map_err(seed_error)?;
        }
        Ok(())
    }

    /// The one-time bootstrap session: expose the bootstrap symbol
    /// dictionary under its well-known alias, load the shipped base code,
    /// then retract the alias, committing after each stage.
    fn bootstrap(&self) -> Result<(), StoneError> {
        info!(stone = %self.name(), "running bootstrap console session");
        self.run_expressions(vec![
            format!("UserGlobals at: #{BOOTSTRAP_DICTIONARY_ALIAS} put: #UserGlobals"),
            "System commitTransaction".to_owned(),
        ])?;
        self.run_console(vec![
            ConsoleCommand::Input(self.bootstrap_script_path()),
            ConsoleCommand::Commit,
        ])?;
        self.run_expressions(vec![
            format!("UserGlobals removeKey: #{BOOTSTRAP_DICTIONARY_ALIAS}"),
            "System commitTransaction".to_owned(),
        ])?;
        Ok(())
    }
}

//! Child-process environment composed per subprocess invocation.
//!
//! The product's executables locate the installation and the stone they
//! act on through a handful of environment variables. Rather than
//! mutating this process's environment (which would make interleaved
//! operations against two stones a last-writer-wins race), every
//! invocation carries its own [`ProcessEnv`] applied to the spawned
//! command alone.

use std::env;
use std::process::Command;

use camino::Utf8Path;
use stonekeeper_config::Installation;

/// Variable naming the product installation root.
pub const ENV_PRODUCT: &str = "GEMSTONE";

/// Variable naming the stone a child process acts on.
pub const ENV_STONE_NAME: &str = "GEMSTONE_NAME";

/// Variable naming the acting stone's log directory.
pub const ENV_LOG_DIR: &str = "GEMSTONE_LOGDIR";

/// Variable naming the acting stone's data directory.
pub const ENV_DATA_DIR: &str = "GEMSTONE_DATADIR";

/// Environment overrides applied to one spawned command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: Vec<(String, String)>,
}

impl ProcessEnv {
    /// Environment for host-level commands: the installation root plus a
    /// PATH extended with the product's `bin` directory.
    pub fn for_installation(installation: &Installation) -> Self {
        Self {
            vars: vec![
                (
                    ENV_PRODUCT.to_owned(),
                    installation.product_directory().to_string(),
                ),
                (
                    "PATH".to_owned(),
                    extended_path(&installation.bin_directory()),
                ),
            ],
        }
    }

    /// Extends a host-level environment with the variables naming one
    /// stone and its directories.
    #[must_use]
    pub fn with_stone(
        mut self,
        name: &str,
        log_directory: &Utf8Path,
        data_directory: &Utf8Path,
    ) -> Self {
        self.vars.push((ENV_STONE_NAME.to_owned(), name.to_owned()));
        self.vars
            .push((ENV_LOG_DIR.to_owned(), log_directory.to_string()));
        self.vars
            .push((ENV_DATA_DIR.to_owned(), data_directory.to_string()));
        self
    }

    /// Applies the overrides to a command about to be spawned.
    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.vars {
            command.env(key, value);
        }
    }

    /// The variables this environment would set, in application order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// The inherited search path with the product's `bin` directory appended,
/// so the administration executables resolve without shadowing system
/// tools of the same name.
fn extended_path(bin_directory: &Utf8Path) -> String {
    match env::var("PATH") {
        Ok(path) if !path.is_empty() => format!("{path}:{bin_directory}"),
        _ => bin_directory.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stonekeeper_config::StonePaths;

    fn installation() -> Installation {
        Installation::new("/opt/gemstone/product")
    }

    #[test]
    fn installation_env_sets_product_and_path() {
        let env = ProcessEnv::for_installation(&installation());
        let vars: Vec<_> = env.vars().collect();
        assert!(vars.contains(&(ENV_PRODUCT, "/opt/gemstone/product")));
        let path = vars
            .iter()
            .find(|(key, _)| *key == "PATH")
            .map(|(_, value)| *value)
            .expect("PATH override present");
        assert!(path.ends_with("/opt/gemstone/product/bin"));
    }

    #[test]
    fn stone_env_adds_the_three_stone_variables() {
        let installation = installation();
        let paths = StonePaths::new(&installation, "seaside");
        let env = ProcessEnv::for_installation(&installation).with_stone(
            "seaside",
            paths.log_directory(),
            paths.data_directory(),
        );
        let vars: Vec<_> = env.vars().collect();
        assert!(vars.contains(&(ENV_STONE_NAME, "seaside")));
        assert!(vars.contains(&(ENV_LOG_DIR, "/var/log/gemstone/seaside")));
        assert!(vars.contains(&(ENV_DATA_DIR, "/var/local/gemstone/seaside")));
    }

    #[test]
    fn apply_sets_the_variables_on_a_command() {
        let env = ProcessEnv::for_installation(&installation());
        let mut command = Command::new("true");
        env.apply(&mut command);
        let keys: Vec<_> = command
            .get_envs()
            .filter_map(|(key, value)| value.map(|_| key.to_os_string()))
            .collect();
        assert!(keys.iter().any(|key| key == ENV_PRODUCT));
        assert!(keys.iter().any(|key| key == "PATH"));
    }
}

//! Shared installation context and per-stone path derivation.
//!
//! Every stone managed on a host references one [`Installation`]: the five
//! product and host directories that anchor all derived paths. The
//! [`StonePaths`] value computes the per-instance layout (configuration
//! file, extent and transaction-log directories, log files, dated backup
//! names) so the lifecycle crate and the CLI agree on where artefacts
//! live without either of them hard-coding a path.
//!
//! Constructing an [`Installation`] has no side effects. The environment
//! variables consumed by the product's executables are composed per
//! subprocess invocation by the lifecycle crate, so two installations can
//! coexist in one process.

mod defaults;
mod installation;
mod stone_paths;
mod template;

pub use defaults::{
    DEFAULT_BACKUP_DIRECTORY, DEFAULT_CONFIG_DIRECTORY, DEFAULT_DATA_DIRECTORY,
    DEFAULT_LOG_DIRECTORY, DEFAULT_PRODUCT_DIRECTORY,
};
pub use installation::{Installation, InstallationError};
pub use stone_paths::{StonePaths, date_stamp};
pub use template::render_config;

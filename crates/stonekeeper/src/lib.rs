//! Lifecycle orchestration for GemStone/S database server instances.
//!
//! A host runs one product [`Installation`](config::Installation) and any
//! number of named stones. This crate composes the product's
//! administration executables (`startstone`, `stopstone`, `waitstone`,
//! `gslist`, the netldi pair, `tar`) and the interactive `topaz` console
//! into the higher-level operations an operator actually wants: create,
//! start, stop, restart, status, destroy, backup, and restore.
//!
//! The moving parts, leaf first:
//! - [`env`] composes the child-process environment applied to every
//!   subprocess invocation.
//! - [`shell`] runs administration commands and keeps the per-stone
//!   command log.
//! - [`console`] builds and drives scripted `topaz` sessions with a fixed
//!   login/error-trapping preamble.
//! - [`stone`] owns one instance's identity and paths and sequences the
//!   lifecycle and backup/restore protocols.
//! - [`site`] covers the host-level operations that are not bound to a
//!   single stone.
//!
//! Every operation is a blocking subprocess invocation; nothing here is
//! asynchronous and nothing retries. A failed step aborts the remainder
//! of its sequence and surfaces the stone name, the step, and the
//! rendered command for diagnosis.

pub mod console;
pub mod env;
pub mod shell;
pub mod site;
pub mod stone;

pub use stonekeeper_config as config;

pub use site::{Site, SiteError};
pub use stone::{Stone, StoneError};

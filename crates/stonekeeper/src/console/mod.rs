//! Scripted sessions against the interactive `topaz` console.
//!
//! Privileged in-database administration goes through `topaz`, driven as
//! a subprocess reading a scripted session on stdin. The module is split
//! in two:
//! - [`script`] defines the typed command records and assembles the fixed
//!   login/error-trapping preamble around the caller's commands.
//! - [`session`] spawns the console, feeds it the rendered script, and
//!   captures its output.
//!
//! Errors reported by the console stay visible in the captured output
//! (the preamble enables `iferror stack` and `display oops`); callers
//! parse that output, so error visibility is load-bearing rather than
//! cosmetic.

pub mod script;
pub mod session;

pub use script::{
    BYTES_DISPLAY_LIMIT, ConsoleCommand, ConsoleScript, OOPS_DISPLAY_LIMIT, SessionLogin,
};
pub use session::{ConsoleError, ConsoleOutput, ConsoleSession, TOPAZ_BIN_ENV};

//! CLI entrypoint for the stonekeeper toolchain.
//!
//! The binary delegates to [`stonekeeper_cli::run`], which parses
//! arguments, initialises telemetry, and executes the requested
//! operation against the host's installation.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    stonekeeper_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

//! Boundary to whatever actually runs a command line.

use std::path::Path;

use anyhow::Result;
use core_terminal::TerminalDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Continue,
    Exit,
}

/// Runs accepted lines that are not built-ins.
///
/// The cursor is at the start of a fresh row when `run` is called. The
/// runner owns the terminal until it returns and is expected to
/// [`suspend`](TerminalDriver::suspend) it around child processes.
pub trait CommandRunner {
    fn run(&mut self, driver: &mut dyn TerminalDriver, line: &str, cwd: &Path) -> Result<()>;
}

//! Runs command lines through the platform shell.

use std::env;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use core_actions::CommandRunner;
use core_terminal::TerminalDriver;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunner {
    program: String,
    flag: &'static str,
}

impl ShellRunner {
    /// `cmd /C` on Windows, `$SHELL -c` (falling back to `sh`) elsewhere.
    pub fn from_env() -> Self {
        if cfg!(windows) {
            return Self::new("cmd", "/C");
        }
        let shell = env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "sh".to_string());
        Self::new(shell, "-c")
    }

    pub fn new(program: impl Into<String>, flag: &'static str) -> Self {
        Self {
            program: program.into(),
            flag,
        }
    }

    fn command(&self, line: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(self.flag);
        #[cfg(windows)]
        {
            // cmd.exe does its own parsing of the command line.
            use std::os::windows::process::CommandExt;
            cmd.raw_arg(line);
        }
        #[cfg(not(windows))]
        {
            cmd.arg(line);
        }
        cmd.current_dir(cwd);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, driver: &mut dyn TerminalDriver, line: &str, cwd: &Path) -> Result<()> {
        driver.flush()?;
        driver.suspend()?;
        let status = self.command(line, cwd).status();
        driver.resume()?;
        match status {
            Ok(status) => debug!(target: "runtime", code = status.code(), "command_exit"),
            Err(e) => {
                warn!(target: "runtime", shell = %self.program, error = %e, "spawn_failed");
                driver.write_str(&format!("{}: {e}\n", self.program))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::mock::{DriverOp, MockDriver};

    #[test]
    fn terminal_is_handed_over_around_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new("oxcmd-no-such-shell", "-c");
        let mut d = MockDriver::new(80, 5);
        runner.run(&mut d, "true", dir.path()).unwrap();
        let suspend = d.ops.iter().position(|op| *op == DriverOp::Suspend);
        let resume = d.ops.iter().position(|op| *op == DriverOp::Resume);
        assert!(suspend.unwrap() < resume.unwrap());
        assert!(d.row(0).starts_with("oxcmd-no-such-shell: "));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_the_session_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new("sh", "-c");
        let mut d = MockDriver::new(80, 5);
        runner.run(&mut d, "echo hi > out.txt", dir.path()).unwrap();
        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "hi\n");
    }
}

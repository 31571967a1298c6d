#![allow(dead_code)] // Each test binary uses a subset of the helpers.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use core_actions::{CommandRunner, Session, Workdir};
use core_config::{ConfigFile, DataPaths};
use core_events::{ControlState, KeyEvent, vk};
use core_terminal::TerminalDriver;

/// Working directory that never touches the process state.
pub struct DirWorkdir(PathBuf);

impl DirWorkdir {
    pub fn new(path: &Path) -> Self {
        Self(path.canonicalize().unwrap())
    }
}

impl Workdir for DirWorkdir {
    fn current(&self) -> &Path {
        &self.0
    }

    fn change(&mut self, target: &Path) -> io::Result<()> {
        let joined = self.0.join(target);
        if !joined.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        self.0 = joined.canonicalize()?;
        Ok(())
    }
}

/// Records every line it is asked to run.
#[derive(Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    pub delay: Option<Duration>,
}

impl CommandRunner for Recorder {
    fn run(&mut self, driver: &mut dyn TerminalDriver, line: &str, _cwd: &Path) -> Result<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        driver.write_str(&format!("ran {line}\n"))?;
        self.lines.push(line.to_string());
        Ok(())
    }
}

pub fn config() -> ConfigFile {
    let mut cfg = ConfigFile::default();
    cfg.appearance.prompt = "> ".to_string();
    cfg
}

pub fn session(cfg: &ConfigFile, data: &Path, cwd: &Path) -> Session {
    Session::new(cfg, DataPaths::at(data), Box::new(DirWorkdir::new(cwd))).with_home(None)
}

pub fn enter() -> KeyEvent {
    KeyEvent::new('\r', vk::RETURN, ControlState::empty())
}

pub fn tab() -> KeyEvent {
    KeyEvent::new('\t', vk::TAB, ControlState::empty())
}

pub fn key(virtual_key: u16) -> KeyEvent {
    KeyEvent::special(virtual_key, ControlState::empty())
}

pub fn shifted(virtual_key: u16) -> KeyEvent {
    KeyEvent::special(virtual_key, ControlState::SHIFT)
}

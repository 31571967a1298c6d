//! Where commands run.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// The working directory seen by the session. Relative targets resolve
/// against [`current`](Workdir::current).
pub trait Workdir {
    fn current(&self) -> &Path;
    fn change(&mut self, target: &Path) -> io::Result<()>;
}

/// The process working directory.
#[derive(Debug, Clone)]
pub struct ProcessWorkdir {
    path: PathBuf,
}

impl ProcessWorkdir {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            path: env::current_dir()?,
        })
    }
}

impl Workdir for ProcessWorkdir {
    fn current(&self) -> &Path {
        &self.path
    }

    fn change(&mut self, target: &Path) -> io::Result<()> {
        let joined = self.path.join(target);
        env::set_current_dir(&joined)?;
        self.path = env::current_dir().unwrap_or(joined);
        debug!(target: "dispatch", cwd = %self.path.display(), "chdir");
        Ok(())
    }
}

//! Per-user data directory layout.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Platform data dir (`~/.local/share/oxcmd`, `%APPDATA%\oxcmd`, ...), or
    /// `./.oxcmd` when the platform reports none.
    pub fn discover() -> Self {
        let root = dirs::data_dir()
            .map(|d| d.join("oxcmd"))
            .unwrap_or_else(|| PathBuf::from(".oxcmd"));
        Self { root }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory tree if missing.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating data dir {}", self.root.display()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn history(&self) -> PathBuf {
        self.root.join("history")
    }
    pub fn dir_history(&self) -> PathBuf {
        self.root.join("dir_history")
    }
    pub fn log_file_name(&self) -> &'static str {
        "oxcmd.log"
    }
    /// `crash-<stamp>.log`, stamp formatted by the caller (`YYYYmmdd_HHMMSS`).
    pub fn crash_report(&self, stamp: &str) -> PathBuf {
        self.root.join(format!("crash-{stamp}.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_nested_root() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::at(tmp.path().join("a").join("b"));
        paths.ensure().unwrap();
        assert!(paths.root().is_dir());
        assert_eq!(paths.history(), tmp.path().join("a/b/history"));
        assert_eq!(
            paths.crash_report("20240101_120000"),
            tmp.path().join("a/b/crash-20240101_120000.log")
        );
    }
}

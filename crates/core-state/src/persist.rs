//! Line-oriented history files.
//!
//! One entry per line, UTF-8, newline-terminated, oldest first. Saving merges
//! with whatever another session wrote in the meantime: every in-memory entry
//! is moved to the end of the on-disk list, then the result is capped to the
//! newest `cap` entries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("can't open {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("can't write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Read all entries. A missing file is an error too; callers treat it as
/// an empty history after warning.
pub fn load_lines(path: &Path) -> Result<Vec<String>, PersistError> {
    let bytes = fs::read(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .filter(|l| !l.is_empty())
        .collect();
    debug!(target: "state.persist", file = %path.display(), entries = lines.len(), "loaded");
    Ok(lines)
}

/// Load, or warn and fall back to an empty list.
pub fn load_or_warn(path: &Path) -> (Vec<String>, Option<PersistError>) {
    match load_lines(path) {
        Ok(lines) => (lines, None),
        Err(e) => {
            warn!(target: "state.persist", error = %e, "history_load_failed");
            (Vec::new(), Some(e))
        }
    }
}

/// Merge `lines` into the file at `path` and keep the newest `cap` entries.
pub fn save_lines(path: &Path, lines: &[String], cap: usize) -> Result<(), PersistError> {
    let mut merged = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .lines()
            .map(|l| l.trim_end_matches('\r').to_string())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>(),
        Err(_) => Vec::new(),
    };
    for line in lines {
        if let Some(pos) = merged.iter().position(|l| l == line) {
            merged.remove(pos);
        }
        merged.push(line.clone());
    }
    if merged.len() > cap {
        merged.drain(..merged.len() - cap);
    }
    let mut out = String::with_capacity(merged.iter().map(|l| l.len() + 1).sum());
    for l in &merged {
        out.push_str(l);
        out.push('\n');
    }
    fs::write(path, out).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "state.persist", file = %path.display(), entries = merged.len(), "saved");
    Ok(())
}

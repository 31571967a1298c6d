//! Filesystem entries by case-insensitive name prefix.

use std::fs;

use core_text::char_len;
use tracing::debug;

use super::{
    Completer, CompletionResult, DIR_SUFFIX, Highlight, Kind, common_prefix, last_token, quote,
    sort_names, split_dir,
};

/// One directory entry offered for completion.
pub(crate) struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn display(&self) -> String {
        if self.is_dir {
            format!("{}{DIR_SUFFIX}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Entries of the directory named by `dir_part` accepted by `keep`.
/// Dot files are listed only when `name_hint` starts with a dot.
pub(crate) fn list(
    c: &Completer,
    dir_part: &str,
    name_hint: &str,
    keep: impl Fn(&str) -> bool,
) -> Option<Vec<Entry>> {
    let dir = c.resolve_dir(dir_part)?;
    let read = match fs::read_dir(&dir) {
        Ok(read) => read,
        Err(e) => {
            debug!(target: "complete", dir = %dir.display(), error = %e, "read_dir_failed");
            return None;
        }
    };
    let show_hidden = name_hint.starts_with('.');
    let mut entries: Vec<Entry> = read
        .filter_map(Result::ok)
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            if (!show_hidden && name.starts_with('.')) || !keep(&name) {
                return None;
            }
            Some(Entry {
                is_dir: e.path().is_dir(),
                name,
            })
        })
        .collect();
    sort_names(&mut entries, |e| e.name.as_str());
    Some(entries)
}

pub(crate) fn complete(c: &Completer, before: &str) -> CompletionResult {
    let (start, token) = last_token(before);
    let quoted = token.starts_with('"');
    let raw = token.replace('"', "");
    let (dir_part, prefix) = split_dir(&raw);
    let lower = prefix.to_lowercase();
    let Some(entries) = list(c, dir_part, prefix, |name| {
        name.to_lowercase().starts_with(&lower)
    }) else {
        return CompletionResult::unchanged(Kind::File, before);
    };
    if entries.is_empty() {
        return CompletionResult::unchanged(Kind::File, before);
    }

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let shared = common_prefix(&names);
    let (name, close) = match entries.as_slice() {
        [only] => (only.display(), !only.is_dir),
        _ if char_len(&shared) > char_len(prefix) => (shared.clone(), false),
        _ => (prefix.to_string(), false),
    };
    let path = quote(format!("{dir_part}{name}"), quoted, close);
    CompletionResult {
        kind: Kind::File,
        completed: format!("{}{path}", &before[..start]),
        suggestions: entries.iter().map(Entry::display).collect(),
        highlight: Highlight::CommonPrefix(char_len(&shared)),
    }
}

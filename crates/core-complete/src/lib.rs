//! Completion of the token before the cursor.
//!
//! [`Completer::complete`] picks one of three strategies from the shape of
//! the last token:
//!
//! * an odd number of `%` (or a trailing `$NAME`) completes environment
//!   variable names,
//! * `*` or `?` completes filesystem entries matching the wildcard pattern,
//! * anything else completes filesystem entries by case-insensitive prefix.
//!
//! The result carries the whole new text before the cursor, the suggestion
//! list in display order and what to highlight when listing them.

mod env;
mod file;
pub mod layout;
pub mod tokenize;
mod wildcard;

use std::path::{Path, PathBuf};

use core_text::char_len;
use tracing::debug;

pub use layout::{Layout, LayoutParams};
pub use tokenize::{has_wildcards, last_token, parse_line};
pub use wildcard::wildcard_to_regex;

/// `(start, end)` character offsets inside one suggestion.
pub type Span = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    EnvVar,
    Wildcard,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// Every suggestion starts with this many shared characters.
    CommonPrefix(usize),
    /// Per suggestion, the parts matched by a wildcard. Everything else is
    /// literal pattern text.
    Wildcard(Vec<Vec<Span>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub kind: Kind,
    /// Replacement for the whole text before the cursor.
    pub completed: String,
    pub suggestions: Vec<String>,
    pub highlight: Highlight,
}

impl CompletionResult {
    fn unchanged(kind: Kind, before: &str) -> Self {
        Self {
            kind,
            completed: before.to_string(),
            suggestions: Vec::new(),
            highlight: Highlight::CommonPrefix(0),
        }
    }
}

pub struct Completer {
    cwd: PathBuf,
    home: Option<PathBuf>,
    vars: Vec<String>,
}

impl Completer {
    /// Completer over the process environment.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let vars = std::env::vars_os()
            .map(|(k, _)| k.to_string_lossy().into_owned())
            .collect();
        Self {
            cwd: cwd.into(),
            home: dirs::home_dir(),
            vars,
        }
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn with_vars(mut self, vars: Vec<String>) -> Self {
        self.vars = vars;
        self
    }

    pub fn complete(&self, before: &str) -> CompletionResult {
        let (_, token) = last_token(before);
        let unquoted = token.replace('"', "");
        let result = if unquoted.matches('%').count() % 2 == 1 {
            env::complete_percent(&self.vars, before)
        } else if let Some(at) = env::dollar_ref(token) {
            env::complete_dollar(&self.vars, before, at)
        } else if has_wildcards(&unquoted) {
            wildcard::complete(self, before)
        } else {
            file::complete(self, before)
        };
        debug!(
            target: "complete",
            kind = ?result.kind,
            suggestions = result.suggestions.len(),
            changed = result.completed != before,
            "complete"
        );
        result
    }

    /// Directory a token's directory part refers to. `~` resolves against
    /// the home directory.
    fn resolve_dir(&self, dir_part: &str) -> Option<PathBuf> {
        if dir_part.is_empty() {
            return Some(self.cwd.clone());
        }
        if let Some(rest) = dir_part.strip_prefix('~')
            && (rest.is_empty() || rest.starts_with(is_path_sep))
        {
            let home = self.home.as_ref()?;
            return Some(home.join(rest.trim_start_matches(is_path_sep)));
        }
        let p = Path::new(dir_part);
        Some(if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        })
    }
}

fn is_path_sep(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

const DIR_SUFFIX: char = std::path::MAIN_SEPARATOR;

/// Split a path token after its last separator.
fn split_dir(token: &str) -> (&str, &str) {
    match token.rfind(is_path_sep) {
        Some(i) => token.split_at(i + 1),
        None => ("", token),
    }
}

/// Longest prefix shared by all items, compared case-insensitively and
/// spelled as in the first item.
pub fn common_prefix<S: AsRef<str>>(items: &[S]) -> String {
    let Some(first) = items.first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut len = char_len(first);
    for item in &items[1..] {
        let shared = first
            .chars()
            .zip(item.as_ref().chars())
            .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
            .count();
        len = len.min(shared);
    }
    first.chars().take(len).collect()
}

/// Quote `path` when it contains a blank. A final completion closes the quote.
fn quote(path: String, force: bool, close: bool) -> String {
    if force || path.contains(' ') {
        if close {
            format!("\"{path}\"")
        } else {
            format!("\"{path}")
        }
    } else {
        path
    }
}

/// Case-insensitive sort, on-disk spelling kept.
fn sort_names<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
    });
}

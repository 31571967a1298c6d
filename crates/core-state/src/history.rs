//! Command history with incremental filter navigation.
//!
//! Entries are unique and kept in most-recent-use order (newest last).
//! Navigation starts from the line being edited: that line becomes the
//! *trail* (restored when navigation is cancelled or runs past the newest
//! entry) and, when non-empty, the filter. Only entries containing the filter
//! as a substring are visited, and entries identical to what is already on
//! screen are skipped.

use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards older entries.
    Prev,
    /// Towards newer entries.
    Next,
}

/// `(start, end)` character offsets of one filter occurrence.
pub type Span = (usize, usize);

#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    list: Vec<String>,
    /// Entry on display while navigating; `None` shows the trail.
    index: Option<usize>,
    browsing: bool,
    filter: String,
    trail: String,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut h = Self::new();
        for l in lines {
            h.add(&l);
        }
        h
    }

    pub fn entries(&self) -> &[String] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Append `line`, removing any earlier occurrence first. Blank lines are ignored.
    pub fn add(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Some(pos) = self.list.iter().position(|l| l == line) {
            self.list.remove(pos);
        }
        self.list.push(line.to_string());
        trace!(target: "state.history", len = self.list.len(), "add");
    }

    /// Leave navigation / filter mode.
    pub fn reset(&mut self) {
        if self.browsing {
            trace!(target: "state.history", "reset");
        }
        self.browsing = false;
        self.index = None;
        self.filter.clear();
        self.trail.clear();
    }

    pub fn is_browsing(&self) -> bool {
        self.browsing
    }

    /// Navigating with a non-empty filter.
    pub fn is_filtering(&self) -> bool {
        self.browsing && !self.filter.is_empty()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The line that was being edited when navigation started.
    pub fn trail(&self) -> &str {
        &self.trail
    }

    /// Begin navigating from `line`, which becomes both trail and filter.
    pub fn start(&mut self, line: &str) {
        self.browsing = true;
        self.index = None;
        self.trail = line.to_string();
        self.filter = line.to_string();
        debug!(target: "state.history", filter_len = self.filter.chars().count(), "start");
    }

    /// Replace the filter, keeping the navigation position.
    pub fn set_filter(&mut self, text: &str) {
        if !self.browsing {
            self.start("");
        }
        self.filter = text.to_string();
    }

    fn matches(&self, entry: &str) -> bool {
        entry.contains(self.filter.as_str())
    }

    /// Move one matching entry in `dir`. Starts navigation from an empty
    /// trail when not yet browsing. Returns whether the displayed entry changed.
    pub fn navigate(&mut self, dir: Direction) -> bool {
        if !self.browsing {
            self.start("");
        }
        let shown = self.current().0;
        let moved = match dir {
            Direction::Prev => {
                let end = self.index.unwrap_or(self.list.len());
                let found = (0..end)
                    .rev()
                    .find(|&i| self.matches(&self.list[i]) && self.list[i] != shown);
                match found {
                    Some(i) => {
                        self.index = Some(i);
                        true
                    }
                    None => false,
                }
            }
            Direction::Next => match self.index {
                None => false,
                Some(start) => {
                    let found = (start + 1..self.list.len())
                        .find(|&i| self.matches(&self.list[i]) && self.list[i] != shown);
                    self.index = found;
                    true
                }
            },
        };
        trace!(target: "state.history", ?dir, moved, index = ?self.index, "navigate");
        moved
    }

    /// Entry on display plus every occurrence of the filter inside it.
    pub fn current(&self) -> (String, Vec<Span>) {
        let entry = match self.index {
            Some(i) => self.list[i].clone(),
            None => self.trail.clone(),
        };
        let spans = match_spans(&entry, &self.filter);
        (entry, spans)
    }
}

/// Non-overlapping occurrences of `needle` in `haystack`, in char offsets.
pub fn match_spans(haystack: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }
    let needle_chars = needle.chars().count();
    haystack
        .match_indices(needle)
        .map(|(byte, _)| {
            let start = haystack[..byte].chars().count();
            (start, start + needle_chars)
        })
        .collect()
}

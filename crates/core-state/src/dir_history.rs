//! Visited working directories with back/forward/jump navigation.
//!
//! The listing is a single line of numbered entries, oldest on the left.
//! Numbers count from the right edge of the visible window, so `[1]` is
//! always the newest visible entry. When the entries do not all fit beside
//! the prompt, only a window around the selected entry is listed.

use core_text::str_width;
use tracing::{debug, trace};

/// Blank cells between two listed entries.
pub const ENTRY_GAP: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub number: usize,
    pub path: String,
    pub selected: bool,
}

impl ListingEntry {
    /// `[n] path`
    pub fn label(&self) -> String {
        format!("[{}] {}", self.number, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct DirHistory {
    locations: Vec<String>,
    index: usize,
    max_len: usize,
    /// Visible window `[start, end)` of the listing.
    window: (usize, usize),
    width: usize,
    prompt_width: usize,
    pub shown: bool,
}

impl DirHistory {
    pub fn new(max_len: usize) -> Self {
        Self {
            locations: Vec::new(),
            index: 0,
            max_len: max_len.max(1),
            window: (0, 0),
            width: 80,
            prompt_width: 0,
            shown: false,
        }
    }

    /// Restore a saved history; the newest entry becomes current.
    pub fn from_lines(lines: Vec<String>, max_len: usize) -> Self {
        let mut d = Self::new(max_len);
        d.locations = lines.into_iter().filter(|l| !l.is_empty()).collect();
        d.truncate();
        d.index = d.locations.len().saturating_sub(1);
        d.window = (0, d.locations.len());
        d
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.locations.get(self.index).map(String::as_str)
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = usize::from(width);
    }

    fn truncate(&mut self) {
        if self.locations.len() > self.max_len {
            let excess = self.locations.len() - self.max_len;
            self.locations.drain(..excess);
            self.index = self.index.saturating_sub(excess);
            trace!(target: "dirhist", excess, "truncated");
        }
    }

    /// Record `path` as the newest entry. Re-visiting the newest entry only
    /// re-selects it; an older occurrence is moved to the end.
    pub fn visit(&mut self, path: &str) {
        if self.locations.last().map(String::as_str) != Some(path) {
            if let Some(pos) = self.locations.iter().position(|l| l == path) {
                self.locations.remove(pos);
            }
            self.locations.push(path.to_string());
            self.truncate();
            debug!(target: "dirhist", len = self.locations.len(), "visit");
        }
        self.index = self.locations.len().saturating_sub(1);
        self.window = (0, self.locations.len());
    }

    pub fn go_left(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            trace!(target: "dirhist", index = self.index, "left");
            true
        } else {
            false
        }
    }

    pub fn go_right(&mut self) -> bool {
        if self.index + 1 < self.locations.len() {
            self.index += 1;
            trace!(target: "dirhist", index = self.index, "right");
            true
        } else {
            false
        }
    }

    /// Select the entry listed as `[n]`. Out-of-range numbers do nothing.
    pub fn jump(&mut self, n: usize) -> bool {
        let (start, end) = self.visible_window();
        if n == 0 || n > end - start {
            return false;
        }
        let target = end - n;
        let changed = target != self.index;
        self.index = target;
        trace!(target: "dirhist", n, index = target, "jump");
        changed
    }

    /// Clamp the stored window to the current list.
    fn visible_window(&self) -> (usize, usize) {
        let len = self.locations.len();
        let end = self.window.1.min(len);
        let start = self.window.0.min(end);
        if start == end { (0, len) } else { (start, end) }
    }

    fn listing_width(&self, start: usize, end: usize) -> usize {
        (start..end)
            .map(|i| {
                let number = end - i;
                number.to_string().len() + 3 + str_width(&self.locations[i])
            })
            .sum::<usize>()
            + ENTRY_GAP * (end - start).saturating_sub(1)
    }

    /// Recompute the listing window for a prompt `prompt_width` cells wide.
    ///
    /// Returns `true` only when the listing is on screen and its window
    /// changed, i.e. it needs to be drawn again.
    pub fn check_overflow(&mut self, prompt_width: usize) -> bool {
        self.prompt_width = prompt_width;
        let len = self.locations.len();
        if len == 0 {
            self.window = (0, 0);
            return false;
        }
        let avail = self.width.saturating_sub(prompt_width).max(1);
        let sel = self.index.min(len - 1);

        // Newest entries first; slide left only if the selection falls off.
        let mut start = len;
        while start > 0 && self.listing_width(start - 1, len) <= avail {
            start -= 1;
        }
        let window = if start <= sel && start < len {
            (start, len)
        } else {
            let mut end = sel + 1;
            while end < len && self.listing_width(sel, end + 1) <= avail {
                end += 1;
            }
            (sel, end)
        };
        let changed = window != self.window;
        self.window = window;
        if changed {
            trace!(target: "dirhist", start = window.0, end = window.1, avail, "window");
        }
        self.shown && changed
    }

    /// Entries of the visible window; marks the listing as shown.
    pub fn display(&mut self) -> Vec<ListingEntry> {
        let (start, end) = self.visible_window();
        self.shown = true;
        (start..end)
            .map(|i| ListingEntry {
                number: end - i,
                path: self.locations[i].clone(),
                selected: i == self.index,
            })
            .collect()
    }

    /// The listing no longer reflects the screen.
    pub fn invalidate(&mut self) {
        self.shown = false;
    }
}

//! Line editor state: the edited line, selection, clipboard and undo.
//!
//! The line is kept split at the cursor (`before` / `after`); all offsets are
//! character offsets. Every edit goes through [`InputState::handle`] with one
//! [`Action`], which records an undo transaction whenever the text changed.
//!
//! The renderer compares [`InputState::rendered`] against the snapshot taken
//! by the last [`InputState::step`] to decide whether a repaint is needed.
//!
//! History navigation lives here too: the [`HistoryStore`] is owned by the
//! state for the whole process, while the line and undo stacks are reset for
//! every prompt by [`InputState::reset_line`].

pub mod dir_history;
pub mod expand;
pub mod history;
pub mod persist;
pub mod undo;

pub use dir_history::{DirHistory, ListingEntry};
pub use expand::{EnvExpander, Expander};
pub use history::{Direction, HistoryStore, Span, match_spans};
pub use persist::{PersistError, load_lines, load_or_warn, save_lines};
pub use undo::{Snapshot, UNDO_HISTORY_MAX, UndoEngine};

use core_text::{WordSeparators, byte_index, char_len, char_slice};
use tracing::trace;

/// Closed set of editing actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    LeftWord,
    RightWord,
    Home,
    End,
    Backspace,
    Delete,
    BackspaceWord,
    DeleteWord,
    KillEol,
    Insert(char),
    /// Replace everything before the cursor with the completed text.
    Complete(String),
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    UndoEmacs,
    Escape,
    Prev,
    Next,
    Expand,
}

impl Action {
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Action::Left
                | Action::Right
                | Action::LeftWord
                | Action::RightWord
                | Action::Home
                | Action::End
        )
    }

    /// Name for logs; never includes line contents.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::LeftWord => "left_word",
            Action::RightWord => "right_word",
            Action::Home => "home",
            Action::End => "end",
            Action::Backspace => "backspace",
            Action::Delete => "delete",
            Action::BackspaceWord => "backspace_word",
            Action::DeleteWord => "delete_word",
            Action::KillEol => "kill_eol",
            Action::Insert(_) => "insert",
            Action::Complete(_) => "complete",
            Action::Cut => "cut",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::UndoEmacs => "undo_emacs",
            Action::Escape => "escape",
            Action::Prev => "prev",
            Action::Next => "next",
            Action::Expand => "expand",
        }
    }
}

/// Everything the renderer draws for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub prompt: String,
    pub before: String,
    pub after: String,
    pub selection: (usize, usize),
    /// Filter matches to highlight instead of the selection.
    pub filter_spans: Option<Vec<Span>>,
}

impl Rendered {
    pub fn line(&self) -> String {
        format!("{}{}", self.before, self.after)
    }
}

pub struct InputState {
    before: String,
    after: String,
    anchor: Option<usize>,
    prompt: String,
    prev: Rendered,
    clipboard: String,
    pub history: HistoryStore,
    undo: UndoEngine,
    separators: WordSeparators,
    expander: Box<dyn Expander>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(WordSeparators::default(), Box::new(EnvExpander))
    }
}

impl InputState {
    pub fn new(separators: WordSeparators, expander: Box<dyn Expander>) -> Self {
        Self {
            before: String::new(),
            after: String::new(),
            anchor: None,
            prompt: String::new(),
            prev: Rendered::default(),
            clipboard: String::new(),
            history: HistoryStore::new(),
            undo: UndoEngine::new(),
            separators,
            expander,
        }
    }

    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn before_cursor(&self) -> &str {
        &self.before
    }

    pub fn after_cursor(&self) -> &str {
        &self.after
    }

    pub fn line(&self) -> String {
        format!("{}{}", self.before, self.after)
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        char_len(&self.before)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    /// Ordered `(start, end)`; empty at the cursor when nothing is selected.
    pub fn selection_range(&self) -> (usize, usize) {
        let cursor = self.cursor();
        match self.anchor {
            Some(a) => {
                let a = a.min(cursor + char_len(&self.after));
                (a.min(cursor), a.max(cursor))
            }
            None => (cursor, cursor),
        }
    }

    pub fn selection(&self) -> String {
        let (s, e) = self.selection_range();
        char_slice(&self.line(), s, e).to_string()
    }

    pub fn reset_selection(&mut self) {
        self.anchor = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.before.clone(), self.after.clone())
    }

    fn restore(&mut self, s: Snapshot) {
        self.before = s.before;
        self.after = s.after;
        self.anchor = None;
    }

    fn set_line(&mut self, line: &str, cursor: usize) {
        let b = byte_index(line, cursor);
        self.before = line[..b].to_string();
        self.after = line[b..].to_string();
    }

    fn move_to(&mut self, cursor: usize) {
        let line = self.line();
        self.set_line(&line, cursor.min(char_len(&line)));
    }

    fn extend(&mut self, select: bool) {
        if select {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor());
            }
        } else {
            self.anchor = None;
        }
    }

    /// Remove the selected text, if any.
    fn delete_selection(&mut self) -> bool {
        let (s, e) = self.selection_range();
        self.anchor = None;
        if s == e {
            return false;
        }
        let line = self.line();
        let len = char_len(&line);
        let kept = format!("{}{}", char_slice(&line, 0, s), char_slice(&line, e, len));
        self.set_line(&kept, s);
        true
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let line = self.line();
        let len = char_len(&line);
        let kept = format!("{}{}", char_slice(&line, 0, start), char_slice(&line, end, len));
        self.set_line(&kept, start);
    }

    fn chars(&self) -> Vec<char> {
        self.before.chars().chain(self.after.chars()).collect()
    }

    /// Apply one action. `select` extends the selection for motions.
    pub fn handle(&mut self, action: Action, select: bool) {
        trace!(target: "state", action = action.name(), select, "handle");
        if !matches!(action, Action::Prev | Action::Next | Action::Escape) {
            self.history.reset();
        }
        if action != Action::UndoEmacs {
            self.undo.break_emacs_chain();
        }
        let coalesce = match action {
            Action::Insert(c) => {
                !self.separators.is_separator(c) && self.anchor.is_none_or(|a| a == self.cursor())
            }
            _ => false,
        };
        if !coalesce {
            self.undo.break_run();
        }

        let is_motion = action.is_motion();
        let old = self.snapshot();
        let mut record = true;
        let cursor = self.cursor();
        match action {
            Action::Left => {
                self.extend(select);
                self.move_to(cursor.saturating_sub(1));
            }
            Action::Right => {
                self.extend(select);
                self.move_to(cursor + 1);
            }
            Action::LeftWord => {
                self.extend(select);
                let target = self.separators.word_left(&self.chars(), cursor);
                self.move_to(target);
            }
            Action::RightWord => {
                self.extend(select);
                let target = self.separators.word_right(&self.chars(), cursor);
                self.move_to(target);
            }
            Action::Home => {
                self.extend(select);
                self.move_to(0);
            }
            Action::End => {
                self.extend(select);
                self.move_to(usize::MAX);
            }
            Action::Backspace => {
                if !self.delete_selection() {
                    self.before.pop();
                }
            }
            Action::Delete => {
                if !self.delete_selection()
                    && let Some(c) = self.after.chars().next()
                {
                    self.after.drain(..c.len_utf8());
                }
            }
            Action::BackspaceWord => {
                if !self.delete_selection() {
                    let start = self.separators.word_left(&self.chars(), cursor);
                    self.delete_range(start, cursor);
                }
            }
            Action::DeleteWord => {
                if !self.delete_selection() {
                    let end = self.separators.word_right(&self.chars(), cursor);
                    self.delete_range(cursor, end);
                }
            }
            Action::KillEol => {
                if !self.after.is_empty() {
                    self.clipboard = std::mem::take(&mut self.after);
                }
            }
            Action::Insert(c) => {
                self.delete_selection();
                self.before.push(c);
            }
            Action::Complete(text) => {
                self.before = text;
            }
            Action::Cut => {
                let sel = self.selection();
                if !sel.is_empty() {
                    self.clipboard = sel;
                    self.delete_selection();
                }
            }
            Action::Copy => {
                let sel = self.selection();
                if !sel.is_empty() {
                    self.clipboard = sel;
                }
            }
            Action::Paste => {
                self.delete_selection();
                let clip = self.clipboard.clone();
                self.before.push_str(&clip);
            }
            Action::Undo => {
                record = false;
                if let Some(s) = self.undo.undo() {
                    self.restore(s);
                }
            }
            Action::Redo => {
                record = false;
                if let Some(s) = self.undo.redo() {
                    self.restore(s);
                }
            }
            Action::UndoEmacs => {
                record = false;
                if let Some(s) = self.undo.undo_emacs(&old) {
                    self.restore(s);
                }
            }
            Action::Escape => {
                if self.history.is_browsing() {
                    let trail = self.history.trail().to_string();
                    self.history.reset();
                    self.set_line(&trail, char_len(&trail));
                } else if self.anchor.is_some() && self.selection_range().0 != self.selection_range().1 {
                    record = false;
                } else {
                    self.before.clear();
                    self.after.clear();
                }
            }
            Action::Prev => self.navigate(Direction::Prev),
            Action::Next => self.navigate(Direction::Next),
            Action::Expand => {
                let start = expand::token_start(&self.before);
                let token = &self.before[start..];
                let expanded = self.expander.expand(token);
                if expanded != token {
                    self.before.truncate(start);
                    self.before.push_str(&expanded);
                }
            }
        }
        if !is_motion {
            self.anchor = None;
        }

        if record {
            let new = self.snapshot();
            if old.text() != new.text() {
                self.undo.record(old, new, coalesce);
            }
        }
    }

    fn navigate(&mut self, dir: Direction) {
        if !self.history.is_browsing() {
            let line = self.line();
            self.history.start(&line);
        }
        if self.history.navigate(dir) {
            let (entry, _) = self.history.current();
            self.set_line(&entry, char_len(&entry));
        }
    }

    /// What the screen should show now.
    pub fn rendered(&self) -> Rendered {
        let filter_spans = if self.history.is_filtering() {
            Some(self.history.current().1)
        } else {
            None
        };
        Rendered {
            prompt: self.prompt.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            selection: self.selection_range(),
            filter_spans,
        }
    }

    /// What the screen showed after the last [`step`](Self::step).
    pub fn prev(&self) -> &Rendered {
        &self.prev
    }

    pub fn changed(&self) -> bool {
        self.rendered() != self.prev
    }

    /// Remember the current state as what is on screen.
    pub fn step(&mut self) {
        self.prev = self.rendered();
    }

    /// Forget what is on screen, e.g. after output moved the cursor to a
    /// fresh row.
    pub fn reset_prev_line(&mut self) {
        self.prev = Rendered::default();
    }

    /// Start a new, empty line under `prompt`.
    pub fn reset_line(&mut self, prompt: impl Into<String>) {
        self.before.clear();
        self.after.clear();
        self.anchor = None;
        self.undo.clear();
        self.history.reset();
        self.prompt = prompt.into();
        self.prev = Rendered::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;
    impl Expander for Upper {
        fn expand(&self, token: &str) -> String {
            token.to_uppercase()
        }
    }

    fn state() -> InputState {
        InputState::new(WordSeparators::new(" /"), Box::new(Upper))
    }

    fn typed(text: &str) -> InputState {
        let mut s = state();
        for c in text.chars() {
            s.handle(Action::Insert(c), false);
        }
        s
    }

    #[test]
    fn insert_and_motion_keep_split() {
        let mut s = typed("hello");
        s.handle(Action::Left, false);
        s.handle(Action::Left, false);
        assert_eq!(s.before_cursor(), "hel");
        assert_eq!(s.after_cursor(), "lo");
        s.handle(Action::Home, false);
        assert_eq!(s.cursor(), 0);
        s.handle(Action::Left, false);
        assert_eq!(s.cursor(), 0);
        s.handle(Action::End, false);
        assert_eq!(s.cursor(), 5);
    }

    #[test]
    fn shift_motion_selects_and_typing_replaces() {
        let mut s = typed("abcd");
        s.handle(Action::Left, true);
        s.handle(Action::Left, true);
        assert_eq!(s.selection_range(), (2, 4));
        assert_eq!(s.selection(), "cd");
        s.handle(Action::Insert('X'), false);
        assert_eq!(s.line(), "abX");
        assert_eq!(s.selection_range(), (3, 3));
    }

    #[test]
    fn word_motion_and_deletion() {
        let mut s = typed("cd /usr/local");
        s.handle(Action::LeftWord, false);
        assert_eq!(s.cursor(), 8);
        s.handle(Action::BackspaceWord, false);
        assert_eq!(s.line(), "cd /local");
        s.handle(Action::Home, false);
        s.handle(Action::DeleteWord, false);
        assert_eq!(s.line(), " /local");
    }

    #[test]
    fn kill_eol_fills_clipboard_for_paste() {
        let mut s = typed("echo hi there");
        for _ in 0..6 {
            s.handle(Action::Left, false);
        }
        s.handle(Action::KillEol, false);
        assert_eq!(s.line(), "echo hi");
        assert_eq!(s.clipboard(), " there");
        s.handle(Action::Home, false);
        s.handle(Action::Paste, false);
        assert_eq!(s.line(), " thereecho hi");
    }

    #[test]
    fn cut_copy_collapse_selection() {
        let mut s = typed("abc");
        s.handle(Action::Home, true);
        s.handle(Action::Copy, false);
        assert_eq!(s.clipboard(), "abc");
        assert_eq!(s.selection(), "");
        s.handle(Action::Home, true);
        s.handle(Action::End, true);
        s.handle(Action::Cut, false);
        assert_eq!(s.line(), "");
        s.handle(Action::Paste, false);
        s.handle(Action::Paste, false);
        assert_eq!(s.line(), "abcabc");
    }

    #[test]
    fn inserts_coalesce_until_separator() {
        let mut s = typed("ls foo");
        assert_eq!(s.undo_depth(), 3);
        s.handle(Action::Undo, false);
        assert_eq!(s.line(), "ls ");
        s.handle(Action::Undo, false);
        assert_eq!(s.line(), "ls");
        s.handle(Action::Redo, false);
        assert_eq!(s.line(), "ls ");
    }

    #[test]
    fn undo_restores_cursor() {
        let mut s = typed("abc");
        s.handle(Action::Left, false);
        s.handle(Action::Backspace, false);
        assert_eq!(s.line(), "ac");
        s.handle(Action::Undo, false);
        assert_eq!(s.before_cursor(), "ab");
        assert_eq!(s.after_cursor(), "c");
    }

    #[test]
    fn emacs_undo_reverts_previous_undo_after_break() {
        let mut s = typed("ab");
        s.handle(Action::Insert(' '), false);
        s.handle(Action::UndoEmacs, false);
        assert_eq!(s.line(), "ab");
        s.handle(Action::UndoEmacs, false);
        assert_eq!(s.line(), "");
        s.handle(Action::Right, false);
        s.handle(Action::UndoEmacs, false);
        assert_eq!(s.line(), "ab");
    }

    #[test]
    fn escape_clears_selection_then_line() {
        let mut s = typed("abc");
        s.handle(Action::Left, true);
        s.handle(Action::Escape, false);
        assert_eq!(s.line(), "abc");
        assert_eq!(s.selection(), "");
        s.handle(Action::Escape, false);
        assert_eq!(s.line(), "");
        s.handle(Action::Undo, false);
        assert_eq!(s.line(), "abc");
    }

    #[test]
    fn history_filter_and_escape_restores_trail() {
        let mut s = state().with_history(HistoryStore::from_lines(vec![
            "git log".into(),
            "ls".into(),
            "git status".into(),
        ]));
        for c in "git".chars() {
            s.handle(Action::Insert(c), false);
        }
        s.handle(Action::Prev, false);
        assert_eq!(s.line(), "git status");
        assert_eq!(s.rendered().filter_spans, Some(vec![(0, 3)]));
        s.handle(Action::Prev, false);
        assert_eq!(s.line(), "git log");
        s.handle(Action::Escape, false);
        assert_eq!(s.line(), "git");
        assert!(!s.history.is_browsing());
    }

    #[test]
    fn editing_a_recalled_entry_leaves_history_mode() {
        let mut s = state().with_history(HistoryStore::from_lines(vec!["make".into()]));
        s.handle(Action::Prev, false);
        assert_eq!(s.line(), "make");
        s.handle(Action::Insert('!'), false);
        assert_eq!(s.line(), "make!");
        assert!(!s.history.is_browsing());
        assert_eq!(s.rendered().filter_spans, None);
    }

    #[test]
    fn expand_rewrites_last_token_only() {
        let mut s = typed("echo abc");
        s.handle(Action::Expand, false);
        assert_eq!(s.line(), "echo ABC");
    }

    #[test]
    fn complete_replaces_text_before_cursor() {
        let mut s = typed("cd rep tail");
        for _ in 0..5 {
            s.handle(Action::Left, false);
        }
        s.handle(Action::Complete("cd report/".into()), false);
        assert_eq!(s.line(), "cd report/ tail");
        assert_eq!(s.cursor(), 10);
    }

    #[test]
    fn step_tracks_changes() {
        let mut s = state();
        s.reset_line("> ");
        assert!(s.changed());
        s.step();
        assert!(!s.changed());
        s.handle(Action::Insert('x'), false);
        assert!(s.changed());
        s.step();
        s.handle(Action::Left, true);
        assert!(s.changed());
    }
}

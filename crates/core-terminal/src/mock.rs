//! Scripted in-memory driver for tests across the workspace.
//!
//! Keeps a character grid the size of the buffer so tests can assert on what
//! the screen shows, records every driver call in order, and replays a queue
//! of scripted events. Reading past the end of the script yields
//! `Event::Shutdown`.

use std::collections::VecDeque;

use anyhow::Result;
use core_events::{Event, KeyEvent};

use crate::{Attributes, TerminalDriver, Viewport, tracker::Advance, tracker::CursorTracker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOp {
    Write(String),
    SetAttributes(Attributes),
    MoveCursor(u16, u16),
    CursorVisible(bool),
    Title(String),
    Scroll(i32),
    Flash,
    Suspend,
    Resume,
}

#[derive(Debug)]
pub struct MockDriver {
    events: VecDeque<Event>,
    pub ops: Vec<DriverOp>,
    grid: Vec<Vec<char>>,
    cell_attrs: Vec<Vec<Attributes>>,
    tracker: CursorTracker,
    attrs: Attributes,
    viewport_rows: u16,
    pub focused: bool,
}

impl MockDriver {
    pub fn new(width: u16, height: u16) -> Self {
        let tracker = CursorTracker::new(width, height);
        let (w, h) = tracker.size();
        Self {
            events: VecDeque::new(),
            ops: Vec::new(),
            grid: vec![vec![' '; usize::from(w)]; usize::from(h)],
            cell_attrs: vec![vec![Attributes::DEFAULT; usize::from(w)]; usize::from(h)],
            tracker,
            attrs: Attributes::DEFAULT,
            viewport_rows: h,
            focused: true,
        }
    }

    /// Limit the reported viewport height (the buffer keeps its full size).
    pub fn with_viewport_rows(mut self, rows: u16) -> Self {
        self.viewport_rows = rows.max(1);
        self
    }

    pub fn push_event(&mut self, ev: Event) {
        self.events.push_back(ev);
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.events.push_back(Event::Key(key));
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        self.events.extend(keys.into_iter().map(Event::Key));
    }

    pub fn type_text(&mut self, text: &str) {
        self.push_keys(text.chars().map(KeyEvent::char));
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Text of one screen row with trailing blanks trimmed.
    pub fn row(&self, y: u16) -> String {
        self.grid
            .get(usize::from(y))
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// All non-empty rows, top to bottom.
    pub fn screen(&self) -> Vec<String> {
        (0..self.grid.len() as u16)
            .map(|y| self.row(y))
            .filter(|r| !r.is_empty())
            .collect()
    }

    /// Attributes the cell at `(x, y)` was last written with.
    pub fn attr_at(&self, x: u16, y: u16) -> Attributes {
        self.cell_attrs[usize::from(y)][usize::from(x)]
    }

    /// Concatenation of every `Write` op.
    pub fn written(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DriverOp::Write(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn scroll_grid(&mut self) {
        let w = self.grid[0].len();
        self.grid.remove(0);
        self.grid.push(vec![' '; w]);
        self.cell_attrs.remove(0);
        self.cell_attrs.push(vec![Attributes::DEFAULT; w]);
    }
}

impl TerminalDriver for MockDriver {
    fn read_event(&mut self) -> Result<Event> {
        Ok(self.events.pop_front().unwrap_or(Event::Shutdown))
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        self.ops.push(DriverOp::Write(s.to_string()));
        for c in s.chars() {
            let mut scrolled = 0;
            match self.tracker.advance(c, &mut scrolled) {
                Advance::Cell(x, y) => {
                    // Placed before any wrap-induced scroll.
                    let y = usize::from(y);
                    self.grid[y][usize::from(x)] = c;
                    self.cell_attrs[y][usize::from(x)] = self.attrs;
                    for _ in 0..scrolled {
                        self.scroll_grid();
                    }
                }
                Advance::Moved => {}
                Advance::Scrolled => {
                    for _ in 0..scrolled {
                        self.scroll_grid();
                    }
                }
            }
        }
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        self.attrs
    }

    fn set_attributes(&mut self, attr: Attributes) -> Result<()> {
        self.ops.push(DriverOp::SetAttributes(attr));
        self.attrs = attr;
        Ok(())
    }

    fn cursor(&mut self) -> Result<(u16, u16)> {
        Ok(self.tracker.position())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.ops.push(DriverOp::MoveCursor(x, y));
        self.tracker.move_to(x, y);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.ops.push(DriverOp::CursorVisible(visible));
        Ok(())
    }

    fn buffer_size(&mut self) -> Result<(u16, u16)> {
        Ok(self.tracker.size())
    }

    fn viewport(&mut self) -> Result<Viewport> {
        let (w, _) = self.tracker.size();
        Ok(Viewport {
            left: 0,
            top: 0,
            right: w.saturating_sub(1),
            bottom: self.viewport_rows.saturating_sub(1),
        })
    }

    fn scroll_viewport(&mut self, lines: i32) -> Result<()> {
        self.ops.push(DriverOp::Scroll(lines));
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.ops.push(DriverOp::Title(title.to_string()));
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn flash(&mut self) -> Result<()> {
        self.ops.push(DriverOp::Flash);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        self.ops.push(DriverOp::Suspend);
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.ops.push(DriverOp::Resume);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_on_grid_and_wrap() {
        let mut d = MockDriver::new(5, 3);
        d.write_str("hello world").unwrap();
        assert_eq!(d.row(0), "hello");
        assert_eq!(d.row(1), " worl");
        assert_eq!(d.row(2), "d");
        assert_eq!(d.cursor().unwrap(), (1, 2));
    }

    #[test]
    fn newline_on_last_row_scrolls() {
        let mut d = MockDriver::new(10, 2);
        d.write_str("one\ntwo\nthree").unwrap();
        assert_eq!(d.screen(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn script_exhaustion_reports_shutdown() {
        let mut d = MockDriver::new(10, 2);
        d.push_key(KeyEvent::char('a'));
        assert_eq!(d.read_event().unwrap(), Event::Key(KeyEvent::char('a')));
        assert_eq!(d.read_event().unwrap(), Event::Shutdown);
    }
}

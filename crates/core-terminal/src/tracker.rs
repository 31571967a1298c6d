//! Software cursor tracking.
//!
//! Querying the cursor over a VT terminal round-trips through stdin, which
//! the input pump is reading concurrently. Drivers instead replay their own
//! output through a `CursorTracker`: printable characters advance the column
//! and wrap at the buffer width, `\r` returns to column 0, `\n` starts a new
//! row and the bottom row scrolls in place.

use core_text::char_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorTracker {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

/// What happened to the screen while advancing over one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Character placed at the given cell.
    Cell(u16, u16),
    /// Cursor moved without drawing.
    Moved,
    /// Cursor was on the last row and a new row scrolled in.
    Scrolled,
}

impl CursorTracker {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.clamp();
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.x = self.x.min(self.width - 1);
        self.y = self.y.min(self.height - 1);
    }

    fn new_row(&mut self) -> Advance {
        self.x = 0;
        if self.y + 1 >= self.height {
            Advance::Scrolled
        } else {
            self.y += 1;
            Advance::Moved
        }
    }

    /// Advance over one character, reporting where it landed.
    pub fn advance(&mut self, c: char, scrolled: &mut u32) -> Advance {
        match c {
            '\r' => {
                self.x = 0;
                Advance::Moved
            }
            '\n' => {
                let adv = self.new_row();
                if adv == Advance::Scrolled {
                    *scrolled += 1;
                }
                adv
            }
            _ => {
                let w = char_width(c) as u16;
                if w == 0 {
                    return Advance::Moved;
                }
                if self.x + w > self.width && self.new_row() == Advance::Scrolled {
                    *scrolled += 1;
                }
                let cell = (self.x, self.y);
                self.x += w;
                if self.x >= self.width && self.new_row() == Advance::Scrolled {
                    *scrolled += 1;
                }
                Advance::Cell(cell.0, cell.1)
            }
        }
    }

    /// Advance over a whole string; returns rows scrolled.
    pub fn advance_str(&mut self, s: &str) -> u32 {
        let mut scrolled = 0;
        for c in s.chars() {
            self.advance(c, &mut scrolled);
        }
        scrolled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_width_and_scrolls_at_bottom() {
        let mut t = CursorTracker::new(4, 2);
        assert_eq!(t.advance_str("abcd"), 0);
        assert_eq!(t.position(), (0, 1));
        assert_eq!(t.advance_str("ef\n"), 1);
        assert_eq!(t.position(), (0, 1));
    }

    #[test]
    fn carriage_return_resets_column() {
        let mut t = CursorTracker::new(10, 3);
        t.advance_str("hello\r");
        assert_eq!(t.position(), (0, 0));
    }
}

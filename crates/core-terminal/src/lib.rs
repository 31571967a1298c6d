//! Terminal driver abstraction and crossterm implementation.
//!
//! The line editor consumes the terminal exclusively through
//! [`TerminalDriver`]: blocking key reads, plain text writes under an opaque
//! attribute word, cursor placement and geometry queries. Writes never carry
//! color tokens; those are resolved by the color output stream upstream.

use anyhow::Result;
use core_events::Event;

pub mod attr;
pub mod capabilities;
pub mod crossterm_driver;
pub mod mock;
pub mod tracker;

pub use attr::{Attributes, ColorOp, ColorToken, Component, TOKEN_MARKER, Target};
pub use capabilities::TerminalCapabilities;
pub use crossterm_driver::CrosstermDriver;
pub use tracker::CursorTracker;

/// Visible region of the terminal buffer, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Viewport {
    pub fn height(&self) -> u16 {
        self.bottom.saturating_sub(self.top)
    }
    pub fn width(&self) -> u16 {
        self.right.saturating_sub(self.left) + 1
    }
}

pub trait TerminalDriver {
    /// Block until the next key-down (or resize) event.
    fn read_event(&mut self) -> Result<Event>;
    /// Write plain text under the current attributes.
    fn write_str(&mut self, s: &str) -> Result<()>;
    fn attributes(&self) -> Attributes;
    fn set_attributes(&mut self, attr: Attributes) -> Result<()>;
    fn cursor(&mut self) -> Result<(u16, u16)>;
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;
    /// `(columns, rows)` of the whole buffer.
    fn buffer_size(&mut self) -> Result<(u16, u16)>;
    fn viewport(&mut self) -> Result<Viewport>;
    /// Scroll the visible window by `lines` (negative = up).
    fn scroll_viewport(&mut self, lines: i32) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn is_focused(&self) -> bool;
    /// Request user attention (bell / taskbar flash).
    fn flash(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Hand the terminal to a child process.
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }
    /// Take the terminal back after a child process exits.
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    /// Move the cursor back `count` cells, wrapping to previous rows.
    fn cursor_backward(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let (x, y) = self.cursor()?;
        let (w, _) = self.buffer_size()?;
        let w = usize::from(w.max(1));
        let linear = usize::from(y) * w + usize::from(x);
        let target = linear.saturating_sub(count);
        self.move_cursor((target % w) as u16, (target / w) as u16)
    }
}

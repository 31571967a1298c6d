//! crossterm-backed [`TerminalDriver`].
//!
//! Raw mode is entered through an RAII guard so the terminal is restored even
//! when the caller early-returns or panics. Input arrives through the shared
//! [`EventQueue`], filled by the `core-input` pump thread.

use std::io::{Stdout, Write, stdout};
use std::sync::Arc;

use anyhow::Result;
use core_events::{Event, EventQueue, InputFlags};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableFocusChange, EnableFocusChange},
    execute, queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{SetTitle, disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, trace};

use crate::{
    Attributes, TerminalCapabilities, TerminalDriver, Target, Viewport, tracker::CursorTracker,
};

pub struct CrosstermDriver {
    out: Stdout,
    queue: EventQueue,
    flags: Arc<InputFlags>,
    caps: TerminalCapabilities,
    attrs: Attributes,
    tracker: CursorTracker,
    entered: bool,
}

impl CrosstermDriver {
    /// Build a driver reading from `queue`. The initial cursor position is
    /// queried once, before the input pump starts competing for stdin.
    pub fn new(queue: EventQueue, flags: Arc<InputFlags>) -> Result<Self> {
        let (w, h) = crossterm::terminal::size()?;
        let mut tracker = CursorTracker::new(w, h);
        if let Ok((x, y)) = crossterm::cursor::position() {
            tracker.move_to(x, y);
        }
        Ok(Self {
            out: stdout(),
            queue,
            flags,
            caps: TerminalCapabilities::detect(),
            attrs: Attributes::DEFAULT,
            tracker,
            entered: false,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            if self.caps.focus_reporting {
                execute!(self.out, EnableFocusChange)?;
            }
            self.entered = true;
        }
        Ok(())
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.caps.focus_reporting {
                execute!(self.out, DisableFocusChange)?;
            }
            execute!(
                self.out,
                SetForegroundColor(Color::Reset),
                SetBackgroundColor(Color::Reset),
                Show
            )?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }
}

fn to_color(attr: Attributes, target: Target) -> Color {
    if attr.is_default(target) {
        return Color::Reset;
    }
    let [r, g, b, bright] = attr.components(target);
    match (r, g, b, bright) {
        (false, false, false, false) => Color::Black,
        (true, false, false, false) => Color::DarkRed,
        (false, true, false, false) => Color::DarkGreen,
        (true, true, false, false) => Color::DarkYellow,
        (false, false, true, false) => Color::DarkBlue,
        (true, false, true, false) => Color::DarkMagenta,
        (false, true, true, false) => Color::DarkCyan,
        (true, true, true, false) => Color::Grey,
        (false, false, false, true) => Color::DarkGrey,
        (true, false, false, true) => Color::Red,
        (false, true, false, true) => Color::Green,
        (true, true, false, true) => Color::Yellow,
        (false, false, true, true) => Color::Blue,
        (true, false, true, true) => Color::Magenta,
        (false, true, true, true) => Color::Cyan,
        (true, true, true, true) => Color::White,
    }
}

impl TerminalDriver for CrosstermDriver {
    fn read_event(&mut self) -> Result<Event> {
        self.flush()?;
        let ev = self.queue.next_key_down()?;
        if let Event::Resize(w, h) = ev {
            trace!(target: "terminal", w, h, "resize");
            self.tracker.resize(w, h);
        }
        Ok(ev)
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        // Raw mode disables output post-processing; restore CR on newline.
        let text = if self.entered && s.contains('\n') {
            s.replace("\r\n", "\n").replace('\n', "\r\n")
        } else {
            s.to_string()
        };
        self.tracker.advance_str(&text);
        queue!(self.out, Print(text))?;
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        self.attrs
    }

    fn set_attributes(&mut self, attr: Attributes) -> Result<()> {
        if attr != self.attrs {
            queue!(
                self.out,
                SetForegroundColor(to_color(attr, Target::Foreground)),
                SetBackgroundColor(to_color(attr, Target::Background))
            )?;
            self.attrs = attr;
        }
        Ok(())
    }

    fn cursor(&mut self) -> Result<(u16, u16)> {
        Ok(self.tracker.position())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.tracker.move_to(x, y);
        let (x, y) = self.tracker.position();
        queue!(self.out, MoveTo(x, y))?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(self.out, Show)?;
        } else {
            queue!(self.out, Hide)?;
        }
        Ok(())
    }

    fn buffer_size(&mut self) -> Result<(u16, u16)> {
        Ok(self.tracker.size())
    }

    fn viewport(&mut self) -> Result<Viewport> {
        let (w, h) = self.tracker.size();
        Ok(Viewport {
            left: 0,
            top: 0,
            right: w.saturating_sub(1),
            bottom: h.saturating_sub(1),
        })
    }

    fn scroll_viewport(&mut self, lines: i32) -> Result<()> {
        if !self.caps.viewport_scroll {
            debug!(target: "terminal", lines, "viewport_scroll_unsupported");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        queue!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.flags.is_focused()
    }

    fn flash(&mut self) -> Result<()> {
        queue!(self.out, Print('\u{7}'))?;
        self.out.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        self.flags.set_paused(true);
        self.leave()
    }

    fn resume(&mut self) -> Result<()> {
        self.enter()?;
        // The child may have printed anything; re-sync the software cursor.
        if let Ok((w, h)) = crossterm::terminal::size() {
            self.tracker.resize(w, h);
        }
        if let Ok((x, y)) = crossterm::cursor::position() {
            self.tracker.move_to(x, y);
        }
        // Drop keys typed while the child was running.
        while self.queue.try_recv().is_some() {}
        self.flags.set_paused(false);
        Ok(())
    }
}

impl Drop for CrosstermDriver {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

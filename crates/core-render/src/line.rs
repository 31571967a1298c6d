//! Repaint of the edited line.
//!
//! The cursor is assumed to sit where the previous repaint left it: after
//! the previous prompt and the text before the cursor. A repaint walks back
//! to the start of the line, rewrites prompt and line, blanks whatever the
//! previous (longer) line left behind and finally walks back to the new
//! cursor position.

use anyhow::Result;
use core_state::{DirHistory, Rendered};
use core_terminal::TerminalDriver;
use core_text::{char_len, char_slice, str_width};
use tracing::trace;

use crate::Palette;
use crate::lexer::strip_color_tokens;
use crate::stream::ColorOutputStream;

/// The line body with selection or filter matches colored.
pub fn colored_line(cur: &Rendered, palette: &Palette) -> String {
    let line = cur.line();
    let len = char_len(&line);
    let mut out = String::with_capacity(line.len() + 64);
    match &cur.filter_spans {
        None => {
            let (s, e) = cur.selection;
            out.push_str(char_slice(&line, 0, s));
            if s < e {
                out.push_str(&palette.selection);
                out.push_str(char_slice(&line, s, e));
                out.push_str(&palette.text);
            }
            out.push_str(char_slice(&line, e, len));
        }
        Some(spans) => {
            let mut pos = 0;
            for &(s, e) in spans {
                out.push_str(&palette.text);
                out.push_str(char_slice(&line, pos, s));
                out.push_str(&palette.search_filter);
                out.push_str(char_slice(&line, s, e));
                pos = e;
            }
            out.push_str(&palette.text);
            out.push_str(char_slice(&line, pos, len));
        }
    }
    out
}

/// Columns taken by a prompt, ignoring its color tokens.
pub fn prompt_width(prompt: &str) -> usize {
    str_width(&strip_color_tokens(prompt))
}

pub fn repaint<D: TerminalDriver + ?Sized>(
    driver: &mut D,
    prev: &Rendered,
    cur: &Rendered,
    palette: &Palette,
    dir_hist: &mut DirHistory,
) -> Result<()> {
    let prev_head = prompt_width(&prev.prompt) + str_width(&prev.before);
    let prev_total = prev_head + str_width(&prev.after);
    driver.set_cursor_visible(false)?;
    driver.cursor_backward(prev_head)?;
    driver.write_str("\r")?;

    // Only acted upon while the listing is on screen.
    let head = prompt_width(&cur.prompt);
    let (width, _) = driver.buffer_size()?;
    dir_hist.set_width(width);
    dir_hist.check_overflow(head);

    let mut out = ColorOutputStream::new(&mut *driver);
    out.write(&format!(
        "{}{}{}{}",
        palette.prompt,
        cur.prompt,
        palette.text,
        colored_line(cur, palette)
    ))?;
    let total = head + str_width(&cur.before) + str_width(&cur.after);
    if prev_total > total {
        let stale = prev_total - total;
        out.write(&format!("{}{}", palette.reset, " ".repeat(stale)))?;
        out.driver().cursor_backward(stale)?;
    }
    driver.set_cursor_visible(true)?;
    driver.cursor_backward(str_width(&cur.after))?;
    trace!(target: "render", prev_total, total, "repaint");
    Ok(())
}

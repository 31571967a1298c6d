//! Multi-line output above or below the edited line: the suggestion grid,
//! the directory listing and the pagination question.

use anyhow::Result;
use core_complete::{Highlight, Layout, Span};
use core_state::ListingEntry;
use core_state::dir_history::ENTRY_GAP;
use core_terminal::TerminalDriver;
use core_text::{char_len, char_slice, str_width};
use tracing::debug;

use crate::Palette;
use crate::stream::ColorOutputStream;

fn prefix_cell(s: &str, shared: usize, palette: &Palette) -> String {
    let len = char_len(s);
    let shared = shared.min(len);
    format!(
        "{}{}{}{}",
        palette.completion_match,
        char_slice(s, 0, shared),
        palette.reset,
        char_slice(s, shared, len)
    )
}

/// Literal pattern text in the match color, wildcard-matched parts plain.
fn wildcard_cell(s: &str, spans: &[Span], palette: &Palette) -> String {
    let len = char_len(s);
    let mut out = String::new();
    let mut pos = 0;
    for &(start, end) in spans {
        out.push_str(&palette.completion_match);
        out.push_str(char_slice(s, pos, start));
        out.push_str(&palette.reset);
        out.push_str(char_slice(s, start, end));
        pos = end;
    }
    out.push_str(&palette.completion_match);
    out.push_str(char_slice(s, pos, len));
    out.push_str(&palette.reset);
    out
}

/// Print `suggestions` column-major below the current line. The cursor ends
/// at the start of the row after the grid.
pub fn write_suggestions<D: TerminalDriver + ?Sized>(
    driver: &mut D,
    suggestions: &[String],
    highlight: &Highlight,
    layout: &Layout,
    palette: &Palette,
) -> Result<()> {
    let mut out = ColorOutputStream::new(driver);
    out.write(&format!("{}\n", palette.reset))?;
    for row in layout.grid(suggestions.len()) {
        let mut line = String::from("\r");
        for i in row {
            let s = &suggestions[i];
            let cell = match highlight {
                Highlight::CommonPrefix(n) => prefix_cell(s, *n, palette),
                Highlight::Wildcard(spans) => {
                    wildcard_cell(s, spans.get(i).map(Vec::as_slice).unwrap_or(&[]), palette)
                }
            };
            line.push_str(&cell);
            line.push_str(&palette.reset);
            line.push_str(&" ".repeat(layout.column_width.saturating_sub(str_width(s))));
        }
        line.push('\n');
        out.write(&line)?;
    }
    debug!(
        target: "render",
        count = suggestions.len(),
        rows = layout.rows,
        columns = layout.columns,
        "suggestions"
    );
    Ok(())
}

/// Draw the directory listing on its own row.
///
/// `head` is how far the cursor sits from the start of the edited line.
/// With `replace` the listing overwrites the row above the line (where an
/// earlier listing was drawn); otherwise it takes over the line's row. The
/// cursor ends on the row below the listing, after `restore`, which should
/// be the previously drawn prompt so the next repaint finds the cursor
/// where it expects it.
pub fn write_dir_listing<D: TerminalDriver + ?Sized>(
    driver: &mut D,
    entries: &[ListingEntry],
    palette: &Palette,
    head: usize,
    replace: bool,
    restore: &str,
) -> Result<()> {
    driver.cursor_backward(head)?;
    if replace {
        let (_, y) = driver.cursor()?;
        driver.move_cursor(0, y.saturating_sub(1))?;
    }
    let (width, _) = driver.buffer_size()?;
    let blank = " ".repeat(usize::from(width).saturating_sub(1));
    let gap = " ".repeat(ENTRY_GAP);

    let mut line = format!("\r{}{blank}\r", palette.reset);
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            line.push_str(&gap);
        }
        line.push_str(if entry.selected {
            &palette.dir_history_selected
        } else {
            &palette.dir_history
        });
        line.push_str(&entry.label());
        line.push_str(&palette.reset);
    }
    line.push('\n');
    line.push_str(restore);

    let mut out = ColorOutputStream::new(driver);
    out.write(&line)?;
    debug!(target: "render", entries = entries.len(), replace, "dir_listing");
    Ok(())
}

/// Where the pagination question was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmAnchor {
    x: u16,
    y: u16,
    width: usize,
}

/// Ask `message` on the row below the cursor.
pub fn show_confirm<D: TerminalDriver + ?Sized>(
    driver: &mut D,
    message: &str,
) -> Result<ConfirmAnchor> {
    let (x, y) = driver.cursor()?;
    driver.write_str(&format!("\n{message}"))?;
    // At the bottom row the newline scrolls the line up by one.
    let (_, after) = driver.cursor()?;
    let scrolled = (y + 1).saturating_sub(after);
    Ok(ConfirmAnchor {
        x,
        y: y.saturating_sub(scrolled),
        width: str_width(message),
    })
}

/// Erase the question and put the cursor back where it was asked.
pub fn clear_confirm<D: TerminalDriver + ?Sized>(
    driver: &mut D,
    anchor: ConfirmAnchor,
) -> Result<()> {
    driver.move_cursor(anchor.x, anchor.y)?;
    driver.write_str(&format!("\n{}", " ".repeat(anchor.width)))?;
    driver.move_cursor(anchor.x, anchor.y)
}

//! Terminal column width of line text.
//!
//! Every display-width decision in the renderer and the directory listing
//! goes through these two functions so wide characters are measured the same
//! way everywhere. Control characters count as zero columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[inline]
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

#[inline]
pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_wide_widths() {
        assert_eq!(str_width("abc"), 3);
        assert_eq!(char_width('日'), 2);
        assert_eq!(str_width("日本"), 4);
        assert_eq!(char_width('\u{7}'), 0);
    }
}

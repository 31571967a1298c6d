//! Word-boundary scanning.
//!
//! A word is a maximal run of characters outside the separator set. Moving by
//! word first skips separators adjacent to the cursor, then the word run
//! beyond them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSeparators {
    chars: Vec<char>,
}

impl Default for WordSeparators {
    fn default() -> Self {
        Self::new(" \t")
    }
}

impl WordSeparators {
    pub fn new(set: &str) -> Self {
        let mut chars: Vec<char> = set.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    #[inline]
    pub fn is_separator(&self, c: char) -> bool {
        self.chars.binary_search(&c).is_ok()
    }

    /// Offset of the word start reached by moving left from `cursor`.
    pub fn word_left(&self, line: &[char], cursor: usize) -> usize {
        let mut i = cursor.min(line.len());
        while i > 0 && self.is_separator(line[i - 1]) {
            i -= 1;
        }
        while i > 0 && !self.is_separator(line[i - 1]) {
            i -= 1;
        }
        i
    }

    /// Offset just past the word reached by moving right from `cursor`.
    pub fn word_right(&self, line: &[char], cursor: usize) -> usize {
        let len = line.len();
        let mut i = cursor.min(len);
        while i < len && self.is_separator(line[i]) {
            i += 1;
        }
        while i < len && !self.is_separator(line[i]) {
            i += 1;
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn word_left_skips_adjacent_separators_first() {
        let seps = WordSeparators::new(" /");
        let line = chars("cd /usr/local  ");
        assert_eq!(seps.word_left(&line, line.len()), 8);
        assert_eq!(seps.word_left(&line, 8), 4);
        assert_eq!(seps.word_left(&line, 4), 0);
        assert_eq!(seps.word_left(&line, 0), 0);
    }

    #[test]
    fn word_right_stops_after_word_run() {
        let seps = WordSeparators::new(" /");
        let line = chars("cd /usr/local");
        assert_eq!(seps.word_right(&line, 0), 2);
        assert_eq!(seps.word_right(&line, 2), 7);
        assert_eq!(seps.word_right(&line, 7), 13);
        assert_eq!(seps.word_right(&line, 13), 13);
    }

    #[test]
    fn all_separator_line_moves_to_edge() {
        let seps = WordSeparators::default();
        let line = chars("   ");
        assert_eq!(seps.word_left(&line, 3), 0);
        assert_eq!(seps.word_right(&line, 0), 3);
    }

    proptest! {
        #[test]
        fn word_motion_stays_in_bounds(s in "[a-c /]{0,20}", cur in 0usize..25) {
            let seps = WordSeparators::new(" /");
            let line = chars(&s);
            let l = seps.word_left(&line, cur);
            let r = seps.word_right(&line, cur);
            prop_assert!(l <= cur.min(line.len()));
            prop_assert!(r >= cur.min(line.len()));
            prop_assert!(r <= line.len());
        }
    }
}

//! Column layout and pagination of a suggestion list.
//!
//! Suggestions are printed column-major: the first column holds the first
//! `rows` entries, the second the next `rows`, and so on.

use core_text::str_width;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Blank cells added to the longest suggestion to get the column width.
    pub column_padding: usize,
    /// More than `viewport_height / multi_column_divisor` suggestions are
    /// printed in several columns.
    pub multi_column_divisor: usize,
    /// Ask before printing at least this many screens.
    pub confirm_screens: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            column_padding: 10,
            multi_column_divisor: 4,
            confirm_screens: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub column_width: usize,
    pub columns: usize,
    pub rows: usize,
    /// Printed height relative to the viewport height.
    pub screens: f32,
}

impl Layout {
    pub fn compute(
        suggestions: &[String],
        buffer_width: u16,
        viewport_height: u16,
        params: &LayoutParams,
    ) -> Self {
        let count = suggestions.len();
        let usable = usize::from(buffer_width).saturating_sub(1).max(1);
        let longest = suggestions.iter().map(|s| str_width(s)).max().unwrap_or(0);
        let column_width = (longest + params.column_padding).clamp(1, usable);
        let height = usize::from(viewport_height).max(1);
        let columns = if count > height / params.multi_column_divisor.max(1) {
            (usable / column_width).max(1)
        } else {
            1
        };
        let rows = count.div_ceil(columns);
        Self {
            column_width,
            columns,
            rows,
            screens: rows as f32 / height as f32,
        }
    }

    pub fn needs_confirm(&self, params: &LayoutParams) -> bool {
        self.screens >= params.confirm_screens
    }

    pub fn confirm_message(&self) -> String {
        format!(" Scroll {} screens? [Tab] ", self.screens.round() as usize)
    }

    /// Suggestion indices of each printed row, left to right.
    pub fn grid(&self, count: usize) -> Vec<Vec<usize>> {
        (0..self.rows)
            .map(|row| {
                (0..self.columns)
                    .map(|col| row + col * self.rows)
                    .filter(|&i| i < count)
                    .collect()
            })
            .collect()
    }
}

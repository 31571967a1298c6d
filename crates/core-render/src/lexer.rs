//! Splits text into literal runs and embedded color tokens.
//!
//! A token is [`TOKEN_MARKER`] followed by three units from the token
//! alphabet. A marker that does not open a well-formed token (wrong unit or
//! truncated text) is kept as literal text.

use core_terminal::{ColorToken, TOKEN_MARKER};

/// Bytes in one encoded token: the one-byte marker plus three ASCII units.
const TOKEN_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Color(ColorToken),
}

pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

fn token_at(s: &str) -> Option<ColorToken> {
    let mut units = s.chars();
    if units.next()? != TOKEN_MARKER {
        return None;
    }
    ColorToken::from_units(units.next()?, units.next()?, units.next()?)
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;
        if let Some(token) = token_at(rest) {
            self.pos += TOKEN_BYTES;
            return Some(Segment::Color(token));
        }
        let mut end = first.len_utf8();
        loop {
            match rest[end..].find(TOKEN_MARKER) {
                None => {
                    end = rest.len();
                    break;
                }
                Some(i) => {
                    let at = end + i;
                    if token_at(&rest[at..]).is_some() {
                        end = at;
                        break;
                    }
                    end = at + TOKEN_MARKER.len_utf8();
                }
            }
        }
        self.pos += end;
        Some(Segment::Literal(&rest[..end]))
    }
}

/// `text` without any well-formed color tokens.
pub fn strip_color_tokens(text: &str) -> String {
    Lexer::new(text)
        .filter_map(|s| match s {
            Segment::Literal(l) => Some(l),
            Segment::Color(_) => None,
        })
        .collect()
}

//! Pluggable expansion applied to the token before the cursor.

use core_text::expand_vars;

pub trait Expander {
    /// Expand one token. Returning the token unchanged means nothing to do.
    fn expand(&self, token: &str) -> String;
}

/// Expands `~` and environment references from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvExpander;

impl Expander for EnvExpander {
    fn expand(&self, token: &str) -> String {
        let home = dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
        expand_vars(token, |name| std::env::var(name).ok(), home.as_deref())
    }
}

/// Byte offset where the last whitespace-delimited token of `before` starts.
/// Whitespace inside double quotes does not split.
pub fn token_start(before: &str) -> usize {
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in before.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => start = i + c.len_utf8(),
            _ => {}
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_start_respects_quotes() {
        assert_eq!(token_start("ls -l foo"), 6);
        assert_eq!(token_start("cd \"My Documents"), 3);
        assert_eq!(token_start("echo "), 5);
        assert_eq!(token_start(""), 0);
    }
}

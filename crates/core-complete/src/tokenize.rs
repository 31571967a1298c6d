//! Quote-aware splitting of a command line.

/// Characters that end a token outside double quotes.
pub const SEPARATORS: &[char] = &[' ', '\t', '|', '&', '<', '>', ';'];

const OPERATORS: &[char] = &['|', '&', '<', '>', ';'];

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Split `line` into tokens. Whitespace is dropped, runs of shell operator
/// characters become tokens of their own and quotes stay in place.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_operator = false;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        let operator = !in_quotes && OPERATORS.contains(&c);
        let blank = !in_quotes && c.is_whitespace();
        if (blank || operator != in_operator) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        in_operator = operator;
        if !blank {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Byte offset and text of the token that ends `before`. Empty when
/// `before` ends in a separator.
pub fn last_token(before: &str) -> (usize, &str) {
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in before.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && is_separator(c) {
            start = i + c.len_utf8();
        }
    }
    (start, &before[start..])
}

pub fn has_wildcards(token: &str) -> bool {
    token.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_quotes_and_splits_operators() {
        assert_eq!(
            parse_line(r#"cd "My Docs"&&dir>out.txt"#),
            vec![r#"cd"#, r#""My Docs""#, "&&", "dir", ">", "out.txt"]
        );
        assert!(parse_line("   ").is_empty());
    }

    #[test]
    fn last_token_respects_quotes_and_separators() {
        assert_eq!(last_token("ls foo"), (3, "foo"));
        assert_eq!(last_token("type a|more"), (7, "more"));
        assert_eq!(last_token(r#"cd "a b"#), (3, r#""a b"#));
        assert_eq!(last_token("echo "), (5, ""));
        assert_eq!(last_token(""), (0, ""));
    }
}

//! `~`, `$NAME`, `${NAME}` and `%NAME%` expansion.
//!
//! Lookups go through a caller-supplied function so the rules can be tested
//! without touching the process environment. Undefined references are left
//! exactly as written.

/// Expand variable references and a leading `~` in `text`.
pub fn expand_vars<F>(text: &str, lookup: F, home: Option<&str>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    if let Some(home) = home
        && let Some(tail) = rest.strip_prefix('~')
        && (tail.is_empty() || tail.starts_with('/') || tail.starts_with('\\'))
    {
        out.push_str(home);
        rest = tail;
    }

    while let Some(pos) = rest.find(['$', '%']) {
        out.push_str(&rest[..pos]);
        let marker = &rest[pos..];
        match expand_one(marker, &lookup) {
            Some((value, used)) => {
                out.push_str(&value);
                rest = &marker[used..];
            }
            None => {
                out.push_str(&marker[..1]);
                rest = &marker[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Expand the reference at the start of `s`; returns the value and the
/// number of bytes consumed.
fn expand_one<F>(s: &str, lookup: &F) -> Option<(String, usize)>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(body) = s.strip_prefix("${") {
        let close = body.find('}')?;
        let name = &body[..close];
        if !is_name(name) {
            return None;
        }
        return lookup(name).map(|v| (v, close + 3));
    }
    if let Some(body) = s.strip_prefix('$') {
        let len = name_len(body);
        if len == 0 {
            return None;
        }
        return lookup(&body[..len]).map(|v| (v, len + 1));
    }
    let body = s.strip_prefix('%')?;
    let close = body.find('%')?;
    let name = &body[..close];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    lookup(name).map(|v| (v, close + 2))
}

/// Length in bytes of the identifier at the start of `s`.
pub fn name_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(*c == '_' || c.is_ascii_alphanumeric()))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && name_len(s) == s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/u".into()),
            "Path" => Some("/bin".into()),
            "X" => Some("1".into()),
            _ => None,
        }
    }

    #[test]
    fn expands_all_reference_forms() {
        assert_eq!(expand_vars("$HOME/x", env, None), "/home/u/x");
        assert_eq!(expand_vars("${X}y", env, None), "1y");
        assert_eq!(expand_vars("%Path%;%X%", env, None), "/bin;1");
    }

    #[test]
    fn tilde_only_at_start_of_path() {
        assert_eq!(expand_vars("~/src", env, Some("/h")), "/h/src");
        assert_eq!(expand_vars("~", env, Some("/h")), "/h");
        assert_eq!(expand_vars("~user", env, Some("/h")), "~user");
        assert_eq!(expand_vars("a~", env, Some("/h")), "a~");
    }

    #[test]
    fn undefined_and_malformed_references_stay_literal() {
        assert_eq!(expand_vars("$NOPE and %NOPE%", env, None), "$NOPE and %NOPE%");
        assert_eq!(expand_vars("50% off $", env, None), "50% off $");
        assert_eq!(expand_vars("${X", env, None), "${X");
    }
}

//! Filesystem entries matching a `*` / `?` pattern.

use core_text::char_len;
use regex::Regex;

use super::file::list;
use super::{Completer, CompletionResult, Highlight, Kind, Span, last_token, quote, split_dir};

/// Case-insensitive anchored regex for a wildcard pattern. Every wildcard
/// becomes a capture group so matched parts can be highlighted.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::from("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str("(.*)"),
            '?' => re.push_str("(.)"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re)
}

/// Character spans of the non-empty wildcard captures.
fn captured_spans(re: &Regex, name: &str) -> Option<Vec<Span>> {
    let caps = re.captures(name)?;
    Some(
        caps.iter()
            .skip(1)
            .flatten()
            .filter(|m| !m.is_empty())
            .map(|m| {
                let start = char_len(&name[..m.start()]);
                (start, start + char_len(m.as_str()))
            })
            .collect(),
    )
}

/// A trailing `*` is implied. Several matches leave the line as it is.
pub(crate) fn complete(c: &Completer, before: &str) -> CompletionResult {
    let (start, token) = last_token(before);
    let quoted = token.starts_with('"');
    let raw = token.replace('"', "");
    let (dir_part, pattern) = split_dir(&raw);
    let re = match wildcard_to_regex(&format!("{pattern}*")) {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!(target: "complete", error = %e, "bad_wildcard");
            return CompletionResult::unchanged(Kind::Wildcard, before);
        }
    };
    let Some(entries) = list(c, dir_part, pattern, |name| re.is_match(name)) else {
        return CompletionResult::unchanged(Kind::Wildcard, before);
    };
    if entries.is_empty() {
        return CompletionResult::unchanged(Kind::Wildcard, before);
    }
    let spans = entries
        .iter()
        .map(|e| captured_spans(&re, &e.name).unwrap_or_default())
        .collect();
    let completed = match entries.as_slice() {
        [only] => {
            let path = quote(format!("{dir_part}{}", only.display()), quoted, !only.is_dir);
            format!("{}{path}", &before[..start])
        }
        _ => before.to_string(),
    };
    CompletionResult {
        kind: Kind::Wildcard,
        completed,
        suggestions: entries.iter().map(|e| e.display()).collect(),
        highlight: Highlight::Wildcard(spans),
    }
}

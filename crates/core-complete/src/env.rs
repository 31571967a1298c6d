//! Environment variable names, as `%NAME%` or `$NAME`.

use super::{CompletionResult, Highlight, Kind, common_prefix, sort_names};
use core_text::char_len;

/// Byte offset of a trailing `$NAME` reference inside `token`.
pub(crate) fn dollar_ref(token: &str) -> Option<usize> {
    let at = token.rfind('$')?;
    let name = &token[at + 1..];
    name.chars()
        .all(|c| c.is_alphanumeric() || c == '_')
        .then_some(at)
}

pub(crate) fn complete_percent(vars: &[String], before: &str) -> CompletionResult {
    match before.rfind('%') {
        Some(at) => complete_ref(vars, before, at, "%", "%"),
        None => CompletionResult::unchanged(Kind::EnvVar, before),
    }
}

pub(crate) fn complete_dollar(vars: &[String], before: &str, token_offset: usize) -> CompletionResult {
    let (start, _) = super::last_token(before);
    complete_ref(vars, before, start + token_offset, "$", "")
}

/// Complete the reference whose opening marker sits at byte `at`.
fn complete_ref(vars: &[String], before: &str, at: usize, open: &str, close: &str) -> CompletionResult {
    let prefix = &before[at + open.len()..];
    let lower = prefix.to_lowercase();
    let mut names: Vec<String> = vars
        .iter()
        .filter(|v| v.to_lowercase().starts_with(&lower))
        .cloned()
        .collect();
    sort_names(&mut names, |n| n.as_str());
    names.dedup();
    if names.is_empty() {
        return CompletionResult::unchanged(Kind::EnvVar, before);
    }
    let shared = common_prefix(&names);
    let replacement = if names.len() == 1 {
        format!("{open}{}{close}", names[0])
    } else if char_len(&shared) > char_len(prefix) {
        format!("{open}{shared}")
    } else {
        format!("{open}{prefix}")
    };
    CompletionResult {
        kind: Kind::EnvVar,
        completed: format!("{}{replacement}", &before[..at]),
        highlight: Highlight::CommonPrefix(char_len(&shared)),
        suggestions: names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vec<String> {
        ["PATH", "PATHEXT", "HOME", "TEMP"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn single_match_closes_reference() {
        let r = complete_percent(&vars(), "echo %ho");
        assert_eq!(r.completed, "echo %HOME%");
        assert_eq!(r.suggestions, vec!["HOME"]);
    }

    #[test]
    fn several_matches_extend_to_common_prefix() {
        let r = complete_percent(&vars(), "echo %pa");
        assert_eq!(r.completed, "echo %PATH");
        assert_eq!(r.suggestions, vec!["PATH", "PATHEXT"]);
        assert_eq!(r.highlight, Highlight::CommonPrefix(4));
    }

    #[test]
    fn dollar_reference() {
        assert_eq!(dollar_ref("$TE"), Some(0));
        assert_eq!(dollar_ref("a$b/c"), None);
        let r = complete_dollar(&vars(), "cd $TE", 0);
        assert_eq!(r.completed, "cd $TEMP");
    }

    #[test]
    fn no_match_leaves_line() {
        let r = complete_percent(&vars(), "echo %zz");
        assert_eq!(r.completed, "echo %zz");
        assert!(r.suggestions.is_empty());
    }
}

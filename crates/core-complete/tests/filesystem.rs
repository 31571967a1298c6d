use std::fs;
use std::path::MAIN_SEPARATOR;

use core_complete::{Completer, Highlight, Kind};
use tempfile::{TempDir, tempdir};

fn fixture(files: &[&str], dirs: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for f in files {
        fs::write(dir.path().join(f), "").unwrap();
    }
    for d in dirs {
        fs::create_dir(dir.path().join(d)).unwrap();
    }
    dir
}

fn completer(dir: &TempDir) -> Completer {
    Completer::new(dir.path()).with_vars(Vec::new())
}

#[test]
fn prefix_completes_to_common_prefix() {
    let dir = fixture(&["report.txt", "report.csv", "notes.md"], &[]);
    let r = completer(&dir).complete("type rep");
    assert_eq!(r.kind, Kind::File);
    assert_eq!(r.completed, "type report.");
    assert_eq!(r.suggestions, vec!["report.csv", "report.txt"]);
    assert_eq!(r.highlight, Highlight::CommonPrefix(7));
}

#[test]
fn matching_is_case_insensitive_and_keeps_disk_casing() {
    let dir = fixture(&["README.md"], &[]);
    let r = completer(&dir).complete("cat rea");
    assert_eq!(r.completed, "cat README.md");
    assert_eq!(r.suggestions, vec!["README.md"]);
}

#[test]
fn single_directory_gets_trailing_separator() {
    let dir = fixture(&[], &["src"]);
    let r = completer(&dir).complete("cd s");
    assert_eq!(r.completed, format!("cd src{MAIN_SEPARATOR}"));
}

#[test]
fn empty_token_lists_everything_visible() {
    let dir = fixture(&["a", "b", ".hidden"], &[]);
    let r = completer(&dir).complete("ls ");
    assert_eq!(r.completed, "ls ");
    assert_eq!(r.suggestions, vec!["a", "b"]);
}

#[test]
fn nested_directory_and_spaces_are_quoted() {
    let dir = fixture(&[], &["sub"]);
    fs::write(dir.path().join("sub").join("my file.txt"), "").unwrap();
    let r = completer(&dir).complete("type sub/my");
    assert_eq!(r.completed, "type \"sub/my file.txt\"");
}

#[test]
fn missing_directory_leaves_line_unchanged() {
    let dir = fixture(&["a"], &[]);
    let r = completer(&dir).complete("cd nowhere/x");
    assert_eq!(r.completed, "cd nowhere/x");
    assert!(r.suggestions.is_empty());
}

#[test]
fn home_prefix_is_resolved_and_preserved() {
    let dir = fixture(&["profile.txt"], &[]);
    let c = Completer::new("/")
        .with_home(Some(dir.path().to_path_buf()))
        .with_vars(Vec::new());
    let r = c.complete("cat ~/pro");
    assert_eq!(r.completed, "cat ~/profile.txt");
}

#[test]
fn wildcard_lists_matches_and_keeps_line() {
    let dir = fixture(&["a.txt", "b.txt", "c.csv"], &[]);
    let r = completer(&dir).complete("del *.txt");
    assert_eq!(r.kind, Kind::Wildcard);
    assert_eq!(r.suggestions, vec!["a.txt", "b.txt"]);
    assert_eq!(r.completed, "del *.txt");
    assert_eq!(
        r.highlight,
        Highlight::Wildcard(vec![vec![(0, 1)], vec![(0, 1)]])
    );
}

#[test]
fn single_wildcard_match_completes() {
    let dir = fixture(&["data.json", "notes.md"], &[]);
    let r = completer(&dir).complete("cat *.js");
    assert_eq!(r.completed, "cat data.json");
    assert_eq!(r.suggestions, vec!["data.json"]);
}

#[test]
fn percent_token_completes_variables() {
    let dir = fixture(&[], &[]);
    let c = Completer::new(dir.path()).with_vars(vec!["OXCMD_TEST".into()]);
    let r = c.complete("echo %oxc");
    assert_eq!(r.kind, Kind::EnvVar);
    assert_eq!(r.completed, "echo %OXCMD_TEST%");
}

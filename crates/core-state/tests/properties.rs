use core_state::{Action, HistoryStore, InputState, load_lines, save_lines};
use core_text::WordSeparators;
use proptest::prelude::*;
use tempfile::tempdir;

fn action() -> impl Strategy<Value = (Action, bool)> {
    let a = prop_oneof![
        any::<char>()
            .prop_filter("printable", |c| !c.is_control())
            .prop_map(Action::Insert),
        Just(Action::Left),
        Just(Action::Right),
        Just(Action::LeftWord),
        Just(Action::RightWord),
        Just(Action::Home),
        Just(Action::End),
        Just(Action::Backspace),
        Just(Action::Delete),
        Just(Action::BackspaceWord),
        Just(Action::DeleteWord),
        Just(Action::KillEol),
        Just(Action::Cut),
        Just(Action::Copy),
        Just(Action::Paste),
    ];
    (a, any::<bool>())
}

fn fresh() -> InputState {
    InputState::new(WordSeparators::new(" /"), Box::new(core_state::EnvExpander))
}

fn line_and_cursor(s: &InputState) -> (String, usize) {
    (s.line(), s.cursor())
}

/// Most-recent-use order of `lines`, newest last.
fn mru(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for l in lines {
        out.retain(|x| x != l);
        out.push(l.clone());
    }
    out
}

proptest! {
    #[test]
    fn selection_is_ordered_and_in_bounds(actions in proptest::collection::vec(action(), 0..40)) {
        let mut s = fresh();
        for (a, select) in actions {
            s.handle(a, select);
            let (start, end) = s.selection_range();
            prop_assert!(start <= end);
            prop_assert!(end <= s.line().chars().count());
            prop_assert_eq!(s.cursor(), s.before_cursor().chars().count());
        }
    }

    #[test]
    fn undoing_everything_returns_to_empty(actions in proptest::collection::vec(action(), 0..40)) {
        let mut s = fresh();
        for (a, select) in actions {
            s.handle(a, select);
        }
        while s.undo_depth() > 0 {
            s.handle(Action::Undo, false);
        }
        prop_assert_eq!(s.line(), "");
    }

    #[test]
    fn redo_after_undo_restores_line(actions in proptest::collection::vec(action(), 1..30)) {
        let mut s = fresh();
        for (a, select) in actions {
            s.handle(a, select);
        }
        let line = s.line();
        if s.undo_depth() > 0 {
            s.handle(Action::Undo, false);
            s.handle(Action::Redo, false);
        }
        prop_assert_eq!(s.line(), line);
    }

    #[test]
    fn undo_and_redo_restore_line_and_cursor(actions in proptest::collection::vec(action(), 1..40)) {
        let mut s = fresh();
        for (a, select) in actions {
            let depth = s.undo_depth();
            let before = line_and_cursor(&s);
            s.handle(a, select);
            if s.undo_depth() <= depth {
                continue;
            }
            let after = line_and_cursor(&s);
            s.handle(Action::Undo, false);
            prop_assert_eq!(line_and_cursor(&s), before);
            s.handle(Action::Redo, false);
            prop_assert_eq!(line_and_cursor(&s), after);
        }
    }

    #[test]
    fn adding_twice_keeps_one_occurrence_last(
        lines in proptest::collection::vec("[a-d]{1,3}", 0..20),
        line in "[a-d]{1,3}",
    ) {
        let mut h = HistoryStore::from_lines(lines);
        h.add(&line);
        let once = h.entries().to_vec();
        h.add(&line);
        prop_assert_eq!(h.entries(), once.as_slice());
        prop_assert_eq!(h.entries().iter().filter(|e| **e == line).count(), 1);
        prop_assert_eq!(h.entries().last(), Some(&line));
    }

    #[test]
    fn save_then_load_keeps_newest_unique_lines(
        lines in proptest::collection::vec("[a-e]{1,3}", 0..40),
        cap in 1usize..20,
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        save_lines(&path, &lines, cap).unwrap();

        let unique = mru(&lines);
        let keep = unique.len().min(cap);
        prop_assert_eq!(load_lines(&path).unwrap(), unique[unique.len() - keep..].to_vec());
    }
}

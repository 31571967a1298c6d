mod common;

use std::fs;
use std::time::Duration;

use common::{Recorder, config, enter, key, session, shifted};
use core_actions::{LineOutcome, RunOutcome};
use core_events::{Event, KeyEvent, vk};
use core_terminal::mock::{DriverOp, MockDriver};
use tempfile::tempdir;

#[test]
fn typed_line_is_accepted_trimmed() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("  echo hi  ");
    d.push_key(enter());

    let out = s.read_line(&mut d).unwrap();
    assert_eq!(out, LineOutcome::Accepted("echo hi".into()));
    assert_eq!(d.row(1), ">   echo hi");
    assert!(s.state().history.is_empty());
}

#[test]
fn empty_line_is_neither_run_nor_recorded() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    let mut runner = Recorder::default();

    let out = s.execute(&mut d, &mut runner, "").unwrap();
    assert_eq!(out, RunOutcome::Continue);
    assert!(runner.lines.is_empty());
    assert!(s.state().history.is_empty());
    assert!(!data.path().join("history").exists());
}

#[test]
fn accepted_line_is_run_and_persisted() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    let mut runner = Recorder::default();

    s.execute(&mut d, &mut runner, "echo hi").unwrap();
    assert_eq!(runner.lines, vec!["echo hi".to_string()]);
    assert_eq!(s.state().history.entries(), ["echo hi"]);
    assert_eq!(
        fs::read_to_string(data.path().join("history")).unwrap(),
        "echo hi\n"
    );
    let cwd = s.workdir().current().to_string_lossy().into_owned();
    assert_eq!(
        fs::read_to_string(data.path().join("dir_history")).unwrap(),
        format!("{cwd}\n")
    );
}

#[test]
fn run_loop_executes_until_ctrl_d() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    let mut runner = Recorder::default();
    d.type_text("make");
    d.push_key(enter());
    d.push_key(enter());
    d.push_key(KeyEvent::ctrl(vk::D));

    s.run(&mut d, &mut runner).unwrap();
    assert_eq!(runner.lines, vec!["make".to_string()]);
    assert!(d.written().ends_with("\nBye!"));
    assert_eq!(d.pending_events(), 0);
}

#[test]
fn quiet_mode_skips_farewell() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut cfg = config();
    cfg.behavior.quiet = true;
    let mut s = session(&cfg, data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.push_key(KeyEvent::ctrl(vk::D));

    s.run(&mut d, &mut Recorder::default()).unwrap();
    assert!(!d.written().contains("Bye!"));
}

#[test]
fn ctrl_d_deletes_on_a_non_empty_line() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("ab");
    d.push_key(key(vk::HOME));
    d.push_key(KeyEvent::ctrl(vk::D));
    d.push_key(enter());

    assert_eq!(
        s.read_line(&mut d).unwrap(),
        LineOutcome::Accepted("b".into())
    );
}

#[test]
fn exit_builtin_ends_the_run() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    let mut runner = Recorder::default();
    d.type_text("exit");
    d.push_key(enter());
    d.type_text("never");
    d.push_key(enter());

    s.run(&mut d, &mut runner).unwrap();
    assert!(runner.lines.is_empty());
    assert!(d.written().ends_with("Bye!"));
    assert!(d.pending_events() > 0);
}

#[test]
fn history_is_recalled_newest_first() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    let mut runner = Recorder::default();
    s.execute(&mut d, &mut runner, "first").unwrap();
    s.execute(&mut d, &mut runner, "second").unwrap();

    d.push_key(key(vk::UP));
    d.push_key(enter());
    assert_eq!(
        s.read_line(&mut d).unwrap(),
        LineOutcome::Accepted("second".into())
    );
    d.push_keys([key(vk::UP), key(vk::UP), enter()]);
    assert_eq!(
        s.read_line(&mut d).unwrap(),
        LineOutcome::Accepted("first".into())
    );
}

#[test]
fn history_is_loaded_from_the_data_dir() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fs::write(data.path().join("history"), "ls\ncargo test\n").unwrap();
    fs::write(data.path().join("dir_history"), "/tmp\n").unwrap();
    let s = session(&config(), data.path(), work.path());
    assert_eq!(s.state().history.entries(), ["ls", "cargo test"]);
    assert_eq!(s.dir_history().locations().len(), 2);
    assert!(s.warnings().is_empty());
}

#[test]
fn missing_history_files_are_reported() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let s = session(&config(), data.path(), work.path());
    assert_eq!(
        s.warnings(),
        [
            "Warning: Can't open history!".to_string(),
            "Warning: Can't open dir_history!".to_string(),
        ]
    );
}

#[test]
fn interrupt_clears_an_unselected_line() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("abc");
    d.push_key(KeyEvent::interrupt());
    d.type_text("d");
    d.push_key(enter());

    assert_eq!(
        s.read_line(&mut d).unwrap(),
        LineOutcome::Accepted("d".into())
    );
    assert_eq!(d.row(1), "> d");
}

#[test]
fn escape_saves_history() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("pwd");
    d.push_key(key(vk::ESCAPE));
    d.push_key(enter());

    assert_eq!(s.read_line(&mut d).unwrap(), LineOutcome::Accepted(String::new()));
    let saved = data.path().join("history");
    assert!(saved.exists());
    assert_eq!(fs::read_to_string(saved).unwrap(), "");
}

#[test]
fn shift_page_up_scrolls_and_escape_only_leaves_scrolling() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("ab");
    d.push_key(shifted(vk::PRIOR));
    d.push_key(key(vk::ESCAPE));
    d.push_key(enter());

    assert_eq!(
        s.read_line(&mut d).unwrap(),
        LineOutcome::Accepted("ab".into())
    );
    assert!(d.ops.contains(&DriverOp::Scroll(-7)));
}

#[test]
fn resize_forces_a_repaint() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.push_event(Event::Resize(40, 10));
    d.push_key(enter());

    s.read_line(&mut d).unwrap();
    let prompts = d
        .ops
        .iter()
        .filter(|op| matches!(op, DriverOp::Write(w) if w == "> "))
        .count();
    assert_eq!(prompts, 2);
}

#[test]
fn title_carries_prefix_and_directory() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path()).with_title_prefix("dev: ");
    let mut d = MockDriver::new(40, 10);

    assert_eq!(s.read_line(&mut d).unwrap(), LineOutcome::Exit);
    let expected = format!("dev: {} - oxcmd", s.workdir().current().display());
    assert!(d.ops.contains(&DriverOp::Title(expected)));
}

#[test]
fn slow_command_flashes_an_unfocused_terminal() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut cfg = config();
    cfg.behavior.notify_after_secs = 0;
    let mut s = session(&cfg, data.path(), work.path());
    let mut runner = Recorder {
        delay: Some(Duration::from_millis(5)),
        ..Recorder::default()
    };

    let mut focused = MockDriver::new(40, 10);
    s.execute(&mut focused, &mut runner, "build").unwrap();
    assert!(!focused.ops.contains(&DriverOp::Flash));

    let mut unfocused = MockDriver::new(40, 10);
    unfocused.focused = false;
    s.execute(&mut unfocused, &mut runner, "build").unwrap();
    assert!(unfocused.ops.contains(&DriverOp::Flash));
}

#[test]
fn cut_ends_select_mode() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("abcd");
    d.push_key(KeyEvent::ctrl(vk::SPACE));
    d.push_keys([key(vk::LEFT), key(vk::LEFT)]);
    d.push_key(KeyEvent::ctrl(vk::X));
    d.push_key(key(vk::LEFT));
    d.type_text("X");
    d.push_key(enter());

    let out = s.read_line(&mut d).unwrap();
    assert_eq!(out, LineOutcome::Accepted("aXb".into()));
    assert_eq!(s.state().clipboard(), "cd");
}

#[test]
fn copy_ends_select_mode() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let mut s = session(&config(), data.path(), work.path());
    let mut d = MockDriver::new(40, 10);
    d.type_text("abcd");
    d.push_key(KeyEvent::ctrl(vk::SPACE));
    d.push_keys([key(vk::LEFT), key(vk::LEFT)]);
    d.push_key(KeyEvent::alt(vk::W));
    d.push_key(key(vk::LEFT));
    d.type_text("X");
    d.push_key(enter());

    let out = s.read_line(&mut d).unwrap();
    assert_eq!(out, LineOutcome::Accepted("aXbcd".into()));
    assert_eq!(s.state().clipboard(), "cd");
}

//! The per-line dispatch loop and what happens after a line is accepted.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use core_complete::{Completer, Layout, LayoutParams, parse_line};
use core_config::{ConfigFile, DataPaths};
use core_events::{Event, KeyEvent, vk};
use core_keymap::{KeyAction, Keymap, ScrollDir};
use core_render::{
    ColorOutputStream, Palette, clear_confirm, prompt_width, repaint, show_confirm,
    strip_color_tokens, write_dir_listing, write_suggestions,
};
use core_state::{
    Action, DirHistory, EnvExpander, HistoryStore, InputState, load_or_warn, save_lines,
};
use core_terminal::TerminalDriver;
use core_text::{WordSeparators, str_width};
use tracing::{debug, info, trace, warn};

use crate::builtin::{Builtin, change_dir};
use crate::prompt::render_prompt;
use crate::runner::{CommandRunner, RunOutcome};
use crate::workdir::Workdir;

/// How reading one line ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The trimmed line. Empty when the user just pressed Enter.
    Accepted(String),
    Exit,
}

enum Flow {
    Continue,
    Accept,
    Exit,
}

pub struct Session {
    state: InputState,
    dir_hist: DirHistory,
    keymap: Keymap,
    palette: Palette,
    layout: LayoutParams,
    config: ConfigFile,
    paths: DataPaths,
    workdir: Box<dyn Workdir>,
    home: Option<PathBuf>,
    title_prefix: String,
    last_title: Option<String>,
    warnings: Vec<String>,
    auto_select: bool,
    scrolling: bool,
    force_repaint: bool,
}

impl Session {
    /// Load both histories from `paths` and record the current directory.
    /// Files that cannot be read start empty; see [`warnings`](Self::warnings).
    pub fn new(config: &ConfigFile, paths: DataPaths, workdir: Box<dyn Workdir>) -> Self {
        let mut warnings = Vec::new();
        let mut load = |path: PathBuf| {
            let (lines, err) = load_or_warn(&path);
            if err.is_some() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warnings.push(format!("Warning: Can't open {name}!"));
            }
            lines
        };
        let history = HistoryStore::from_lines(load(paths.history()));
        let mut dir_hist = DirHistory::from_lines(
            load(paths.dir_history()),
            config.dir_history.max_entries,
        );
        dir_hist.visit(&workdir.current().to_string_lossy());

        let state = InputState::new(
            WordSeparators::new(&config.editing.word_separators),
            Box::new(EnvExpander),
        )
        .with_history(history);
        let c = &config.completion;
        info!(
            target: "dispatch",
            history = state.history.len(),
            dirs = dir_hist.locations().len(),
            "session_open"
        );
        Self {
            state,
            dir_hist,
            keymap: Keymap::default(),
            palette: Palette::from_colors(&config.appearance.colors),
            layout: LayoutParams {
                column_padding: c.column_padding,
                multi_column_divisor: c.multi_column_divisor,
                confirm_screens: c.confirm_screens,
            },
            config: config.clone(),
            paths,
            workdir,
            home: dirs::home_dir(),
            title_prefix: String::new(),
            last_title: None,
            warnings,
            auto_select: false,
            scrolling: false,
            force_repaint: true,
        }
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Messages about history files that could not be loaded.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn quiet(&self) -> bool {
        self.config.behavior.quiet
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn dir_history(&self) -> &DirHistory {
        &self.dir_hist
    }

    pub fn workdir(&self) -> &dyn Workdir {
        self.workdir.as_ref()
    }

    fn prompt(&self) -> String {
        render_prompt(
            &self.config.appearance.prompt,
            self.workdir.current(),
            self.home.as_deref(),
        )
    }

    /// Read and execute lines until the user exits.
    pub fn run(
        &mut self,
        driver: &mut dyn TerminalDriver,
        runner: &mut dyn CommandRunner,
    ) -> Result<()> {
        loop {
            match self.read_line(driver)? {
                LineOutcome::Exit => {
                    self.farewell(driver, "\n")?;
                    return Ok(());
                }
                LineOutcome::Accepted(line) => {
                    if self.execute(driver, runner, &line)? == RunOutcome::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn farewell(&self, driver: &mut dyn TerminalDriver, lead: &str) -> Result<()> {
        if !self.quiet() {
            driver.write_str(&format!("{lead}Bye!"))?;
        }
        driver.flush()
    }

    /// Edit one line under a fresh prompt until it is accepted.
    pub fn read_line(&mut self, driver: &mut dyn TerminalDriver) -> Result<LineOutcome> {
        let prompt = self.prompt();
        self.state.reset_line(prompt);
        self.dir_hist.invalidate();
        self.auto_select = false;
        self.scrolling = false;
        self.force_repaint = true;
        driver.write_str("\n")?;

        loop {
            self.update_title(driver)?;
            if self.force_repaint || self.state.changed() {
                repaint(
                    driver,
                    self.state.prev(),
                    &self.state.rendered(),
                    &self.palette,
                    &mut self.dir_hist,
                )?;
            }
            self.state.step();
            driver.flush()?;

            let key = match driver.read_event()? {
                Event::Key(key) if key.is_key_down => key,
                Event::Key(_) => continue,
                Event::Resize(..) => {
                    self.force_repaint = true;
                    continue;
                }
                Event::Shutdown => {
                    info!(target: "dispatch", "input_closed");
                    return Ok(LineOutcome::Exit);
                }
            };
            self.force_repaint = !key.is_control_only();
            let Some(resolved) = self.keymap.resolve(&key) else {
                continue;
            };
            let select = self.auto_select || resolved.select;
            match self.dispatch(driver, resolved.action, select)? {
                Flow::Continue => {}
                Flow::Accept => return Ok(LineOutcome::Accepted(self.finish_line(driver)?)),
                Flow::Exit => return Ok(LineOutcome::Exit),
            }
        }
    }

    fn update_title(&mut self, driver: &mut dyn TerminalDriver) -> Result<()> {
        let title = format!(
            "{}{} - oxcmd",
            self.title_prefix,
            self.workdir.current().display()
        );
        if self.last_title.as_deref() != Some(title.as_str()) {
            driver.set_title(&title)?;
            self.last_title = Some(title);
        }
        Ok(())
    }

    fn finish_line(&mut self, driver: &mut dyn TerminalDriver) -> Result<String> {
        driver.write_str(self.state.after_cursor())?;
        ColorOutputStream::new(&mut *driver).write(&self.palette.reset)?;
        let line = self.state.line().trim().to_string();
        trace!(target: "dispatch", %line, "accepted");
        Ok(line)
    }

    fn dispatch(
        &mut self,
        driver: &mut dyn TerminalDriver,
        action: KeyAction,
        select: bool,
    ) -> Result<Flow> {
        trace!(target: "dispatch", ?action, select, "key_action");
        let empty = self.state.is_empty();
        match action {
            KeyAction::Edit(a) => self.edit(a, select),
            KeyAction::Accept => {
                self.state.history.reset();
                return Ok(Flow::Accept);
            }
            KeyAction::Complete => self.complete(driver)?,
            KeyAction::Escape => {
                if self.scrolling {
                    self.scrolling = false;
                } else {
                    self.edit(Action::Escape, select);
                    self.save_history();
                    self.auto_select = false;
                }
            }
            KeyAction::ExitOrDelete if empty => return Ok(Flow::Exit),
            KeyAction::ExitOrDelete => self.edit(Action::Delete, select),
            KeyAction::CopyOrEscape => {
                let action = if self.state.selection().is_empty() {
                    Action::Escape
                } else {
                    Action::Copy
                };
                self.edit(action, select);
            }
            KeyAction::CopyAndDeselect => {
                self.edit(Action::Copy, select);
                self.state.reset_selection();
            }
            KeyAction::SelectMode => {
                self.auto_select = !self.auto_select;
                self.state.reset_selection();
            }
            KeyAction::DirBack if empty => self.change_listed_dir(driver, DirHistory::go_left)?,
            KeyAction::DirBack => self.edit(Action::LeftWord, select),
            KeyAction::DirForward if empty => {
                self.change_listed_dir(driver, DirHistory::go_right)?
            }
            KeyAction::DirForward => self.edit(Action::RightWord, select),
            KeyAction::DirJump(n) if empty => {
                self.change_listed_dir(driver, |d| d.jump(usize::from(n)))?
            }
            KeyAction::DirJump(_) => {}
            KeyAction::DirList if empty => self.draw_dir_listing(driver)?,
            KeyAction::DirList => self.edit(Action::DeleteWord, select),
            KeyAction::Scroll(dir) => {
                let page = i32::from(driver.viewport()?.height()).saturating_sub(2).max(1);
                driver.scroll_viewport(match dir {
                    ScrollDir::Up => -page,
                    ScrollDir::Down => page,
                })?;
                self.scrolling = true;
                self.force_repaint = false;
            }
        }
        Ok(Flow::Continue)
    }

    fn edit(&mut self, action: Action, select: bool) {
        // Select mode ends with anything that consumes or replaces the selection.
        if matches!(
            action,
            Action::UndoEmacs
                | Action::Undo
                | Action::Redo
                | Action::Cut
                | Action::Copy
                | Action::Paste
                | Action::Escape
        ) {
            self.auto_select = false;
        }
        self.state.handle(action, select);
    }

    fn save_history(&self) {
        if let Err(e) = save_lines(
            &self.paths.history(),
            self.state.history.entries(),
            self.config.history.max_entries,
        ) {
            warn!(target: "dispatch", error = %e, "history_save_failed");
        }
    }

    fn save_dir_history(&self) {
        if let Err(e) = save_lines(
            &self.paths.dir_history(),
            self.dir_hist.locations(),
            self.dir_hist.max_len(),
        ) {
            warn!(target: "dispatch", error = %e, "dir_history_save_failed");
        }
    }

    /// Complete the token before the cursor, listing the candidates below
    /// the line when there is more than one.
    fn complete(&mut self, driver: &mut dyn TerminalDriver) -> Result<()> {
        let completer =
            Completer::new(self.workdir.current()).with_home(self.home.clone());
        let result = completer.complete(self.state.before_cursor());
        debug!(
            target: "dispatch",
            kind = ?result.kind,
            suggestions = result.suggestions.len(),
            "complete"
        );
        if result.suggestions.len() > 1 {
            let tail = str_width(self.state.after_cursor());
            driver.write_str(self.state.after_cursor())?;
            self.dir_hist.invalidate();
            let (width, _) = driver.buffer_size()?;
            let height = driver.viewport()?.height();
            let layout = Layout::compute(&result.suggestions, width, height, &self.layout);
            if layout.needs_confirm(&self.layout) && !self.confirm_long_listing(driver, &layout)? {
                driver.cursor_backward(tail)?;
                return Ok(());
            }
            write_suggestions(
                driver,
                &result.suggestions,
                &result.highlight,
                &layout,
                &self.palette,
            )?;
            self.state.reset_prev_line();
        }
        self.state.handle(Action::Complete(result.completed), false);
        Ok(())
    }

    /// Ask before printing a listing taller than the configured number of
    /// screens. Only Tab confirms.
    fn confirm_long_listing(
        &mut self,
        driver: &mut dyn TerminalDriver,
        layout: &Layout,
    ) -> Result<bool> {
        let anchor = show_confirm(driver, &layout.confirm_message())?;
        driver.flush()?;
        let answer: Option<KeyEvent> = loop {
            match driver.read_event()? {
                Event::Key(k) if k.is_key_down && !k.is_control_only() => break Some(k),
                Event::Key(_) | Event::Resize(..) => {}
                Event::Shutdown => break None,
            }
        };
        clear_confirm(driver, anchor)?;
        let confirmed = answer.is_some_and(|k| k.virtual_key == vk::TAB);
        debug!(target: "dispatch", screens = layout.screens, confirmed, "confirm_listing");
        Ok(confirmed)
    }

    /// Move through the directory history and follow it with the working
    /// directory.
    fn change_listed_dir(
        &mut self,
        driver: &mut dyn TerminalDriver,
        step: impl FnOnce(&mut DirHistory) -> bool,
    ) -> Result<()> {
        if !step(&mut self.dir_hist) {
            return Ok(());
        }
        if let Some(target) = self.dir_hist.current().map(PathBuf::from)
            && let Err(e) = self.workdir.change(&target)
        {
            warn!(target: "dispatch", dir = %target.display(), error = %e, "dir_history_chdir_failed");
        }
        let prompt = self.prompt();
        self.state.set_prompt(prompt);
        self.save_dir_history();
        if self.dir_hist.shown {
            self.draw_dir_listing(driver)?;
        }
        Ok(())
    }

    /// Show the listing above the line, replacing the previous one if it
    /// is still on screen.
    fn draw_dir_listing(&mut self, driver: &mut dyn TerminalDriver) -> Result<()> {
        if self.dir_hist.locations().is_empty() {
            return Ok(());
        }
        let prev = self.state.prev();
        let head = prompt_width(&prev.prompt) + str_width(&prev.before);
        let restore = strip_color_tokens(&prev.prompt);
        let (width, _) = driver.buffer_size()?;
        self.dir_hist.set_width(width);
        self.dir_hist.check_overflow(prompt_width(self.state.prompt()));
        let replace = self.dir_hist.shown;
        let entries = self.dir_hist.display();
        write_dir_listing(driver, &entries, &self.palette, head, replace, &restore)
    }

    /// Run an accepted line. Empty lines do nothing; everything else is
    /// recorded in the history, run, and followed by recording the working
    /// directory.
    pub fn execute(
        &mut self,
        driver: &mut dyn TerminalDriver,
        runner: &mut dyn CommandRunner,
        line: &str,
    ) -> Result<RunOutcome> {
        let tokens = parse_line(line);
        if tokens.is_empty() {
            return Ok(RunOutcome::Continue);
        }
        driver.write_str("\n")?;
        self.state.history.add(line);
        self.save_history();

        match Builtin::parse(&tokens) {
            Some(Builtin::Exit) => {
                self.farewell(driver, "")?;
                return Ok(RunOutcome::Exit);
            }
            Some(Builtin::Cd(arg)) => {
                if let Err(message) =
                    change_dir(self.workdir.as_mut(), arg.as_deref(), self.home.as_deref())
                {
                    warn!(target: "dispatch", "cd_failed");
                    driver.write_str(&format!("{message}\n"))?;
                }
            }
            None => {
                let started = Instant::now();
                runner.run(driver, line, self.workdir.current())?;
                self.notify_if_slow(driver, started.elapsed())?;
            }
        }

        let cwd = self.workdir.current().to_string_lossy().into_owned();
        self.dir_hist.visit(&cwd);
        self.save_dir_history();
        Ok(RunOutcome::Continue)
    }

    fn notify_if_slow(&self, driver: &mut dyn TerminalDriver, elapsed: Duration) -> Result<()> {
        let threshold = Duration::from_secs(self.config.behavior.notify_after_secs);
        if elapsed > threshold && !driver.is_focused() {
            debug!(target: "dispatch", secs = elapsed.as_secs(), "notify_long_command");
            driver.flash()?;
        }
        Ok(())
    }
}

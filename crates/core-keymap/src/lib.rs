//! core-keymap: `(modifier class, virtual key)` to action table.
//!
//! Every key event is classified once into a [`ModClass`] plus a shift bit
//! and looked up in a flat table. A shifted lookup that finds nothing falls
//! back to the unshifted binding; Shift then means "extend the selection".
//! Printable characters without a binding insert themselves unless Ctrl or
//! Alt alone is held.
//!
//! Resolution is pure: the table knows nothing about the line, so bindings
//! whose meaning depends on it (Ctrl-D on an empty line, Alt-Left outside a
//! command) resolve to dedicated [`KeyAction`] variants the dispatcher
//! interprets.

use std::collections::HashMap;

use core_events::{KeyEvent, vk};
use core_state::Action;
use tracing::trace;

/// Ctrl without Alt, Alt without Ctrl, or anything else (AltGr included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModClass {
    Plain,
    Ctrl,
    Alt,
}

impl ModClass {
    pub fn of(key: &KeyEvent) -> Self {
        let cs = key.control_state;
        match (cs.ctrl(), cs.alt()) {
            (true, false) => ModClass::Ctrl,
            (false, true) => ModClass::Alt,
            _ => ModClass::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDir {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Straight line-editing action.
    Edit(Action),
    Accept,
    Complete,
    /// Leave scroll mode, or cancel and save history.
    Escape,
    /// Exit on an empty line, delete otherwise.
    ExitOrDelete,
    /// Copy a non-empty selection, escape otherwise.
    CopyOrEscape,
    /// Copy and drop the selection.
    CopyAndDeselect,
    /// Toggle selecting with every following motion.
    SelectMode,
    /// Directory back on an empty line, word left otherwise.
    DirBack,
    /// Directory forward on an empty line, word right otherwise.
    DirForward,
    /// Jump to listed directory `n` on an empty line.
    DirJump(u8),
    /// Directory listing on an empty line, delete word otherwise.
    DirList,
    Scroll(ScrollDir),
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub class: ModClass,
    pub shift: bool,
    pub vk: u16,
    pub action: KeyAction,
}

fn bind(class: ModClass, vk: u16, action: KeyAction) -> Binding {
    Binding {
        class,
        shift: false,
        vk,
        action,
    }
}

fn bind_shifted(class: ModClass, vk: u16, action: KeyAction) -> Binding {
    Binding {
        class,
        shift: true,
        vk,
        action,
    }
}

/// The built-in key bindings.
pub fn default_bindings() -> Vec<Binding> {
    use KeyAction::*;
    use ModClass::{Alt, Ctrl, Plain};
    let edit = KeyAction::Edit;
    let mut b = vec![
        bind(Plain, vk::LEFT, edit(Action::Left)),
        bind(Plain, vk::RIGHT, edit(Action::Right)),
        bind(Plain, vk::HOME, edit(Action::Home)),
        bind(Plain, vk::END, edit(Action::End)),
        bind(Plain, vk::UP, edit(Action::Prev)),
        bind(Plain, vk::DOWN, edit(Action::Next)),
        bind(Plain, vk::DELETE, edit(Action::Delete)),
        bind(Plain, vk::BACK, edit(Action::Backspace)),
        bind(Plain, vk::RETURN, Accept),
        bind(Plain, vk::ESCAPE, Escape),
        bind(Plain, vk::TAB, Complete),
        bind_shifted(Plain, vk::PRIOR, Scroll(ScrollDir::Up)),
        bind_shifted(Plain, vk::NEXT, Scroll(ScrollDir::Down)),
        bind(Ctrl, vk::A, edit(Action::Home)),
        bind(Ctrl, vk::E, edit(Action::End)),
        bind(Ctrl, vk::B, edit(Action::Left)),
        bind(Ctrl, vk::F, edit(Action::Right)),
        bind(Ctrl, vk::P, edit(Action::Prev)),
        bind(Ctrl, vk::N, edit(Action::Next)),
        bind(Ctrl, vk::LEFT, edit(Action::LeftWord)),
        bind(Ctrl, vk::RIGHT, edit(Action::RightWord)),
        bind(Ctrl, vk::DELETE, edit(Action::DeleteWord)),
        bind(Ctrl, vk::BACK, edit(Action::BackspaceWord)),
        bind(Ctrl, vk::K, edit(Action::KillEol)),
        bind(Ctrl, vk::D, ExitOrDelete),
        bind(Ctrl, vk::OEM_MINUS, edit(Action::UndoEmacs)),
        bind(Ctrl, vk::SPACE, SelectMode),
        bind(Ctrl, vk::G, Escape),
        bind(Ctrl, vk::C, CopyOrEscape),
        bind(Ctrl, vk::X, edit(Action::Cut)),
        bind(Ctrl, vk::W, edit(Action::Cut)),
        bind(Ctrl, vk::V, edit(Action::Paste)),
        bind(Ctrl, vk::Y, edit(Action::Paste)),
        bind(Ctrl, vk::Z, edit(Action::Undo)),
        bind_shifted(Ctrl, vk::Z, edit(Action::Redo)),
        bind(Alt, vk::LEFT, DirBack),
        bind(Alt, vk::RIGHT, DirForward),
        bind(Alt, vk::D, DirList),
        bind(Alt, vk::B, edit(Action::LeftWord)),
        bind(Alt, vk::F, edit(Action::RightWord)),
        bind(Alt, vk::P, edit(Action::Prev)),
        bind(Alt, vk::N, edit(Action::Next)),
        bind(Alt, vk::W, CopyAndDeselect),
        bind(Alt, vk::DELETE, edit(Action::DeleteWord)),
        bind(Alt, vk::BACK, edit(Action::BackspaceWord)),
        bind(Alt, vk::OEM_2, edit(Action::Expand)),
    ];
    b.extend((1..=9u8).map(|n| bind(Alt, vk::DIGIT_0 + u16::from(n), DirJump(n))));
    b
}

/// Outcome of resolving one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub action: KeyAction,
    /// Shift was held; motions extend the selection.
    pub select: bool,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    table: HashMap<(ModClass, bool, u16), KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::build(default_bindings())
    }
}

impl Keymap {
    /// Later bindings override earlier ones for the same key.
    pub fn build(bindings: Vec<Binding>) -> Self {
        let table = bindings
            .into_iter()
            .map(|b| ((b.class, b.shift, b.vk), b.action))
            .collect();
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<Resolved> {
        let class = ModClass::of(key);
        let shift = key.control_state.shift();
        let found = self
            .table
            .get(&(class, shift, key.virtual_key))
            .or_else(|| {
                shift
                    .then(|| self.table.get(&(class, false, key.virtual_key)))
                    .flatten()
            })
            .cloned();
        let resolved = match found {
            Some(action) => Some(Resolved {
                action,
                select: shift,
            }),
            None if class == ModClass::Plain && is_insertable(key.character) => Some(Resolved {
                action: KeyAction::Edit(Action::Insert(key.character)),
                select: false,
            }),
            None => None,
        };
        trace!(target: "input", %key, ?class, bound = resolved.is_some(), "resolve");
        resolved
    }
}

fn is_insertable(c: char) -> bool {
    c != '\0' && !c.is_control()
}

//! Core event types and the ordered event queue for oxcmd.
//!
//! Every mutation of the line editor is driven by one `Event` pulled from a
//! single `EventQueue`. Producers (the terminal input pump, the SIGINT
//! forwarder) hold an `EventInjector` and never touch editor state directly;
//! the dispatch loop is the only consumer, so all mutations stay strictly
//! sequenced.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::trace;

pub mod vk;

/// Top-level event enum consumed by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Input source closed; the loop should wind down.
    Shutdown,
}

bitflags::bitflags! {
    /// Modifier state reported with every key event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ControlState: u8 {
        const LEFT_CTRL  = 0b0000_0001;
        const RIGHT_CTRL = 0b0000_0010;
        const LEFT_ALT   = 0b0000_0100;
        const RIGHT_ALT  = 0b0000_1000;
        const SHIFT      = 0b0001_0000;
    }
}

impl ControlState {
    pub fn ctrl(self) -> bool {
        self.intersects(Self::LEFT_CTRL | Self::RIGHT_CTRL)
    }
    pub fn alt(self) -> bool {
        self.intersects(Self::LEFT_ALT | Self::RIGHT_ALT)
    }
    pub fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }
}

/// One keyboard event as delivered by the terminal driver.
///
/// `character` is `'\0'` for keys without a textual representation (arrows,
/// Home, Delete...). `virtual_key` follows the numbering in [`vk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub is_key_down: bool,
    pub character: char,
    pub virtual_key: u16,
    pub control_state: ControlState,
}

impl KeyEvent {
    pub fn new(character: char, virtual_key: u16, control_state: ControlState) -> Self {
        Self {
            is_key_down: true,
            character,
            virtual_key,
            control_state,
        }
    }

    /// Plain key press for a printable character.
    pub fn char(c: char) -> Self {
        let shift = if c.is_ascii_uppercase() {
            ControlState::SHIFT
        } else {
            ControlState::empty()
        };
        Self::new(c, vk::for_char(c), shift)
    }

    /// Key without a character (arrows, Home, Delete, ...).
    pub fn special(virtual_key: u16, control_state: ControlState) -> Self {
        Self::new('\0', virtual_key, control_state)
    }

    /// Ctrl + key. The control character is synthesised for letters.
    pub fn ctrl(virtual_key: u16) -> Self {
        let character = match virtual_key {
            vk::A..=vk::Z => char::from((virtual_key - vk::A + 1) as u8),
            _ => '\0',
        };
        Self::new(character, virtual_key, ControlState::LEFT_CTRL)
    }

    /// Alt + key.
    pub fn alt(virtual_key: u16) -> Self {
        Self::new('\0', virtual_key, ControlState::LEFT_ALT)
    }

    /// The synthetic event injected when an interrupt signal arrives.
    pub fn interrupt() -> Self {
        Self::new('\0', vk::C, ControlState::LEFT_CTRL)
    }

    /// True for presses of a bare modifier key (Shift, Ctrl, Alt).
    pub fn is_control_only(&self) -> bool {
        matches!(self.virtual_key, vk::SHIFT | vk::CONTROL | vk::MENU)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vk={}{:?}{:?}",
            self.virtual_key, self.character, self.control_state
        )
    }
}

/// Producer half of the event queue. Cheap to clone; safe to move into
/// signal and input threads.
#[derive(Clone, Debug)]
pub struct EventInjector {
    tx: Sender<Event>,
}

impl EventInjector {
    /// Push an event. Returns `false` when the consumer is gone.
    pub fn inject(&self, event: Event) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                trace!(target: "input.queue", "inject_on_closed_queue");
                false
            }
        }
    }

    pub fn inject_key(&self, key: KeyEvent) -> bool {
        self.inject(Event::Key(key))
    }
}

/// Flags shared between the input pump and the terminal driver.
///
/// `paused` is raised while a child process owns the terminal so the pump
/// stops consuming its keystrokes; `focused` tracks terminal focus reports.
#[derive(Debug)]
pub struct InputFlags {
    paused: AtomicBool,
    focused: AtomicBool,
}

impl Default for InputFlags {
    fn default() -> Self {
        Self {
            paused: AtomicBool::new(false),
            focused: AtomicBool::new(true),
        }
    }
}

impl InputFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }
}

/// Consumer half of the event queue, owned by the terminal driver.
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<Event>,
    tx: Sender<Event>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { rx, tx }
    }

    pub fn injector(&self) -> EventInjector {
        EventInjector {
            tx: self.tx.clone(),
        }
    }

    /// Block until the next event arrives.
    pub fn recv(&self) -> Result<Event> {
        self.rx
            .recv()
            .map_err(|_| anyhow!("event queue disconnected"))
    }

    /// Non-blocking poll, used to drain stale events.
    pub fn try_recv(&self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next key-down event; resize events are returned too so
    /// the caller can recompute layout.
    pub fn next_key_down(&self) -> Result<Event> {
        loop {
            match self.recv()? {
                Event::Key(k) if !k.is_key_down => continue,
                other => return Ok(other),
            }
        }
    }
}

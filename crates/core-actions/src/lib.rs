//! Session context and the dispatch loop.
//!
//! A [`Session`] bundles everything that lives longer than one edited line:
//! command history, directory history, the key table, colors and the
//! working directory. [`Session::read_line`] runs the per-line loop (read a
//! key, resolve it through the keymap, apply it, repaint) until the line is
//! accepted; [`Session::execute`] then takes care of built-ins, hands
//! everything else to a [`CommandRunner`] and persists both histories.
//!
//! All mutation happens on the thread calling into the session. An
//! interrupt reaches the loop as a synthetic Ctrl-C key event in the same
//! ordered queue as real keys.

mod builtin;
mod prompt;
mod runner;
mod session;
mod workdir;

pub use builtin::{Builtin, change_dir};
pub use prompt::{display_path, render_prompt};
pub use runner::{CommandRunner, RunOutcome};
pub use session::{LineOutcome, Session};
pub use workdir::{ProcessWorkdir, Workdir};

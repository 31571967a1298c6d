//! Undo/redo transaction stacks for the edited line.
//!
//! Every content-changing action records one [`Transaction`] holding the
//! line split before and after it. Runs of plain character inserts extend the
//! previous transaction instead of pushing a new one; the run ends at the
//! first action of any other kind.
//!
//! Emacs-style undo walks backwards through the stack and records each step
//! as a fresh transaction, so undoing an undo is just another undo once the
//! chain is broken by any other action.

use tracing::trace;

/// Maximum number of transactions retained on the undo stack.
pub const UNDO_HISTORY_MAX: usize = 200;

/// The line split at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub before: String,
    pub after: String,
}

impl Snapshot {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// The whole line.
    pub fn text(&self) -> String {
        format!("{}{}", self.before, self.after)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub old: Snapshot,
    pub new: Snapshot,
}

#[derive(Debug, Default)]
pub struct UndoEngine {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    insert_run: bool,
    /// Next transaction an emacs-style undo will revert, while a chain is active.
    emacs_pos: Option<usize>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.insert_run = false;
        self.emacs_pos = None;
    }

    /// Record a content change. With `coalesce` set, an ongoing insert run
    /// absorbs the change into its transaction.
    pub fn record(&mut self, old: Snapshot, new: Snapshot, coalesce: bool) {
        self.redo_stack.clear();
        if coalesce
            && self.insert_run
            && let Some(last) = self.undo_stack.last_mut()
            && last.new == old
        {
            last.new = new;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "coalesced_insert");
            return;
        }
        self.push(Transaction { old, new });
        self.insert_run = coalesce;
        self.emacs_pos = None;
    }

    /// Push a transaction; returns whether the oldest one was trimmed.
    fn push(&mut self, t: Transaction) -> bool {
        self.undo_stack.push(t);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "push_transaction");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
            return true;
        }
        false
    }

    /// End the current insert run.
    pub fn break_run(&mut self) {
        self.insert_run = false;
    }

    pub fn break_emacs_chain(&mut self) {
        self.emacs_pos = None;
    }

    /// Pop the latest transaction; returns the state to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.insert_run = false;
        let t = self.undo_stack.pop()?;
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len() + 1, "undo_pop");
        let restore = t.old.clone();
        self.redo_stack.push(t);
        Some(restore)
    }

    /// Re-apply the latest undone transaction; returns the state to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        self.insert_run = false;
        let t = self.redo_stack.pop()?;
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len() + 1, "redo_pop");
        let restore = t.new.clone();
        self.undo_stack.push(t);
        Some(restore)
    }

    /// Emacs-style undo from `current`. Each call in an unbroken chain reverts
    /// one transaction further back; the reversal itself is recorded.
    pub fn undo_emacs(&mut self, current: &Snapshot) -> Option<Snapshot> {
        self.insert_run = false;
        let pos = self.emacs_pos.unwrap_or(self.undo_stack.len());
        if pos == 0 {
            trace!(target: "state.undo", "emacs_chain_exhausted");
            return None;
        }
        let target = self.undo_stack[pos - 1].old.clone();
        self.redo_stack.clear();
        let trimmed = self.push(Transaction {
            old: current.clone(),
            new: target.clone(),
        });
        // A trim shifts every index down by one.
        let next = pos - 1;
        self.emacs_pos = Some(if trimmed { next.saturating_sub(1) } else { next });
        trace!(target: "state.undo", next = pos - 1, "emacs_undo");
        Some(target)
    }
}

use std::ops::{Deref, DerefMut};

use crate::model::GridState;

/// Receiver of undoable mutations.
///
/// The board calls [`HistorySink::record`] with the state as it was *before* each
/// mutation that changed something. `begin_batch`/`end_batch` bracket a sequence of
/// mutations that should undo as one step; batches may nest.
pub trait HistorySink {
    fn begin_batch(&mut self);
    fn end_batch(&mut self);
    fn record(&mut self, before: GridState);
}

/// Scoped batch: opens on creation and always closes on drop.
///
/// ```ignore
/// let mut tx = Transaction::begin(&mut history);
/// board.execute(Command::AssignLatestImage, &mut *tx);
/// board.execute(Command::Mosaic, &mut *tx);
/// // dropped here: one undo step
/// ```
pub struct Transaction<'a, S: HistorySink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: HistorySink + ?Sized> Transaction<'a, S> {
    pub fn begin(sink: &'a mut S) -> Self {
        sink.begin_batch();
        Self { sink }
    }
}

impl<S: HistorySink + ?Sized> Deref for Transaction<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: HistorySink + ?Sized> DerefMut for Transaction<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: HistorySink + ?Sized> Drop for Transaction<'_, S> {
    fn drop(&mut self) {
        self.sink.end_batch();
    }
}

/// Manages the Undo/Redo history of the GridState.
///
/// This implementation uses a simple Full State Snapshot approach.
/// Grids are small (at most a few dozen cells), so a snapshot per step is cheap and
/// restores camera identities exactly.
pub struct HistoryManager {
    undo_stack: Vec<GridState>,
    redo_stack: Vec<GridState>,
    pub max_history: usize,
    batch_depth: usize,
    batch_recorded: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

impl HistoryManager {
    /// Creates a new HistoryManager with a specified limit.
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_history),
            redo_stack: Vec::new(),
            max_history,
            batch_depth: 0,
            batch_recorded: false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Saves a snapshot BEFORE a destructive action.
    pub fn commit(&mut self, state: &GridState) {
        self.record(state.clone());
    }

    /// Performs Undo.
    ///
    /// Returns true if successful (state updated), false if nothing to undo.
    pub fn undo(&mut self, state: &mut GridState) -> bool {
        if let Some(prev_state) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(state, prev_state));
            true
        } else {
            false
        }
    }

    /// Performs Redo.
    ///
    /// Returns true if successful (state updated), false if nothing to redo.
    pub fn redo(&mut self, state: &mut GridState) -> bool {
        if let Some(next_state) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(state, next_state));
            true
        } else {
            false
        }
    }
}

impl HistorySink for HistoryManager {
    fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_recorded = false;
        }
        self.batch_depth += 1;
    }

    fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
    }

    fn record(&mut self, before: GridState) {
        if self.batch_depth > 0 {
            // Only the state before the first mutation of a batch is worth keeping.
            if self.batch_recorded {
                return;
            }
            self.batch_recorded = true;
        }
        if self.max_history == 0 {
            return;
        }
        if self.undo_stack.len() >= self.max_history {
            self.undo_stack.remove(0); // Drop oldest
        }
        self.undo_stack.push(before);
        self.redo_stack.clear(); // New timeline branch
    }
}

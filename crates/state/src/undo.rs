use std::collections::VecDeque;

use crate::element::TimelineElement;
use crate::selection::Selection;

const MAX_HISTORY: usize = 100;

/// Everything an edit can change: the element sequence and what was selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<TimelineElement>,
    pub selection: Selection,
}

#[derive(Debug, Clone)]
struct Entry {
    label: &'static str,
    snapshot: Snapshot,
}

/// Bounded undo/redo history. Each entry remembers which edit produced it,
/// so "Undo cut" stays "Redo cut" after stepping back.
#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    undo_stack: VecDeque<Entry>,
    redo_stack: Vec<Entry>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state from before the edit named `label`.
    pub fn save(&mut self, label: &'static str, before: Snapshot) {
        self.undo_stack.push_back(Entry {
            label,
            snapshot: before,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.pop_front();
        }
    }

    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push(Entry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push_back(Entry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|e| e.label)
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|e| e.label)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

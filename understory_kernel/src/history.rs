// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undo/redo history over the `data` slice of kernel state.
//!
//! Two bounded stacks hold snapshots: `past` (what undo restores) and `future` (what redo
//! restores).
//!
//! ```text
//! record(e3)          past: [e1, e2, e3]   future: []
//! undo() x2           past: [e1]           future: [s3, s2]
//! record(e4)          past: [e1, e4]       future: []      <- new branch clears redo
//! ```
//!
//! Invariants:
//!
//! 1. `past.len() <= cap` and `future.len() <= cap` after every operation; the oldest entry is
//!    evicted silently.
//! 2. Recording a new entry clears `future`.
//! 3. An entry recorded within the coalescing window of the previous one, for the same command
//!    kind and the same logical field, is merged into it. The merged entry keeps the *earliest*
//!    snapshot, so one undo reverts the whole burst.

use std::borrow::Cow;
use std::collections::VecDeque;

use crate::state::FocusTarget;

/// Default bound on each stack.
pub const DEFAULT_CAP: usize = 50;

/// One undoable step.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry<D> {
    /// Command that produced the change.
    pub command: Cow<'static, str>,
    /// Logical field the command edited, when tagged.
    pub field: Option<String>,
    /// When the entry was recorded (or last extended by coalescing), in milliseconds.
    pub timestamp: u64,
    /// `data` before the command.
    pub data: D,
    /// Focus before the command.
    pub focus: Option<FocusTarget>,
}

/// Bounded past/future stacks.
#[derive(Clone, Debug)]
pub struct History<D> {
    past: VecDeque<HistoryEntry<D>>,
    future: VecDeque<HistoryEntry<D>>,
    cap: usize,
}

impl<D> Default for History<D> {
    fn default() -> Self {
        Self::with_cap(DEFAULT_CAP)
    }
}

impl<D> History<D> {
    /// Empty history with a bound of `cap` entries per stack.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            cap,
        }
    }

    /// Bound on each stack.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the bound, evicting the oldest entries if needed.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        Self::enforce(&mut self.past, cap);
        Self::enforce(&mut self.future, cap);
    }

    /// Record an entry, coalescing with the previous one when `coalesce_window` allows.
    ///
    /// `coalesce_window` is `None` for commands that never coalesce. Returns `true` when the
    /// entry was merged into the previous one.
    pub fn record(&mut self, entry: HistoryEntry<D>, coalesce_window: Option<u64>) -> bool {
        self.future.clear();
        if let (Some(window), Some(last)) = (coalesce_window, self.past.back_mut())
            && entry.field.is_some()
            && last.command == entry.command
            && last.field == entry.field
            && entry.timestamp.saturating_sub(last.timestamp) <= window
        {
            last.timestamp = entry.timestamp;
            return true;
        }
        self.past.push_back(entry);
        Self::enforce(&mut self.past, self.cap);
        false
    }

    /// Pop the newest past entry, pushing `current` onto the future stack.
    ///
    /// Returns `None` (and drops `current`) when there is nothing to undo.
    pub fn undo(&mut self, current: HistoryEntry<D>) -> Option<HistoryEntry<D>> {
        let entry = self.past.pop_back()?;
        self.future.push_back(current);
        Self::enforce(&mut self.future, self.cap);
        Some(entry)
    }

    /// Pop the newest future entry, pushing `current` onto the past stack.
    ///
    /// Returns `None` (and drops `current`) when there is nothing to redo.
    pub fn redo(&mut self, current: HistoryEntry<D>) -> Option<HistoryEntry<D>> {
        let entry = self.future.pop_back()?;
        self.past.push_back(current);
        Self::enforce(&mut self.past, self.cap);
        Some(entry)
    }

    /// Whether undo has something to restore.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether redo has something to restore.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable entries.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable entries.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Past entries, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &HistoryEntry<D>> {
        self.past.iter()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn enforce(stack: &mut VecDeque<HistoryEntry<D>>, cap: usize) {
        while stack.len() > cap {
            stack.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        command: &'static str,
        field: Option<&str>,
        timestamp: u64,
        data: u32,
    ) -> HistoryEntry<u32> {
        HistoryEntry {
            command: Cow::Borrowed(command),
            field: field.map(String::from),
            timestamp,
            data,
            focus: None,
        }
    }

    #[test]
    fn undo_and_redo_swap_entries() {
        let mut h = History::default();
        h.record(entry("SET", None, 0, 1), None);
        let undone = h.undo(entry("SET", None, 10, 2)).unwrap();
        assert_eq!(undone.data, 1);
        assert!(h.can_redo());
        let redone = h.redo(entry("SET", None, 20, 1)).unwrap();
        assert_eq!(redone.data, 2);
        assert_eq!(h.undo_depth(), 1);
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn underflow_is_a_no_op() {
        let mut h: History<u32> = History::default();
        assert!(h.undo(entry("SET", None, 0, 0)).is_none());
        assert!(h.redo(entry("SET", None, 0, 0)).is_none());
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn new_record_clears_future() {
        let mut h = History::default();
        h.record(entry("A", None, 0, 1), None);
        h.undo(entry("A", None, 1, 2));
        assert!(h.can_redo());
        h.record(entry("B", None, 2, 1), None);
        assert!(!h.can_redo());
    }

    #[test]
    fn cap_evicts_the_oldest() {
        let mut h = History::with_cap(3);
        for i in 0..5 {
            h.record(entry("A", None, u64::from(i), i), None);
        }
        let data: Vec<u32> = h.past().map(|e| e.data).collect();
        assert_eq!(data, [2, 3, 4]);
    }

    #[test]
    fn same_field_burst_coalesces_to_the_earliest_snapshot() {
        let mut h = History::default();
        for (i, t) in (0_u32..).zip([0_u64, 100, 200, 300, 400]) {
            let merged = h.record(entry("SYNC", Some("title"), t, i), Some(500));
            assert_eq!(merged, i > 0);
        }
        assert_eq!(h.undo_depth(), 1);
        assert_eq!(h.past().next().map(|e| e.data), Some(0));
    }

    #[test]
    fn coalescing_needs_same_field_and_window() {
        let mut h = History::default();
        h.record(entry("SYNC", Some("title"), 0, 0), Some(500));
        assert!(!h.record(entry("SYNC", Some("body"), 100, 1), Some(500)));
        assert!(!h.record(entry("SYNC", Some("body"), 700, 2), Some(500)));
        assert!(!h.record(entry("OTHER", Some("body"), 750, 3), Some(500)));
        assert!(!h.record(entry("OTHER", None, 760, 4), Some(500)));
        assert_eq!(h.undo_depth(), 5);
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Bounded, linear undo/redo history of rendered snapshots.
//!
//! The stack evicts the oldest entry once capacity is exceeded and discards
//! any redo branch when a new entry is pushed after an undo.

use crate::domain::editing::HistoryCapacity;
use crate::error::{Error, HistoryDirection, Result};
use crate::media::RasterBuffer;
use std::collections::VecDeque;

/// Immutable snapshot of what the user saw at commit time.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    snapshot: RasterBuffer,
    digest: blake3::Hash,
    label: &'static str,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(snapshot: RasterBuffer, label: &'static str) -> Self {
        let digest = snapshot.digest();
        Self {
            snapshot,
            digest,
            label,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &RasterBuffer {
        &self.snapshot
    }

    /// Operation that produced this entry ("load", "crop", "filter", ...).
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn digest(&self) -> blake3::Hash {
        self.digest
    }

    /// Returns true if both entries hold byte-identical pixels.
    #[must_use]
    pub fn same_pixels(&self, other: &Self) -> bool {
        self.digest == other.digest && self.snapshot == other.snapshot
    }
}

/// Result of a [`HistoryStack::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// A new entry was appended.
    Committed,
    /// The entry matched the current one and was dropped.
    Unchanged,
}

impl PushOutcome {
    #[must_use]
    pub fn is_committed(self) -> bool {
        self == PushOutcome::Committed
    }
}

/// Linear history with a cursor.
///
/// `cursor` is `None` exactly when the stack is empty; otherwise it indexes
/// the entry the session is currently showing.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    cursor: Option<usize>,
    capacity: HistoryCapacity,
}

impl HistoryStack {
    #[must_use]
    pub fn new(capacity: HistoryCapacity) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.value()),
            cursor: None,
            capacity,
        }
    }

    /// Pushes `entry` unless it is byte-identical to the current entry.
    pub fn push(&mut self, entry: HistoryEntry) -> PushOutcome {
        if let Some(current) = self.current() {
            if current.same_pixels(&entry) {
                tracing::debug!(label = entry.label, "skipping unchanged history entry");
                return PushOutcome::Unchanged;
            }
        }
        self.append(entry);
        PushOutcome::Committed
    }

    /// Returns true if `snapshot` holds the same pixels as the current entry,
    /// i.e. pushing it would be [`PushOutcome::Unchanged`].
    #[must_use]
    pub fn is_current(&self, snapshot: &RasterBuffer) -> bool {
        self.current()
            .is_some_and(|current| current.snapshot() == snapshot)
    }

    /// Pushes `entry` unconditionally. Used for the snapshot taken on load.
    pub fn push_initial(&mut self, entry: HistoryEntry) {
        self.append(entry);
    }

    fn append(&mut self, entry: HistoryEntry) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        tracing::debug!(label = entry.label, len = self.entries.len() + 1, "history push");
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity.value() {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Moves one step back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMoreHistory`] at the oldest entry or when empty.
    pub fn undo(&mut self) -> Result<&HistoryEntry> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                Ok(&self.entries[cursor - 1])
            }
            _ => Err(Error::NoMoreHistory(HistoryDirection::Undo)),
        }
    }

    /// Moves one step forward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMoreHistory`] at the newest entry or when empty.
    pub fn redo(&mut self) -> Result<&HistoryEntry> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => {
                self.cursor = Some(cursor + 1);
                Ok(&self.entries[cursor + 1])
            }
            _ => Err(Error::NoMoreHistory(HistoryDirection::Redo)),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.entries.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> HistoryCapacity {
        self.capacity
    }

    /// Labels from oldest to newest.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(HistoryEntry::label)
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(HistoryCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: u8) -> HistoryEntry {
        HistoryEntry::new(
            RasterBuffer::from_rgba(1, 1, vec![value, value, value, 255]).unwrap(),
            "test",
        )
    }

    fn value_of(entry: &HistoryEntry) -> u8 {
        entry.snapshot().rgba_bytes()[0]
    }

    #[test]
    fn empty_stack_has_no_cursor() {
        let mut stack = HistoryStack::default();
        assert!(stack.is_empty());
        assert_eq!(stack.cursor(), None);
        assert_eq!(
            stack.undo().unwrap_err(),
            Error::NoMoreHistory(HistoryDirection::Undo)
        );
        assert_eq!(
            stack.redo().unwrap_err(),
            Error::NoMoreHistory(HistoryDirection::Redo)
        );
    }

    #[test]
    fn is_current_matches_only_the_cursor_entry() {
        let mut stack = HistoryStack::default();
        assert!(!stack.is_current(entry(0).snapshot()));
        stack.push_initial(entry(0));
        stack.push(entry(1));
        assert!(stack.is_current(entry(1).snapshot()));
        assert!(!stack.is_current(entry(0).snapshot()));
        stack.undo().unwrap();
        assert!(stack.is_current(entry(0).snapshot()));
    }

    #[test]
    fn push_moves_cursor_to_newest() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(0));
        assert_eq!(stack.push(entry(1)), PushOutcome::Committed);
        assert_eq!(stack.cursor(), Some(1));
        assert_eq!(value_of(stack.current().unwrap()), 1);
    }

    #[test]
    fn identical_push_is_ignored() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(7));
        assert_eq!(stack.push(entry(7)), PushOutcome::Unchanged);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn initial_push_always_commits() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(7));
        stack.push_initial(entry(7));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(0));
        stack.push(entry(1));
        stack.push(entry(2));

        assert_eq!(value_of(stack.undo().unwrap()), 1);
        assert_eq!(value_of(stack.redo().unwrap()), 2);
        assert!(!stack.can_redo());
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(0));
        stack.push(entry(1));
        stack.push(entry(2));
        stack.undo().unwrap();
        stack.undo().unwrap();

        stack.push(entry(9));
        assert_eq!(stack.len(), 2);
        assert!(!stack.can_redo());
        assert_eq!(value_of(stack.undo().unwrap()), 0);
    }

    #[test]
    fn eleventh_push_evicts_oldest() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(0));
        for value in 1..=10 {
            stack.push(entry(value));
        }
        assert_eq!(stack.len(), 10);
        assert_eq!(stack.cursor(), Some(9));

        let mut steps = 0;
        while stack.undo().is_ok() {
            steps += 1;
        }
        assert_eq!(steps, 9);
        assert_eq!(value_of(stack.current().unwrap()), 1);
    }

    #[test]
    fn capacity_one_keeps_only_latest() {
        let mut stack = HistoryStack::new(HistoryCapacity::new(1));
        stack.push_initial(entry(0));
        stack.push(entry(1));
        assert_eq!(stack.len(), 1);
        assert!(!stack.can_undo());
        assert_eq!(value_of(stack.current().unwrap()), 1);
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut stack = HistoryStack::default();
        stack.push_initial(entry(0));
        stack.push(entry(1));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.cursor(), None);
        assert!(!stack.can_undo());
    }

    #[test]
    fn labels_are_listed_oldest_first() {
        let mut stack = HistoryStack::default();
        stack.push_initial(HistoryEntry::new(entry(0).snapshot().clone(), "load"));
        stack.push(HistoryEntry::new(entry(1).snapshot().clone(), "crop"));
        assert_eq!(stack.labels().collect::<Vec<_>>(), vec!["load", "crop"]);
    }
}

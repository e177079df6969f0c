// SPDX-License-Identifier: MPL-2.0
//! Undo, redo and revert handlers.

use super::EditSession;
use crate::error::{Error, HistoryDirection, Result};
use crate::media::{PushOutcome, RasterBuffer};

impl EditSession {
    /// Steps back one commit and returns the restored surface.
    ///
    /// A slider change that has not settled yet is committed first, so undo
    /// always reverts the most recent visible change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMoreHistory`] at the oldest entry and
    /// [`Error::LoadInProgress`] while a load is pending. The session is
    /// unchanged in both cases.
    pub fn undo(&mut self) -> Result<&RasterBuffer> {
        self.ensure_not_loading()?;
        let can_undo = if self.pending_change_would_commit() {
            // The flushed change becomes the newest entry, with its predecessor
            // still in the stack unless capacity is one.
            self.history.capacity().value() > 1
        } else {
            self.history.can_undo()
        };
        if !can_undo {
            return Err(Error::NoMoreHistory(HistoryDirection::Undo));
        }
        self.commit_adjustments();
        let snapshot = self.history.undo()?.snapshot().clone();
        tracing::info!(cursor = ?self.history.cursor(), "undo");
        self.replace_base(snapshot);
        Ok(self.surface())
    }

    /// Steps forward one commit and returns the restored surface.
    ///
    /// An unsettled slider change that differs from the current entry would
    /// discard the redo branch when committed, so redo is refused instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMoreHistory`] at the newest entry or while such a
    /// change is pending, and [`Error::LoadInProgress`] while a load is
    /// pending. The session is unchanged in every case.
    pub fn redo(&mut self) -> Result<&RasterBuffer> {
        self.ensure_not_loading()?;
        if self.pending_change_would_commit() || !self.history.can_redo() {
            return Err(Error::NoMoreHistory(HistoryDirection::Redo));
        }
        self.commit_adjustments();
        let snapshot = self.history.redo()?.snapshot().clone();
        tracing::info!(cursor = ?self.history.cursor(), "redo");
        self.replace_base(snapshot);
        Ok(self.surface())
    }

    /// Restores the image as it was loaded and commits it.
    ///
    /// # Errors
    ///
    /// Returns an editability error when there is nothing to edit.
    pub fn revert_to_original(&mut self) -> Result<PushOutcome> {
        self.ensure_editable()?;
        let original = self.original.clone();
        self.replace_base(original);
        tracing::info!("reverted to original");
        Ok(self.commit("revert"))
    }

    /// Returns true if flushing the debounced slider change would push a new entry.
    fn pending_change_would_commit(&self) -> bool {
        self.debounce.is_pending() && !self.history.is_current(self.surface())
    }

    fn ensure_not_loading(&self) -> Result<()> {
        if self.is_loading() {
            Err(Error::LoadInProgress)
        } else {
            Ok(())
        }
    }
}

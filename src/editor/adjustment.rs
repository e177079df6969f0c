// SPDX-License-Identifier: MPL-2.0
//! Slider and filter handlers.
//!
//! Slider moves re-render immediately but only reach the history once the
//! input settles. Filter choices are discrete and commit at once. Neither
//! touches `base`: the adjustments stay editable until a transform, undo or
//! remote result bakes them in.

use super::EditSession;
use crate::domain::editing::{AdjustmentField, FilterName};
use crate::error::Result;
use crate::media::PushOutcome;
use std::time::Instant;

impl EditSession {
    /// Moves one slider and arms the settle timer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::LoadInProgress`] or
    /// [`crate::error::Error::NoImageLoaded`] when there is nothing to edit.
    pub fn set_adjustment(&mut self, field: AdjustmentField, value: f32, now: Instant) -> Result<()> {
        self.ensure_editable()?;
        self.adjustments.set(field, value);
        self.rerender();
        self.debounce.arm(now);
        self.touch();
        tracing::debug!(?field, value = self.adjustments.get(field), "adjustment changed");
        Ok(())
    }

    /// Commits the pending slider change if its quiet period has elapsed.
    ///
    /// Returns `None` when nothing was due.
    pub fn poll_settled(&mut self, now: Instant) -> Option<PushOutcome> {
        if self.debounce.take_if_due(now) {
            Some(self.commit("adjust"))
        } else {
            None
        }
    }

    /// Commits the pending slider change now (input released).
    ///
    /// Returns `None` when no change was pending.
    pub fn commit_adjustments(&mut self) -> Option<PushOutcome> {
        if self.debounce.take() {
            Some(self.commit("adjust"))
        } else {
            None
        }
    }

    /// Returns true while a slider change is waiting to settle.
    #[must_use]
    pub fn has_pending_adjustment(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Selects a named filter and commits the result.
    ///
    /// A pending slider change is included in the same commit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::LoadInProgress`] or
    /// [`crate::error::Error::NoImageLoaded`] when there is nothing to edit.
    pub fn apply_filter_name(&mut self, name: FilterName) -> Result<PushOutcome> {
        self.ensure_editable()?;
        self.adjustments.filter = name;
        self.debounce.cancel();
        self.rerender();
        self.touch();
        tracing::info!(filter = %name, "filter applied");
        Ok(self.commit("filter"))
    }

    /// Puts every slider and the filter back to identity without committing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::LoadInProgress`] or
    /// [`crate::error::Error::NoImageLoaded`] when there is nothing to edit.
    pub fn reset_adjustments(&mut self) -> Result<()> {
        self.ensure_editable()?;
        self.adjustments.reset();
        self.debounce.cancel();
        self.rerender();
        self.touch();
        Ok(())
    }
}

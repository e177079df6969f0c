// SPDX-License-Identifier: MPL-2.0
//! Geometric transform handler.

use super::EditSession;
use crate::domain::editing::TransformOp;
use crate::error::Result;
use crate::media::{PushOutcome, TransformEngine};

impl EditSession {
    /// Transforms what the user currently sees and commits the result.
    ///
    /// The visible surface, adjustments included, becomes the new base and
    /// the adjustments return to identity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidGeometry`] for bad parameters,
    /// or an editability error when there is nothing to edit. The session is
    /// unchanged in both cases.
    pub fn apply_transform(&mut self, op: TransformOp) -> Result<PushOutcome> {
        self.ensure_editable()?;
        let transformed = TransformEngine::apply(self.surface(), &op).inspect_err(|err| {
            tracing::warn!(op = op.name(), error = %err, "transform rejected");
        })?;
        tracing::info!(
            op = op.name(),
            width = transformed.width(),
            height = transformed.height(),
            "transform applied"
        );
        self.replace_base(transformed);
        Ok(self.commit(op.name()))
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Editing session: one image, its live adjustments and its history.
//!
//! [`EditSession`] is the single owner of the live [`RasterBuffer`], the
//! [`AdjustmentState`] applied on top of it, the [`HistoryStack`] and the
//! [`CompositeRenderer`]. Operations are grouped by concern in the
//! submodules, each adding an `impl EditSession` block:
//!
//! - [`loading`]: load/reload/clear with the stale-completion guard
//! - `adjustment`: sliders (debounced) and named filters
//! - `transform`: crop, resize, rotate and flip
//! - `history`: undo, redo and revert to original
//! - [`remote`]: hand-off to the remote processing service
//! - [`export`]: encoding the visible surface
//!
//! Every operation validates and computes before touching any field, so a
//! failed call leaves the session exactly as it was.
//!
//! # Example
//!
//! ```
//! use clarifi_studio::domain::editing::{FilterName, RotationAngle, TransformOp};
//! use clarifi_studio::editor::{EditSession, ImageSource};
//! use clarifi_studio::media::{codec, ExportFormat, RasterBuffer};
//! use clarifi_studio::domain::editing::ExportQuality;
//!
//! # fn main() -> clarifi_studio::error::Result<()> {
//! let png = codec::encode(
//!     &RasterBuffer::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])?,
//!     ExportFormat::Png,
//!     ExportQuality::default(),
//! )?;
//!
//! let mut session = EditSession::default();
//! session.load_image(ImageSource::from_bytes(png).with_name("red.png"))?;
//! session.apply_filter_name(FilterName::Grayscale)?;
//! session.apply_transform(TransformOp::Rotate(RotationAngle::from_degrees(90)?))?;
//! assert_eq!(session.surface().dimensions(), (1, 2));
//!
//! session.undo()?;
//! assert_eq!(session.surface().dimensions(), (2, 1));
//! # Ok(())
//! # }
//! ```

mod adjustment;
pub mod debounce;
pub mod export;
mod history;
pub mod loading;
pub mod remote;
mod transform;


pub use debounce::Debouncer;
pub use export::{ExportFlow, ExportedImage};
pub use loading::{ImageSource, LoadMode, LoadOutcome, LoadTicket};
pub use remote::{RemoteJob, RemoteOutcome, RemoteTicket};

use crate::config::Config;
use crate::domain::editing::ExportQuality;
use crate::error::{Error, Result};
use crate::media::{
    AdjustmentState, CompositeRenderer, ExportFormat, HistoryEntry, HistoryStack, PushOutcome,
    RasterBuffer, SurfaceSink,
};

/// Snapshot of session state for UI observers (buttons, dimension labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub has_image: bool,
    pub width: u32,
    pub height: u32,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_len: usize,
    pub loading: bool,
}

/// Live editing state for one image.
#[derive(Debug)]
pub struct EditSession {
    /// Live pixels that adjustments are rendered on top of.
    base: RasterBuffer,
    /// Buffer as loaded, used by `revert_to_original`.
    original: RasterBuffer,
    adjustments: AdjustmentState,
    history: HistoryStack,
    renderer: CompositeRenderer,
    debounce: Debouncer,
    /// File name without extension, used for export file names.
    source_name: Option<String>,
    /// Incremented by every load and clear; tickets from older generations are stale.
    generation: u64,
    /// Generation of the load still waiting for its decode, if any.
    pending_load: Option<u64>,
    /// Incremented by every change of the visible surface.
    revision: u64,
    export_format: ExportFormat,
    export_quality: ExportQuality,
    export_suffix: String,
}

impl EditSession {
    /// Creates an empty session configured from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            base: RasterBuffer::empty(),
            original: RasterBuffer::empty(),
            adjustments: AdjustmentState::default(),
            history: HistoryStack::new(config.history_capacity()),
            renderer: CompositeRenderer::new(),
            debounce: Debouncer::new(config.debounce()),
            source_name: None,
            generation: 0,
            pending_load: None,
            revision: 0,
            export_format: config.export_format(),
            export_quality: config.export_quality(),
            export_suffix: config.export_suffix().to_string(),
        }
    }

    /// Routes every rendered surface to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn SurfaceSink>) -> Self {
        self.renderer = CompositeRenderer::new().with_sink(sink);
        self.rerender();
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// What the user currently sees: `base` rendered with `adjustments`.
    #[must_use]
    pub fn surface(&self) -> &RasterBuffer {
        self.renderer.surface()
    }

    /// Live pixels without the current adjustments.
    #[must_use]
    pub fn base(&self) -> &RasterBuffer {
        &self.base
    }

    #[must_use]
    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.base.is_empty()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// File name of the loaded image without its extension.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Counter that changes whenever the visible surface changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        let (width, height) = self.surface().dimensions();
        SessionStatus {
            has_image: self.has_image(),
            width,
            height,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            history_len: self.history.len(),
            loading: self.is_loading(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Resets to the empty state and invalidates any pending load.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending_load = None;
        self.reset_contents();
        tracing::info!(generation = self.generation, "session cleared");
    }

    fn reset_contents(&mut self) {
        self.base = RasterBuffer::empty();
        self.original = RasterBuffer::empty();
        self.adjustments.reset();
        self.history.clear();
        self.debounce.cancel();
        self.source_name = None;
        self.renderer.clear();
        self.touch();
    }

    // ------------------------------------------------------------------
    // Shared helpers for the operation modules
    // ------------------------------------------------------------------

    /// Fails unless an image is loaded and no load is pending.
    fn ensure_editable(&self) -> Result<()> {
        if self.is_loading() {
            return Err(Error::LoadInProgress);
        }
        if !self.has_image() {
            return Err(Error::NoImageLoaded);
        }
        Ok(())
    }

    fn rerender(&mut self) {
        self.renderer.render(&self.base, &self.adjustments);
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replaces `base`, bakes adjustments away and re-renders.
    fn replace_base(&mut self, base: RasterBuffer) {
        self.base = base;
        self.adjustments.reset();
        self.debounce.cancel();
        self.rerender();
        self.touch();
    }

    /// Pushes the visible surface onto the history.
    fn commit(&mut self, label: &'static str) -> PushOutcome {
        let entry = HistoryEntry::new(self.surface().clone(), label);
        let outcome = self.history.push(entry);
        if outcome.is_committed() {
            tracing::info!(
                label,
                len = self.history.len(),
                cursor = ?self.history.cursor(),
                "committed"
            );
        }
        outcome
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Composite renderer producing the visible surface.

use crate::media::adjustment::{self, AdjustmentState};
use crate::media::RasterBuffer;

/// Receives every freshly rendered surface, e.g. a canvas or a preview cache.
pub trait SurfaceSink: Send {
    fn present(&mut self, surface: &RasterBuffer);
}

/// Owns the last rendered surface and forwards it to an optional sink.
///
/// The surface is always `adjustment::render(base, adjustments)` for the most
/// recent inputs; callers never mutate it directly.
#[derive(Default)]
pub struct CompositeRenderer {
    surface: RasterBuffer,
    sink: Option<Box<dyn SurfaceSink>>,
    frames: u64,
}

impl CompositeRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sink that is notified after every render.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn SurfaceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Renders `base` with `adjustments` and presents the result.
    pub fn render(&mut self, base: &RasterBuffer, adjustments: &AdjustmentState) -> &RasterBuffer {
        self.surface = adjustment::render(base, adjustments);
        self.frames += 1;
        tracing::debug!(
            width = self.surface.width(),
            height = self.surface.height(),
            frame = self.frames,
            "rendered surface"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.present(&self.surface);
        }
        &self.surface
    }

    /// The surface from the last render.
    #[must_use]
    pub fn surface(&self) -> &RasterBuffer {
        &self.surface
    }

    /// Drops the surface and presents an empty one.
    pub fn clear(&mut self) {
        self.render(&RasterBuffer::empty(), &AdjustmentState::default());
    }

    /// Number of renders performed so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl std::fmt::Debug for CompositeRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRenderer")
            .field("surface", &self.surface)
            .field("has_sink", &self.sink.is_some())
            .field("frames", &self.frames)
            .finish()
    }
}

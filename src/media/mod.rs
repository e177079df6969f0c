// SPDX-License-Identifier: MPL-2.0
//! Pixel-level building blocks for the editor.
//!
//! This module owns everything that touches pixels: the immutable
//! [`RasterBuffer`], geometric transforms, colour adjustments, the composite
//! renderer, the snapshot history and the codecs used for import and export.

pub mod adjustment;
pub mod codec;
pub mod history;
pub mod raster;
pub mod renderer;
pub mod transform;

pub use adjustment::AdjustmentState;
pub use codec::ExportFormat;
pub use history::{HistoryEntry, HistoryStack, PushOutcome};
pub use raster::RasterBuffer;
pub use renderer::{CompositeRenderer, SurfaceSink};
pub use transform::TransformEngine;

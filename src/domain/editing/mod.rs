// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for image editing operations:
//! - [`AdjustmentFactor`] / [`HueShift`]: slider values
//! - [`RotationAngle`], [`CropInsets`], [`ResizeRequest`], [`FlipAxis`]: geometry
//! - [`FilterName`]: named stylistic filters
//! - [`HistoryCapacity`], [`ExportQuality`]: session and export limits

pub mod newtypes;
pub mod types;

pub use newtypes::{AdjustmentFactor, ExportQuality, HistoryCapacity, HueShift, RotationAngle};
pub use types::{
    AdjustmentField, CropInsets, CropRect, FilterName, FlipAxis, ResizeRequest, TransformOp,
};

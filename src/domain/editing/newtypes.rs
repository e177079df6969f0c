// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for editing values,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    DEFAULT_ADJUSTMENT_FACTOR, DEFAULT_EXPORT_QUALITY, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_HUE_SHIFT, MAX_ADJUSTMENT_FACTOR, MAX_EXPORT_QUALITY, MAX_HISTORY_CAPACITY,
    MAX_HUE_SHIFT, MIN_ADJUSTMENT_FACTOR, MIN_EXPORT_QUALITY, MIN_HISTORY_CAPACITY,
    MIN_HUE_SHIFT,
};
use crate::error::{Error, Result};

/// Clamps `value` into `[min, max]`, mapping NaN to `fallback`.
fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

// =============================================================================
// AdjustmentFactor
// =============================================================================

/// Multiplicative adjustment factor for brightness, contrast and saturation.
///
/// Always within `0.0..=2.0`; `1.0` leaves the image unchanged.
///
/// # Example
///
/// ```
/// use clarifi_studio::domain::editing::AdjustmentFactor;
///
/// assert_eq!(AdjustmentFactor::new(1.5).value(), 1.5);
/// assert_eq!(AdjustmentFactor::new(7.0).value(), 2.0); // clamped
/// assert!(AdjustmentFactor::default().is_neutral());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentFactor(f32);

impl AdjustmentFactor {
    /// Creates a new factor, clamping to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(clamp_finite(
            value,
            MIN_ADJUSTMENT_FACTOR,
            MAX_ADJUSTMENT_FACTOR,
            DEFAULT_ADJUSTMENT_FACTOR,
        ))
    }

    /// Returns the raw factor.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns whether this factor leaves pixels untouched.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - DEFAULT_ADJUSTMENT_FACTOR).abs() < f32::EPSILON
    }
}

impl Default for AdjustmentFactor {
    fn default() -> Self {
        Self(DEFAULT_ADJUSTMENT_FACTOR)
    }
}

// =============================================================================
// HueShift
// =============================================================================

/// Hue rotation as a fraction of the full circle, within `-0.5..=0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueShift(f32);

impl HueShift {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(clamp_finite(
            value,
            MIN_HUE_SHIFT,
            MAX_HUE_SHIFT,
            DEFAULT_HUE_SHIFT,
        ))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Shift expressed in degrees.
    #[must_use]
    pub fn degrees(self) -> f32 {
        self.0 * 360.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0.abs() < f32::EPSILON
    }
}

impl Default for HueShift {
    fn default() -> Self {
        Self(DEFAULT_HUE_SHIFT)
    }
}

// =============================================================================
// ExportQuality
// =============================================================================

/// Lossy encoder quality in `0.0..=1.0`.
///
/// Only JPEG honours it; PNG and WebP are encoded losslessly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportQuality(f32);

impl ExportQuality {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(clamp_finite(
            value,
            MIN_EXPORT_QUALITY,
            MAX_EXPORT_QUALITY,
            DEFAULT_EXPORT_QUALITY,
        ))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality on the 1..=100 scale used by the JPEG encoder.
    #[must_use]
    pub fn as_percent(self) -> u8 {
        // Value is clamped to 0..=1 so the product fits in u8.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.0 * 100.0).round() as u8;
        percent.max(1)
    }
}

impl Default for ExportQuality {
    fn default() -> Self {
        Self(DEFAULT_EXPORT_QUALITY)
    }
}

// =============================================================================
// HistoryCapacity
// =============================================================================

/// Maximum number of snapshots held by the undo/redo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCapacity(usize);

impl HistoryCapacity {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for HistoryCapacity {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_CAPACITY)
    }
}

// =============================================================================
// RotationAngle
// =============================================================================

/// Clockwise rotation angle in 90° increments.
///
/// Unlike the clamping newtypes above, an angle that is not a multiple of 90
/// is rejected rather than rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationAngle(u16);

impl RotationAngle {
    /// No rotation (0°).
    pub const ZERO: Self = Self(0);

    /// Creates a clockwise rotation, canonicalized into `{0, 90, 180, 270}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if `degrees` is not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        // rem_euclid keeps the value in 0..360.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let canonical = degrees.rem_euclid(360) as u16;
        Ok(Self(canonical))
    }

    /// Returns the angle in degrees.
    #[must_use]
    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Returns true if width and height trade places.
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        self.0 == 90 || self.0 == 270
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Tests
// =============================================================================

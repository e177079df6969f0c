// SPDX-License-Identifier: MPL-2.0
//! Editing command types: filters, geometry requests and adjustment fields.

use super::RotationAngle;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// FilterName
// =============================================================================

/// Named stylistic filter applied after the linear adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterName {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Blur,
    Sharpen,
}

impl FilterName {
    /// Returns all filters in display order.
    #[must_use]
    pub fn all() -> &'static [FilterName] {
        &[
            FilterName::None,
            FilterName::Grayscale,
            FilterName::Sepia,
            FilterName::Invert,
            FilterName::Blur,
            FilterName::Sharpen,
        ]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterName::None => "none",
            FilterName::Grayscale => "grayscale",
            FilterName::Sepia => "sepia",
            FilterName::Invert => "invert",
            FilterName::Blur => "blur",
            FilterName::Sharpen => "sharpen",
        }
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FilterName::all()
            .iter()
            .copied()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownOperation(format!("filter '{s}'")))
    }
}

// =============================================================================
// Adjustment fields
// =============================================================================

/// Continuous slider controlled by the adjustment panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentField {
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

impl AdjustmentField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentField::Brightness => "brightness",
            AdjustmentField::Contrast => "contrast",
            AdjustmentField::Saturation => "saturation",
            AdjustmentField::Hue => "hue",
        }
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Mirror axis for flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipAxis {
    /// Mirror left-to-right.
    Horizontal,
    /// Mirror top-to-bottom.
    Vertical,
}

impl FromStr for FlipAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(FlipAxis::Horizontal),
            "vertical" | "v" => Ok(FlipAxis::Vertical),
            other => Err(Error::InvalidGeometry(format!(
                "unknown flip axis '{other}'"
            ))),
        }
    }
}

/// Absolute crop rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Amount of pixels trimmed from each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropInsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropInsets {
    #[must_use]
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Resolves the insets against an image of `width` × `height`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] when the insets meet or cross.
    pub fn to_rect(self, width: u32, height: u32) -> Result<CropRect> {
        let horizontal = u64::from(self.left) + u64::from(self.right);
        let vertical = u64::from(self.top) + u64::from(self.bottom);
        if horizontal >= u64::from(width) || vertical >= u64::from(height) {
            return Err(Error::InvalidGeometry(format!(
                "crop {self:?} leaves no pixels of a {width}x{height} image"
            )));
        }
        Ok(CropRect {
            x: self.left,
            y: self.top,
            width: width - self.left - self.right,
            height: height - self.top - self.bottom,
        })
    }
}

impl FromStr for CropInsets {
    type Err = Error;

    /// Parses `left,top,right,bottom`.
    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<u32> = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::InvalidGeometry(format!("invalid crop '{s}': {e}")))?;
        match values.as_slice() {
            [left, top, right, bottom] => Ok(Self::new(*left, *top, *right, *bottom)),
            _ => Err(Error::InvalidGeometry(format!(
                "crop needs four values left,top,right,bottom, got '{s}'"
            ))),
        }
    }
}

/// Target dimensions for a resize.
///
/// A missing side is derived from the current aspect ratio when
/// `keep_aspect` is set, otherwise it keeps its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect: bool,
}

impl ResizeRequest {
    #[must_use]
    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            keep_aspect: false,
        }
    }

    #[must_use]
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
            keep_aspect: true,
        }
    }

    #[must_use]
    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
            keep_aspect: true,
        }
    }
}

/// Geometric operation handled locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Crop(CropInsets),
    Resize(ResizeRequest),
    Rotate(RotationAngle),
    Flip(FlipAxis),
}

impl TransformOp {
    /// Short name used in logs and history labels.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Crop(_) => "crop",
            TransformOp::Resize(_) => "resize",
            TransformOp::Rotate(_) => "rotate",
            TransformOp::Flip(FlipAxis::Horizontal) => "flip_horizontal",
            TransformOp::Flip(FlipAxis::Vertical) => "flip_vertical",
        }
    }
}

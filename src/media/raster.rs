// SPDX-License-Identifier: MPL-2.0
//! Immutable RGBA pixel buffer shared between the live image and history.

use crate::domain::editing::{CropInsets, CropRect, FlipAxis, ResizeRequest, RotationAngle};
use crate::error::{Error, Result};
use crate::media::transform;
use image_rs::{DynamicImage, RgbaImage};
use std::fmt;
use std::sync::Arc;

/// One image at one point in time.
///
/// Pixels live behind an [`Arc`] so cloning a buffer (for the renderer, a
/// history snapshot, or an export job) never copies pixel data. Every
/// geometric operation returns a new buffer; an existing buffer is never
/// mutated.
///
/// A zero-area buffer means "no image loaded".
///
/// # Example
///
/// ```
/// use clarifi_studio::media::RasterBuffer;
///
/// let buffer = RasterBuffer::from_rgba(2, 1, vec![255; 8]).unwrap();
/// assert_eq!(buffer.dimensions(), (2, 1));
/// assert!(RasterBuffer::empty().is_empty());
/// ```
#[derive(Clone)]
pub struct RasterBuffer {
    pixels: Arc<RgbaImage>,
}

impl RasterBuffer {
    /// The "no image" buffer.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_image(RgbaImage::new(0, 0))
    }

    /// Wraps an already decoded RGBA image.
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    /// Converts any decoded image to RGBA8.
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_image(image.to_rgba8())
    }

    /// Builds a buffer from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if `pixels.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let actual = pixels.len();
        RgbaImage::from_raw(width, height, pixels)
            .map(Self::from_image)
            .ok_or_else(|| {
                Error::InvalidGeometry(format!(
                    "RGBA data length mismatch for {width}x{height}: got {actual} bytes"
                ))
            })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Returns true for the zero-area "no image" buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Borrow as an `image` crate buffer.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copies the pixels into a [`DynamicImage`] for encoding.
    #[must_use]
    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8((*self.pixels).clone())
    }

    /// Content hash of dimensions and pixels.
    #[must_use]
    pub fn digest(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width().to_le_bytes());
        hasher.update(&self.height().to_le_bytes());
        hasher.update(self.rgba_bytes());
        hasher.finalize()
    }

    /// Returns true if both buffers share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// See [`transform::resize`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] for an empty request or image.
    pub fn resize_to(&self, request: &ResizeRequest) -> Result<Self> {
        transform::resize(self, request)
    }

    /// See [`transform::crop`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if nothing would remain.
    pub fn crop_to(&self, insets: CropInsets) -> Result<Self> {
        transform::crop(self, insets)
    }

    /// See [`transform::crop_rect`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if `rect` leaves the image bounds.
    pub fn crop_rect(&self, rect: CropRect) -> Result<Self> {
        transform::crop_rect(self, rect)
    }

    #[must_use]
    pub fn rotate(&self, angle: RotationAngle) -> Self {
        transform::rotate(self, angle)
    }

    #[must_use]
    pub fn flip(&self, axis: FlipAxis) -> Self {
        transform::flip(self, axis)
    }
}

impl Default for RasterBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for RasterBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.dimensions() == other.dimensions()
                && self.rgba_bytes() == other.rgba_bytes())
    }
}

impl Eq for RasterBuffer {}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

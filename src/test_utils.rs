// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and synthetic images.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

pub use approx::assert_abs_diff_eq;

use crate::domain::editing::ExportQuality;
use crate::media::{codec, ExportFormat, RasterBuffer};
use image_rs::{ImageBuffer, Rgba};

/// Buffer whose pixels encode their coordinates, so any geometric change is visible.
pub fn gradient(width: u32, height: u32) -> RasterBuffer {
    RasterBuffer::from_image(ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 128, 255])
    }))
}

/// PNG bytes of `buffer`.
pub fn png_bytes(buffer: &RasterBuffer) -> Vec<u8> {
    codec::encode(buffer, ExportFormat::Png, ExportQuality::default()).expect("encode test png")
}

/// PNG bytes of a [`gradient`].
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(&gradient(width, height))
}

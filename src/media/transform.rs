// SPDX-License-Identifier: MPL-2.0
//! Geometric transformations: crop, resize, rotate and flip.
//!
//! Every function takes a [`RasterBuffer`] by reference and returns a new
//! one. Invalid parameters are reported as [`Error::InvalidGeometry`] before
//! any pixel work starts.

use crate::config::defaults::{MAX_OUTPUT_DIMENSION, MAX_OUTPUT_PIXELS};
use crate::domain::editing::{
    CropInsets, CropRect, FlipAxis, ResizeRequest, RotationAngle, TransformOp,
};
use crate::error::{Error, Result};
use crate::media::RasterBuffer;
use image_rs::imageops::{self, FilterType};

/// Stateless dispatcher from a [`TransformOp`] to the matching function.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformEngine;

impl TransformEngine {
    /// Applies `op` to `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if `buffer` is empty or the
    /// parameters do not describe a non-empty result.
    pub fn apply(buffer: &RasterBuffer, op: &TransformOp) -> Result<RasterBuffer> {
        ensure_not_empty(buffer)?;
        match op {
            TransformOp::Crop(insets) => crop(buffer, *insets),
            TransformOp::Resize(request) => resize(buffer, request),
            TransformOp::Rotate(angle) => Ok(rotate(buffer, *angle)),
            TransformOp::Flip(axis) => Ok(flip(buffer, *axis)),
        }
    }
}

fn ensure_not_empty(buffer: &RasterBuffer) -> Result<()> {
    if buffer.is_empty() {
        return Err(Error::InvalidGeometry("no image to transform".into()));
    }
    Ok(())
}

/// Removes `insets` pixels from each edge.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] when the insets meet or cross.
pub fn crop(buffer: &RasterBuffer, insets: CropInsets) -> Result<RasterBuffer> {
    let rect = insets.to_rect(buffer.width(), buffer.height())?;
    crop_rect(buffer, rect)
}

/// Extracts `rect` from the buffer.
///
/// The rectangle is never clamped; one that leaves the bounds is an error.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] for a zero-area or out-of-bounds rect.
pub fn crop_rect(buffer: &RasterBuffer, rect: CropRect) -> Result<RasterBuffer> {
    let right = u64::from(rect.x) + u64::from(rect.width);
    let bottom = u64::from(rect.y) + u64::from(rect.height);
    if rect.width == 0
        || rect.height == 0
        || right > u64::from(buffer.width())
        || bottom > u64::from(buffer.height())
    {
        return Err(Error::InvalidGeometry(format!(
            "crop {rect:?} is outside a {}x{} image",
            buffer.width(),
            buffer.height()
        )));
    }
    let view = imageops::crop_imm(buffer.as_image(), rect.x, rect.y, rect.width, rect.height);
    Ok(RasterBuffer::from_image(view.to_image()))
}

/// Works out the output size for `request` against a `width` × `height` image.
///
/// A side given as `None` or `0` counts as missing. When exactly one side is
/// given and `keep_aspect` is set, the other is derived from the current
/// aspect ratio and rounded half away from zero; without `keep_aspect` the
/// missing side keeps its current value.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] when neither side is given or the
/// result exceeds [`MAX_OUTPUT_DIMENSION`] or [`MAX_OUTPUT_PIXELS`].
pub fn resolve_resize(width: u32, height: u32, request: &ResizeRequest) -> Result<(u32, u32)> {
    let target_w = request.width.filter(|w| *w > 0);
    let target_h = request.height.filter(|h| *h > 0);

    let derive = |given: u32, given_axis: u32, other_axis: u32| -> u32 {
        let scaled = f64::from(given) * f64::from(other_axis) / f64::from(given_axis);
        // Result is bounded by u32 inputs times a finite ratio.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = scaled.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        rounded
    };

    let (out_w, out_h) = match (target_w, target_h) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) if request.keep_aspect => (w, derive(w, width, height)),
        (None, Some(h)) if request.keep_aspect => (derive(h, height, width), h),
        (Some(w), None) => (w, height),
        (None, Some(h)) => (width, h),
        (None, None) => {
            return Err(Error::InvalidGeometry(
                "resize needs a width or a height".into(),
            ))
        }
    };
    check_output_size(out_w, out_h)?;
    Ok((out_w, out_h))
}

/// Rejects results too large to allocate.
fn check_output_size(width: u32, height: u32) -> Result<()> {
    if width > MAX_OUTPUT_DIMENSION || height > MAX_OUTPUT_DIMENSION {
        return Err(Error::InvalidGeometry(format!(
            "{width}x{height} exceeds the {MAX_OUTPUT_DIMENSION} pixel side limit"
        )));
    }
    if u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS {
        return Err(Error::InvalidGeometry(format!(
            "{width}x{height} exceeds the {MAX_OUTPUT_PIXELS} pixel limit"
        )));
    }
    Ok(())
}

/// Resamples the buffer with a Lanczos3 filter.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] for an empty image or request.
pub fn resize(buffer: &RasterBuffer, request: &ResizeRequest) -> Result<RasterBuffer> {
    ensure_not_empty(buffer)?;
    let (width, height) = resolve_resize(buffer.width(), buffer.height(), request)?;
    if (width, height) == buffer.dimensions() {
        return Ok(buffer.clone());
    }
    let resized = imageops::resize(buffer.as_image(), width, height, FilterType::Lanczos3);
    Ok(RasterBuffer::from_image(resized))
}

/// Rotates clockwise by `angle`.
#[must_use]
pub fn rotate(buffer: &RasterBuffer, angle: RotationAngle) -> RasterBuffer {
    let image = buffer.as_image();
    match angle.degrees() {
        90 => RasterBuffer::from_image(imageops::rotate90(image)),
        180 => RasterBuffer::from_image(imageops::rotate180(image)),
        270 => RasterBuffer::from_image(imageops::rotate270(image)),
        _ => buffer.clone(),
    }
}

/// Mirrors the buffer along `axis`.
#[must_use]
pub fn flip(buffer: &RasterBuffer, axis: FlipAxis) -> RasterBuffer {
    let image = buffer.as_image();
    match axis {
        FlipAxis::Horizontal => RasterBuffer::from_image(imageops::flip_horizontal(image)),
        FlipAxis::Vertical => RasterBuffer::from_image(imageops::flip_vertical(image)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageBuffer, Rgba};

    fn create_test_buffer(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_image(ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 255])))
    }

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_image(ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 7, 255])
        }))
    }

    #[test]
    fn crop_insets_shrink_each_side() {
        let img = create_test_buffer(100, 100);
        let cropped = crop(&img, CropInsets::new(10, 5, 10, 5)).unwrap();
        assert_eq!(cropped.dimensions(), (80, 90));
    }

    #[test]
    fn crop_keeps_the_selected_pixels() {
        let img = gradient(10, 8);
        let cropped = crop(&img, CropInsets::new(2, 3, 1, 1)).unwrap();
        assert_eq!(cropped.dimensions(), (7, 4));
        assert_eq!(cropped.as_image().get_pixel(0, 0).0, [20, 30, 7, 255]);
    }

    #[test]
    fn crop_consuming_everything_is_rejected() {
        let img = create_test_buffer(10, 8);
        assert!(matches!(
            crop(&img, CropInsets::new(5, 0, 5, 0)),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn crop_rect_outside_bounds_is_rejected() {
        let img = create_test_buffer(10, 8);
        let rect = CropRect {
            x: 8,
            y: 6,
            width: 10,
            height: 10,
        };
        assert!(crop_rect(&img, rect).is_err());
    }

    #[test]
    fn resize_exact_dimensions() {
        let img = create_test_buffer(100, 100);
        let resized = resize(&img, &ResizeRequest::exact(200, 100)).unwrap();
        assert_eq!(resized.dimensions(), (200, 100));
    }

    #[test]
    fn resize_derives_missing_side_from_aspect() {
        assert_eq!(
            resolve_resize(400, 300, &ResizeRequest::width(200)).unwrap(),
            (200, 150)
        );
        assert_eq!(
            resolve_resize(400, 300, &ResizeRequest::height(100)).unwrap(),
            (133, 100)
        );
        // 3 * 5 / 2 = 7.5 rounds away from zero.
        assert_eq!(
            resolve_resize(2, 5, &ResizeRequest::width(3)).unwrap(),
            (3, 8)
        );
    }

    #[test]
    fn resize_without_aspect_keeps_missing_side() {
        let request = ResizeRequest {
            width: Some(50),
            height: None,
            keep_aspect: false,
        };
        assert_eq!(resolve_resize(400, 300, &request).unwrap(), (50, 300));
    }

    #[test]
    fn resize_zero_sides_count_as_missing() {
        let request = ResizeRequest {
            width: Some(0),
            height: Some(0),
            keep_aspect: true,
        };
        assert!(matches!(
            resolve_resize(10, 10, &request),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn resize_beyond_side_limit_is_rejected() {
        assert!(matches!(
            resolve_resize(10, 10, &ResizeRequest::exact(u32::MAX, u32::MAX)),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            resolve_resize(10, 10, &ResizeRequest::exact(MAX_OUTPUT_DIMENSION + 1, 1)),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn derived_side_is_checked_against_limits() {
        // 1x1000 scaled to width 100000 would be 100000x100000000.
        assert!(matches!(
            resolve_resize(1, 1000, &ResizeRequest::width(100_000)),
            Err(Error::InvalidGeometry(_))
        ));
        // Both sides fit, the area does not.
        let side = MAX_OUTPUT_DIMENSION;
        assert!(u64::from(side) * u64::from(side) > MAX_OUTPUT_PIXELS);
        assert!(matches!(
            resolve_resize(10, 10, &ResizeRequest::exact(side, side)),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn resize_at_the_limit_is_accepted() {
        assert_eq!(
            resolve_resize(10, 10, &ResizeRequest::exact(MAX_OUTPUT_DIMENSION, 1)).unwrap(),
            (MAX_OUTPUT_DIMENSION, 1)
        );
    }

    #[test]
    fn resize_to_same_size_returns_same_pixels() {
        let img = gradient(6, 4);
        let resized = resize(&img, &ResizeRequest::exact(6, 4)).unwrap();
        assert!(resized.ptr_eq(&img));
    }

    #[test]
    fn rotate_quarter_turn_swaps_dimensions() {
        let img = create_test_buffer(100, 50);
        let rotated = rotate(&img, RotationAngle::from_degrees(90).unwrap());
        assert_eq!(rotated.dimensions(), (50, 100));
    }

    #[test]
    fn rotate_full_turn_is_identity() {
        let img = gradient(5, 3);
        let rotated = rotate(&img, RotationAngle::from_degrees(360).unwrap());
        assert_eq!(rotated, img);
    }

    #[test]
    fn rotate_four_quarter_turns_is_identity() {
        let img = gradient(5, 3);
        let quarter = RotationAngle::from_degrees(90).unwrap();
        let back = (0..4).fold(img.clone(), |acc, _| rotate(&acc, quarter));
        assert_eq!(back, img);
    }

    #[test]
    fn rotate_clockwise_moves_top_left_to_top_right() {
        let img = gradient(3, 2);
        let rotated = rotate(&img, RotationAngle::from_degrees(90).unwrap());
        // Top-left of the source is the bottom-left pixel rotated to the top row.
        assert_eq!(
            rotated.as_image().get_pixel(rotated.width() - 1, 0).0,
            img.as_image().get_pixel(0, 0).0
        );
    }

    #[test]
    fn flip_twice_is_identity() {
        let img = gradient(4, 3);
        for axis in [FlipAxis::Horizontal, FlipAxis::Vertical] {
            assert_eq!(flip(&flip(&img, axis), axis), img);
        }
    }

    #[test]
    fn flip_horizontal_mirrors_pixels_left_to_right() {
        let mut image = ImageBuffer::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        for x in 2..4 {
            for y in 0..2 {
                image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let flipped = flip(&RasterBuffer::from_image(image), FlipAxis::Horizontal);
        assert_eq!(flipped.as_image().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(flipped.as_image().get_pixel(3, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn engine_rejects_empty_buffer() {
        let op = TransformOp::Flip(FlipAxis::Vertical);
        assert!(matches!(
            TransformEngine::apply(&RasterBuffer::empty(), &op),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn engine_dispatches_each_op() {
        let img = create_test_buffer(100, 100);
        let cropped =
            TransformEngine::apply(&img, &TransformOp::Crop(CropInsets::new(10, 5, 10, 5)))
                .unwrap();
        assert_eq!(cropped.dimensions(), (80, 90));
        let resized =
            TransformEngine::apply(&img, &TransformOp::Resize(ResizeRequest::exact(200, 100)))
                .unwrap();
        assert_eq!(resized.dimensions(), (200, 100));
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Non-destructive colour adjustments and stylistic filters.
//!
//! [`render`] is a pure function of the base buffer and an
//! [`AdjustmentState`]. The stages always run in the same order:
//! brightness, contrast, saturation, hue, then the named filter. Neutral
//! stages are skipped, and alpha passes through every stage unchanged.

use crate::domain::editing::{AdjustmentFactor, AdjustmentField, FilterName, HueShift};
use crate::media::RasterBuffer;
use image_rs::{imageops, RgbaImage};

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

const BLUR_SIGMA: f32 = 2.0;
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Live slider and filter values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustmentState {
    pub brightness: AdjustmentFactor,
    pub contrast: AdjustmentFactor,
    pub saturation: AdjustmentFactor,
    pub hue: HueShift,
    pub filter: FilterName,
}

impl AdjustmentState {
    /// Returns true if rendering with this state returns the input unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.brightness.is_neutral()
            && self.contrast.is_neutral()
            && self.saturation.is_neutral()
            && self.hue.is_neutral()
            && self.filter == FilterName::None
    }

    /// Reset every value to identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets one slider, clamping to its range.
    pub fn set(&mut self, field: AdjustmentField, value: f32) {
        match field {
            AdjustmentField::Brightness => self.brightness = AdjustmentFactor::new(value),
            AdjustmentField::Contrast => self.contrast = AdjustmentFactor::new(value),
            AdjustmentField::Saturation => self.saturation = AdjustmentFactor::new(value),
            AdjustmentField::Hue => self.hue = HueShift::new(value),
        }
    }

    #[must_use]
    pub fn get(&self, field: AdjustmentField) -> f32 {
        match field {
            AdjustmentField::Brightness => self.brightness.value(),
            AdjustmentField::Contrast => self.contrast.value(),
            AdjustmentField::Saturation => self.saturation.value(),
            AdjustmentField::Hue => self.hue.value(),
        }
    }
}

/// Applies `state` to `base` and returns the visible surface.
///
/// An identity state returns `base` itself without copying pixels.
#[must_use]
pub fn render(base: &RasterBuffer, state: &AdjustmentState) -> RasterBuffer {
    if base.is_empty() || state.is_identity() {
        return base.clone();
    }

    let mut image = base.as_image().clone();
    if !state.brightness.is_neutral() {
        apply_brightness(&mut image, state.brightness.value());
    }
    if !state.contrast.is_neutral() {
        apply_contrast(&mut image, state.contrast.value());
    }
    if !state.saturation.is_neutral() {
        apply_saturation(&mut image, state.saturation.value());
    }
    if !state.hue.is_neutral() {
        apply_hue(&mut image, state.hue.degrees());
    }
    let image = apply_filter(image, state.filter);
    RasterBuffer::from_image(image)
}

fn to_channel(value: f32) -> u8 {
    // Clamped to 0..=255 first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = value.round().clamp(0.0, 255.0) as u8;
    channel
}

fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Runs `f` over the colour channels of every pixel.
fn map_rgb(image: &mut RgbaImage, mut f: impl FnMut(f32, f32, f32) -> [f32; 3]) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let out = f(f32::from(r), f32::from(g), f32::from(b));
        pixel.0[0] = to_channel(out[0]);
        pixel.0[1] = to_channel(out[1]);
        pixel.0[2] = to_channel(out[2]);
    }
}

fn apply_brightness(image: &mut RgbaImage, factor: f32) {
    map_rgb(image, |r, g, b| [r * factor, g * factor, b * factor]);
}

fn mean_luminance(image: &RgbaImage) -> f32 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0.0;
    }
    let total: f64 = image
        .pixels()
        .map(|p| {
            f64::from(luminance(
                f32::from(p.0[0]),
                f32::from(p.0[1]),
                f32::from(p.0[2]),
            ))
        })
        .sum();
    // Pixel counts stay far below f64 mantissa limits.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let mean = (total / count as f64) as f32;
    mean
}

fn apply_contrast(image: &mut RgbaImage, factor: f32) {
    let mean = mean_luminance(image);
    map_rgb(image, |r, g, b| {
        [
            mean + (r - mean) * factor,
            mean + (g - mean) * factor,
            mean + (b - mean) * factor,
        ]
    });
}

fn apply_saturation(image: &mut RgbaImage, factor: f32) {
    map_rgb(image, |r, g, b| {
        let l = luminance(r, g, b);
        [
            l + (r - l) * factor,
            l + (g - l) * factor,
            l + (b - l) * factor,
        ]
    });
}

/// RGB in 0..=255 to HSV with hue in degrees and s, v in 0..=1.
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta <= f32::EPSILON {
        0.0
    } else if (max - r).abs() <= f32::EPSILON {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() <= f32::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max <= f32::EPSILON { 0.0 } else { delta / max };
    (hue, saturation, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h_prime {
        h if h < 1.0 => (c, x, 0.0),
        h if h < 2.0 => (x, c, 0.0),
        h if h < 3.0 => (0.0, c, x),
        h if h < 4.0 => (0.0, x, c),
        h if h < 5.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [(r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0]
}

fn apply_hue(image: &mut RgbaImage, degrees: f32) {
    map_rgb(image, |r, g, b| {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        hsv_to_rgb(h + degrees, s, v)
    });
}

/// Copies the alpha channel of `source` back onto `target`.
fn restore_alpha(target: &mut RgbaImage, source: &RgbaImage) {
    for (out, src) in target.pixels_mut().zip(source.pixels()) {
        out.0[3] = src.0[3];
    }
}

fn apply_filter(mut image: RgbaImage, filter: FilterName) -> RgbaImage {
    match filter {
        FilterName::None => image,
        FilterName::Grayscale => {
            map_rgb(&mut image, |r, g, b| {
                let l = luminance(r, g, b);
                [l, l, l]
            });
            image
        }
        FilterName::Sepia => {
            map_rgb(&mut image, |r, g, b| {
                SEPIA.map(|row| row[0] * r + row[1] * g + row[2] * b)
            });
            image
        }
        FilterName::Invert => {
            map_rgb(&mut image, |r, g, b| [255.0 - r, 255.0 - g, 255.0 - b]);
            image
        }
        FilterName::Blur => {
            let mut blurred = imageops::blur(&image, BLUR_SIGMA);
            restore_alpha(&mut blurred, &image);
            blurred
        }
        FilterName::Sharpen => {
            let mut sharpened: RgbaImage = imageops::filter3x3(&image, &SHARPEN_KERNEL);
            restore_alpha(&mut sharpened, &image);
            sharpened
        }
    }
}

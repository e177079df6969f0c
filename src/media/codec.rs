// SPDX-License-Identifier: MPL-2.0
//! Decoding of source images and encoding of the rendered surface.
//!
//! Decoding sniffs the container format from the bytes; a declared MIME type
//! is only used to reject obviously non-image uploads early. Encoding covers
//! PNG, JPEG and WebP through the `image` crate.

use crate::domain::editing::ExportQuality;
use crate::error::{Error, Result};
use crate::media::RasterBuffer;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{ExtendedColorType, ImageEncoder, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG format (lossless, keeps alpha).
    #[default]
    Png,
    /// JPEG format (lossy, no alpha).
    Jpeg,
    /// WebP format (lossless encoder, keeps alpha).
    WebP,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::WebP => "webp",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::WebP => "image/webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::WebP => ImageFormat::WebP,
        }
    }

    /// Returns true if the encoder honours [`ExportQuality`].
    #[must_use]
    pub fn is_lossy(self) -> bool {
        self == ExportFormat::Jpeg
    }

    /// Returns all supported formats.
    #[must_use]
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::WebP]
    }

    /// Detects format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::WebP),
            _ => None,
        }
    }

    /// Detects format from a file path extension.
    pub fn from_path(path: &Path) -> Option<ExportFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim())
            .ok_or_else(|| Error::Export(format!("unsupported export format '{s}'")))
    }
}

// =============================================================================
// Decode
// =============================================================================

/// Decodes `bytes` into an RGBA buffer.
///
/// # Errors
///
/// Returns [`Error::Decode`] if `mime` names a non-image type, the bytes
/// are not a supported raster image, or the image has no pixels.
pub fn decode(bytes: &[u8], mime: Option<&str>) -> Result<RasterBuffer> {
    if let Some(mime) = mime {
        if !mime.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(Error::Decode(format!("'{mime}' is not an image type")));
        }
    }
    if bytes.is_empty() {
        return Err(Error::Decode("no image data".into()));
    }
    let image = image_rs::load_from_memory(bytes)?;
    let buffer = RasterBuffer::from_dynamic(&image);
    if buffer.is_empty() {
        return Err(Error::Decode("image has no pixels".into()));
    }
    tracing::debug!(
        width = buffer.width(),
        height = buffer.height(),
        "decoded image"
    );
    Ok(buffer)
}

// =============================================================================
// Encode
// =============================================================================

/// Encodes `buffer` as `format`.
///
/// Only JPEG uses `quality`; it also drops the alpha channel.
///
/// # Errors
///
/// Returns [`Error::Export`] for an empty buffer or an encoder failure.
pub fn encode(buffer: &RasterBuffer, format: ExportFormat, quality: ExportQuality) -> Result<Vec<u8>> {
    if buffer.is_empty() {
        return Err(Error::Export("no image to export".into()));
    }
    let mut out = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            let rgb = buffer.to_dynamic().to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.as_percent())
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| Error::Export(format!("JPEG encoding failed: {e}")))?;
        }
        ExportFormat::Png | ExportFormat::WebP => {
            buffer
                .to_dynamic()
                .write_to(&mut Cursor::new(&mut out), format.image_format())
                .map_err(|e| Error::Export(format!("{format} encoding failed: {e}")))?;
        }
    }
    Ok(out)
}

/// Output of [`compress_to_target`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    /// Quality actually used; `None` for lossless formats.
    pub quality: Option<ExportQuality>,
}

impl CompressedImage {
    #[must_use]
    pub fn fits(&self, target_kb: u64) -> bool {
        self.bytes.len() as u64 <= target_kb.saturating_mul(1024)
    }
}

/// Encodes `buffer` at the highest JPEG quality that fits in `target_kb`.
///
/// Lossless formats are encoded once. If even the lowest quality exceeds
/// the target, the smallest encoding is returned; check
/// [`CompressedImage::fits`].
///
/// # Errors
///
/// Returns [`Error::Export`] for an empty buffer or an encoder failure.
pub fn compress_to_target(
    buffer: &RasterBuffer,
    format: ExportFormat,
    target_kb: u64,
) -> Result<CompressedImage> {
    if !format.is_lossy() {
        let bytes = encode(buffer, format, ExportQuality::default())?;
        return Ok(CompressedImage {
            bytes,
            quality: None,
        });
    }

    let target = target_kb.saturating_mul(1024);
    let at = |percent: u8| -> Result<(ExportQuality, Vec<u8>)> {
        let quality = ExportQuality::new(f32::from(percent) / 100.0);
        encode(buffer, format, quality).map(|bytes| (quality, bytes))
    };

    let (mut low, mut high) = (1u8, 100u8);
    let mut best = at(low)?;
    if best.1.len() as u64 > target {
        tracing::warn!(target_kb, size = best.1.len(), "target size unreachable");
        return Ok(CompressedImage {
            bytes: best.1,
            quality: Some(best.0),
        });
    }
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        let candidate = at(mid)?;
        if candidate.1.len() as u64 <= target {
            best = candidate;
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    tracing::debug!(quality = best.0.as_percent(), size = best.1.len(), "compressed");
    Ok(CompressedImage {
        bytes: best.1,
        quality: Some(best.0),
    })
}

// =============================================================================
// Filenames
// =============================================================================

/// Base name of an uploaded file: the file name without its last extension.
#[must_use]
pub fn base_name(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Builds `{base}_{suffix}.{ext}`, falling back to `clarifi_image` for the base.
#[must_use]
pub fn export_filename(base: Option<&str>, suffix: &str, format: ExportFormat) -> String {
    let base = base
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(crate::config::FALLBACK_EXPORT_BASENAME);
    format!("{base}_{suffix}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageBuffer, Rgba};

    fn sample(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_image(ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 200])
        }))
    }

    #[test]
    fn export_format_extensions() {
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ExportFormat::WebP.extension(), "webp");
    }

    #[test]
    fn export_format_parses_names_and_extensions() {
        assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("WEBP".parse::<ExportFormat>().unwrap(), ExportFormat::WebP);
        assert!(matches!("gif".parse::<ExportFormat>(), Err(Error::Export(_))));
        assert_eq!(
            ExportFormat::from_path(Path::new("out/photo.PNG")),
            Some(ExportFormat::Png)
        );
    }

    #[test]
    fn export_format_default_is_png() {
        assert_eq!(ExportFormat::default(), ExportFormat::Png);
    }

    #[test]
    fn decode_rejects_declared_non_image_mime() {
        let png = encode(&sample(2, 2), ExportFormat::Png, ExportQuality::default()).unwrap();
        assert!(matches!(
            decode(&png, Some("text/plain")),
            Err(Error::Decode(_))
        ));
        assert!(decode(&png, Some("image/png")).is_ok());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode(b"definitely not an image", None),
            Err(Error::Decode(_))
        ));
        assert!(matches!(decode(&[], None), Err(Error::Decode(_))));
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let original = sample(5, 3);
        let png = encode(&original, ExportFormat::Png, ExportQuality::new(0.1)).unwrap();
        assert_eq!(decode(&png, None).unwrap(), original);
    }

    #[test]
    fn webp_round_trip_keeps_pixels() {
        let original = sample(4, 4);
        let webp = encode(&original, ExportFormat::WebP, ExportQuality::new(0.1)).unwrap();
        assert_eq!(decode(&webp, Some("image/webp")).unwrap(), original);
    }

    #[test]
    fn jpeg_drops_alpha_and_keeps_size() {
        let jpeg = encode(&sample(8, 6), ExportFormat::Jpeg, ExportQuality::default()).unwrap();
        let decoded = decode(&jpeg, None).unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert!(decoded.as_image().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn jpeg_quality_affects_size() {
        let buffer = sample(64, 64);
        let low = encode(&buffer, ExportFormat::Jpeg, ExportQuality::new(0.1)).unwrap();
        let high = encode(&buffer, ExportFormat::Jpeg, ExportQuality::new(1.0)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn encoding_empty_buffer_is_an_export_error() {
        for format in ExportFormat::all() {
            assert!(matches!(
                encode(&RasterBuffer::empty(), *format, ExportQuality::default()),
                Err(Error::Export(_))
            ));
        }
    }

    #[test]
    fn compress_to_target_fits_when_possible() {
        let buffer = sample(64, 64);
        let max = encode(&buffer, ExportFormat::Jpeg, ExportQuality::new(1.0)).unwrap();
        let target_kb = (max.len() as u64 / 1024).max(1);
        let compressed = compress_to_target(&buffer, ExportFormat::Jpeg, target_kb).unwrap();
        assert!(compressed.fits(target_kb) || compressed.quality.unwrap().as_percent() == 1);
        assert!(compressed.quality.is_some());
    }

    #[test]
    fn compress_lossless_encodes_once() {
        let compressed = compress_to_target(&sample(4, 4), ExportFormat::Png, 1).unwrap();
        assert!(compressed.quality.is_none());
        assert!(!compressed.bytes.is_empty());
    }

    #[test]
    fn export_filename_formats_correctly() {
        assert_eq!(
            export_filename(Some("holiday"), "clarifi_edited", ExportFormat::Jpeg),
            "holiday_clarifi_edited.jpeg"
        );
        assert_eq!(
            export_filename(None, "clarifi_edited", ExportFormat::Png),
            "clarifi_image_clarifi_edited.png"
        );
        assert_eq!(
            export_filename(Some("  "), "x", ExportFormat::WebP),
            "clarifi_image_x.webp"
        );
    }

    #[test]
    fn base_name_strips_last_extension() {
        assert_eq!(base_name("archive.tar.png").as_deref(), Some("archive.tar"));
        assert_eq!(base_name("photo.jpg").as_deref(), Some("photo"));
        assert_eq!(base_name("").as_deref(), None);
    }
}

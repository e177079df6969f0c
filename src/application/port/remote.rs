// SPDX-License-Identifier: MPL-2.0
//! Remote processing port definition.
//!
//! Operations that are not computed locally (extended filters, AI tools,
//! text overlays, analysis queries) are sent to an external service as a PNG
//! of the visible surface plus a few form fields. This module defines the
//! request type and the [`RemoteProcessor`] trait that adapters implement.
//!
//! # Design Notes
//!
//! - Requests are plain data; the adapter decides transport details
//! - `process` returns encoded image bytes, `query` returns text (OCR, palettes)
//! - The trait is `Send + Sync` so one processor can serve many sessions

use std::fmt;
use std::future::Future;
use thiserror::Error;

// =============================================================================
// RemoteError
// =============================================================================

/// Errors reported by a remote processor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The service could not be reached or the connection failed.
    #[error("service unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status {
        /// HTTP-like status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

// =============================================================================
// RemoteFilter
// =============================================================================

/// Extended stylistic filters computed by the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteFilter {
    /// Darkened edges; intensity in 0.0..=1.0.
    Vignette { intensity: f32 },
    /// Film grain; intensity in 0.0..=1.0.
    Noise { intensity: f32 },
    Hdr,
    Cartoon,
    OilPainting,
    Watercolor,
    Sketch,
    Emboss,
    EdgeDetection,
}

impl RemoteFilter {
    /// Path segment after `filter/`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RemoteFilter::Vignette { .. } => "vignette",
            RemoteFilter::Noise { .. } => "noise",
            RemoteFilter::Hdr => "hdr",
            RemoteFilter::Cartoon => "cartoon",
            RemoteFilter::OilPainting => "oil_painting",
            RemoteFilter::Watercolor => "watercolor",
            RemoteFilter::Sketch => "sketch",
            RemoteFilter::Emboss => "emboss",
            RemoteFilter::EdgeDetection => "edge_detection",
        }
    }
}

// =============================================================================
// RemoteRequest
// =============================================================================

/// One call to the processing service: an endpoint path and its form fields.
///
/// The image itself is attached by the adapter.
///
/// # Example
///
/// ```
/// use clarifi_studio::application::port::RemoteRequest;
///
/// let request = RemoteRequest::super_resolution(4);
/// assert_eq!(request.endpoint(), "premium/super-resolution");
/// assert_eq!(request.field("scale"), Some("4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    endpoint: String,
    fields: Vec<(String, String)>,
}

impl RemoteRequest {
    /// Request for an arbitrary endpoint path such as `premium/denoise`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_matches('/').to_string(),
            fields: Vec::new(),
        }
    }

    /// Adds a form field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Short label for logs: the last path segment.
    #[must_use]
    pub fn label(&self) -> &str {
        self.endpoint
            .rsplit('/')
            .next()
            .unwrap_or(self.endpoint.as_str())
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn filter(filter: RemoteFilter) -> Self {
        let request = Self::new(format!("filter/{}", filter.name()));
        match filter {
            RemoteFilter::Vignette { intensity } | RemoteFilter::Noise { intensity } => {
                request.with_field("intensity", intensity.clamp(0.0, 1.0))
            }
            _ => request,
        }
    }

    // -------------------------------------------------------------------------
    // Premium tools
    // -------------------------------------------------------------------------

    /// AI upscaling by `scale` (2 or 4 on the reference service).
    #[must_use]
    pub fn super_resolution(scale: u32) -> Self {
        Self::new("premium/super-resolution").with_field("scale", scale)
    }

    #[must_use]
    pub fn auto_enhance() -> Self {
        Self::new("premium/auto-enhance")
    }

    #[must_use]
    pub fn colorize() -> Self {
        Self::new("premium/colorize")
    }

    #[must_use]
    pub fn remove_background() -> Self {
        Self::new("premium/remove-background")
    }

    /// Old photo restoration.
    #[must_use]
    pub fn restore() -> Self {
        Self::new("premium/restore")
    }

    #[must_use]
    pub fn red_eye() -> Self {
        Self::new("premium/red-eye")
    }

    /// Noise reduction with `strength` in 1..=20.
    #[must_use]
    pub fn denoise(strength: u32) -> Self {
        Self::new("premium/denoise").with_field("strength", strength.clamp(1, 20))
    }

    /// Keeps colours whose hue lies in `hue_min..=hue_max` and greys the rest.
    #[must_use]
    pub fn color_pop(hue_min: u16, hue_max: u16, tolerance: u16) -> Self {
        Self::new("premium/color-pop")
            .with_field("hue_min", hue_min % 360)
            .with_field("hue_max", hue_max % 360)
            .with_field("tolerance", tolerance.min(180))
    }

    /// Solid border of `width` pixels in a `#rrggbb` colour.
    #[must_use]
    pub fn add_border(width: u32, color: &str) -> Self {
        Self::new("premium/add-border")
            .with_field("width", width)
            .with_field("color", color)
    }

    /// Content-aware fill of a circular region.
    #[must_use]
    pub fn inpaint(x: u32, y: u32, radius: u32) -> Self {
        Self::new("premium/apply-inpaint")
            .with_field("x", x)
            .with_field("y", y)
            .with_field("radius", radius)
    }

    /// Face tools such as `blur` or `smooth`.
    #[must_use]
    pub fn face(action: &str) -> Self {
        Self::new("premium/apply-face").with_field("action", action)
    }

    // -------------------------------------------------------------------------
    // Text, memes and queries
    // -------------------------------------------------------------------------

    /// Draws `text` at (`x`, `y`) with the given size and `#rrggbb` colour.
    #[must_use]
    pub fn text(text: &str, x: u32, y: u32, size: u32, color: &str) -> Self {
        Self::new("text/apply-text")
            .with_field("content", text)
            .with_field("x", x)
            .with_field("y", y)
            .with_field("size", size)
            .with_field("color", color)
    }

    /// Semi-transparent watermark; `opacity` in 0.0..=1.0.
    #[must_use]
    pub fn watermark(text: &str, opacity: f32) -> Self {
        Self::new("text/apply-watermark")
            .with_field("text", text)
            .with_field("opacity", opacity.clamp(0.0, 1.0))
    }

    /// Classic top/bottom caption meme.
    #[must_use]
    pub fn meme(top: &str, bottom: &str) -> Self {
        Self::new("meme/apply-meme")
            .with_field("top", top)
            .with_field("bottom", bottom)
    }

    /// OCR; answered through [`RemoteProcessor::query`].
    #[must_use]
    pub fn extract_text() -> Self {
        Self::new("text/extract-text")
    }

    /// Dominant colours; answered through [`RemoteProcessor::query`].
    #[must_use]
    pub fn extract_palette(colors: u32) -> Self {
        Self::new("palette/extract-palette").with_field("num_colors", colors.clamp(1, 16))
    }
}

impl fmt::Display for RemoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)
    }
}

// =============================================================================
// RemoteProcessor Trait
// =============================================================================

/// Port for the external processing service.
///
/// Implementations receive the visible surface encoded as PNG.
pub trait RemoteProcessor: Send + Sync {
    /// Runs an image-to-image operation and returns the encoded result.
    fn process(
        &self,
        request: &RemoteRequest,
        png: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, RemoteError>> + Send;

    /// Runs an analysis operation and returns its textual answer.
    fn query(
        &self,
        request: &RemoteRequest,
        png: Vec<u8>,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

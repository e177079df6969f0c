// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the editor. Constants are organized by category.
//!
//! # Categories
//!
//! - **Adjustments**: Brightness/contrast/saturation factor and hue bounds
//! - **History**: Undo/redo capacity
//! - **Debounce**: Settle window before an adjustment is committed
//! - **Export**: Encoder quality and filename suffix
//! - **Remote**: Processing service endpoint and timeout

// ==========================================================================
// Adjustment Defaults
// ==========================================================================

/// Neutral factor for brightness, contrast and saturation.
pub const DEFAULT_ADJUSTMENT_FACTOR: f32 = 1.0;

/// Minimum factor (fully dark / flat / desaturated).
pub const MIN_ADJUSTMENT_FACTOR: f32 = 0.0;

/// Maximum factor.
pub const MAX_ADJUSTMENT_FACTOR: f32 = 2.0;

/// Neutral hue shift, as a fraction of the hue circle.
pub const DEFAULT_HUE_SHIFT: f32 = 0.0;

/// Minimum hue shift (half a turn backwards).
pub const MIN_HUE_SHIFT: f32 = -0.5;

/// Maximum hue shift (half a turn forwards).
pub const MAX_HUE_SHIFT: f32 = 0.5;

// ==========================================================================
// History Defaults
// ==========================================================================

/// Number of snapshots kept for undo/redo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Smallest usable history (only the current state).
pub const MIN_HISTORY_CAPACITY: usize = 1;

/// Upper bound; each snapshot is a full RGBA frame.
pub const MAX_HISTORY_CAPACITY: usize = 100;

// ==========================================================================
// Geometry Limits
// ==========================================================================

/// Largest width or height a resize may produce.
pub const MAX_OUTPUT_DIMENSION: u32 = 16_384;

/// Largest pixel count a resize may produce (256 MiB of RGBA).
pub const MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

// ==========================================================================
// Debounce Defaults
// ==========================================================================

/// Quiet period before a slider change is committed to history (ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Maximum accepted debounce window (ms).
pub const MAX_DEBOUNCE_MS: u64 = 5_000;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Default lossy encoder quality (0.0 to 1.0).
pub const DEFAULT_EXPORT_QUALITY: f32 = 0.9;

/// Minimum export quality.
pub const MIN_EXPORT_QUALITY: f32 = 0.0;

/// Maximum export quality.
pub const MAX_EXPORT_QUALITY: f32 = 1.0;

/// Suffix appended to the original file stem on export.
pub const DEFAULT_EXPORT_SUFFIX: &str = "clarifi_edited";

/// Suffix for files produced by the size-target compressor.
pub const COMPRESSED_EXPORT_SUFFIX: &str = "clarifi_compressed";

/// Suffix for files that were only re-encoded to another format.
pub const CONVERTED_EXPORT_SUFFIX: &str = "clarifi_converted";

/// Suffix for background-removal results.
pub const NO_BACKGROUND_EXPORT_SUFFIX: &str = "clarifi_no_bg";

/// Appended after the operation name in batch output, `{name}_{op}_clarifi`.
pub const BATCH_EXPORT_SUFFIX: &str = "clarifi";

/// File stem used when the original name is unknown.
pub const FALLBACK_EXPORT_BASENAME: &str = "clarifi_image";

// ==========================================================================
// Remote Defaults
// ==========================================================================

/// Base URL of the image processing service.
pub const DEFAULT_REMOTE_BASE_URL: &str = "http://127.0.0.1:8000";

/// Request timeout for the processing service (seconds).
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 60;

/// Minimum request timeout (seconds).
pub const MIN_REMOTE_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (seconds).
pub const MAX_REMOTE_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_ADJUSTMENT_FACTOR < DEFAULT_ADJUSTMENT_FACTOR);
    assert!(MAX_ADJUSTMENT_FACTOR > DEFAULT_ADJUSTMENT_FACTOR);
    assert!(MIN_HUE_SHIFT < DEFAULT_HUE_SHIFT);
    assert!(MAX_HUE_SHIFT > DEFAULT_HUE_SHIFT);

    assert!(MIN_HISTORY_CAPACITY > 0);
    assert!(DEFAULT_HISTORY_CAPACITY >= MIN_HISTORY_CAPACITY);
    assert!(DEFAULT_HISTORY_CAPACITY <= MAX_HISTORY_CAPACITY);

    assert!(MAX_OUTPUT_DIMENSION > 0);
    assert!(MAX_OUTPUT_PIXELS >= MAX_OUTPUT_DIMENSION as u64);
    assert!(MAX_OUTPUT_PIXELS <= (MAX_OUTPUT_DIMENSION as u64) * (MAX_OUTPUT_DIMENSION as u64));

    assert!(DEFAULT_DEBOUNCE_MS <= MAX_DEBOUNCE_MS);

    assert!(DEFAULT_EXPORT_QUALITY >= MIN_EXPORT_QUALITY);
    assert!(DEFAULT_EXPORT_QUALITY <= MAX_EXPORT_QUALITY);

    assert!(MIN_REMOTE_TIMEOUT_SECS > 0);
    assert!(DEFAULT_REMOTE_TIMEOUT_SECS >= MIN_REMOTE_TIMEOUT_SECS);
    assert!(DEFAULT_REMOTE_TIMEOUT_SECS <= MAX_REMOTE_TIMEOUT_SECS);
};

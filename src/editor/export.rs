// SPDX-License-Identifier: MPL-2.0
//! Export of the visible surface.

use super::EditSession;
use crate::config::defaults::{
    BATCH_EXPORT_SUFFIX, COMPRESSED_EXPORT_SUFFIX, CONVERTED_EXPORT_SUFFIX,
    NO_BACKGROUND_EXPORT_SUFFIX,
};
use crate::domain::editing::ExportQuality;
use crate::error::Result;
use crate::media::{codec, ExportFormat};
use std::path::Path;

/// Which tool produced an export; decides the file name suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportFlow {
    /// Studio edits, using the configured suffix.
    #[default]
    Edit,
    /// Size-target compression.
    Compress,
    /// Format conversion without edits.
    Convert,
    /// Background removal.
    RemoveBackground,
    /// One operation applied to many files; holds the operation name.
    Batch(String),
}

impl ExportFlow {
    /// Suffix in `{base}_{suffix}.{ext}`; `configured` is used for [`ExportFlow::Edit`].
    #[must_use]
    pub fn suffix(&self, configured: &str) -> String {
        match self {
            ExportFlow::Edit => configured.to_string(),
            ExportFlow::Compress => COMPRESSED_EXPORT_SUFFIX.to_string(),
            ExportFlow::Convert => CONVERTED_EXPORT_SUFFIX.to_string(),
            ExportFlow::RemoveBackground => NO_BACKGROUND_EXPORT_SUFFIX.to_string(),
            ExportFlow::Batch(operation) => format!("{operation}_{BATCH_EXPORT_SUFFIX}"),
        }
    }
}

/// Encoded surface ready to be offered for download or written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    /// Suggested name, `{base}_{suffix}.{ext}`.
    pub filename: String,
}

impl ExportedImage {
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Writes the bytes to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Io`] if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(())
    }
}

impl EditSession {
    /// Encodes what the user currently sees.
    ///
    /// A pending slider change is included in the output but not committed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Export`] if no image is loaded or the
    /// encoder fails.
    pub fn export(&self, format: ExportFormat, quality: ExportQuality) -> Result<ExportedImage> {
        self.export_for(&ExportFlow::Edit, format, quality)
    }

    /// Like [`EditSession::export`], naming the file after `flow`.
    ///
    /// # Errors
    ///
    /// See [`EditSession::export`].
    pub fn export_for(
        &self,
        flow: &ExportFlow,
        format: ExportFormat,
        quality: ExportQuality,
    ) -> Result<ExportedImage> {
        let bytes = codec::encode(self.surface(), format, quality)?;
        let filename = self.export_filename_for(flow, format);
        tracing::info!(%format, bytes = bytes.len(), filename, "exported");
        Ok(ExportedImage {
            bytes,
            format,
            filename,
        })
    }

    /// Exports with the configured default format and quality.
    ///
    /// # Errors
    ///
    /// See [`EditSession::export`].
    pub fn export_default(&self) -> Result<ExportedImage> {
        self.export(self.export_format, self.export_quality)
    }

    /// Exports at the highest quality that fits in `target_kb`, named as a
    /// compressor result.
    ///
    /// # Errors
    ///
    /// See [`EditSession::export`].
    pub fn export_compressed(&self, format: ExportFormat, target_kb: u64) -> Result<ExportedImage> {
        let compressed = codec::compress_to_target(self.surface(), format, target_kb)?;
        Ok(ExportedImage {
            bytes: compressed.bytes,
            format,
            filename: self.export_filename_for(&ExportFlow::Compress, format),
        })
    }

    /// Suggested download name for `format` after studio edits.
    #[must_use]
    pub fn export_filename(&self, format: ExportFormat) -> String {
        self.export_filename_for(&ExportFlow::Edit, format)
    }

    /// Suggested download name for `format` produced by `flow`.
    #[must_use]
    pub fn export_filename_for(&self, flow: &ExportFlow, format: ExportFormat) -> String {
        let suffix = flow.suffix(&self.export_suffix);
        codec::export_filename(self.source_name.as_deref(), &suffix, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_flow_has_its_own_suffix() {
        assert_eq!(ExportFlow::Edit.suffix("studio"), "studio");
        assert_eq!(ExportFlow::Compress.suffix("studio"), "clarifi_compressed");
        assert_eq!(ExportFlow::Convert.suffix("studio"), "clarifi_converted");
        assert_eq!(ExportFlow::RemoveBackground.suffix("studio"), "clarifi_no_bg");
        assert_eq!(
            ExportFlow::Batch("sepia".into()).suffix("studio"),
            "sepia_clarifi"
        );
    }
}

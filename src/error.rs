// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Every variant is recoverable: operations that fail leave the editing
//! session exactly as it was before the call.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Input bytes are not a decodable raster image.
    #[error("Decode Error: {0}")]
    Decode(String),

    /// Crop/resize/rotate parameters do not describe a valid result.
    #[error("Invalid Geometry: {0}")]
    InvalidGeometry(String),

    /// Undo or redo requested at the end of the history.
    #[error("No more history to {0}")]
    NoMoreHistory(HistoryDirection),

    /// Nothing to export, or the encoder rejected the surface.
    #[error("Export Error: {0}")]
    Export(String),

    /// The remote processing service failed or returned garbage.
    #[error("Remote Processing Error: {0}")]
    RemoteProcessing(String),

    /// A filter, format or operation name that is not recognised.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The session has no image to operate on.
    #[error("No image loaded")]
    NoImageLoaded,

    /// An image decode is still pending for this session.
    #[error("An image is still loading")]
    LoadInProgress,

    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),
}

/// Which way a history move was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl std::fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryDirection::Undo => write!(f, "undo"),
            HistoryDirection::Redo => write!(f, "redo"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn no_more_history_names_direction() {
        assert_eq!(
            Error::NoMoreHistory(HistoryDirection::Undo).to_string(),
            "No more history to undo"
        );
        assert_eq!(
            Error::NoMoreHistory(HistoryDirection::Redo).to_string(),
            "No more history to redo"
        );
    }

    #[test]
    fn invalid_toml_maps_to_config_variant() {
        let parsed: std::result::Result<toml::Table, _> = toml::from_str("not = valid = toml");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}

//! Error types for the export pipeline.

use std::time::Duration;
use toposcope_view::CaptureError;

/// Errors produced while exporting a rendered view.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The view cannot supply vector markup, so SVG export is impossible.
    #[error("view '{0}' has no vector content to export")]
    NoVectorContent(String),

    /// Pixel capture did not finish within the configured deadline.
    /// No partial artifact is produced.
    #[error("pixel capture timed out after {0:?}")]
    CaptureTimeout(Duration),

    /// Rasterization or PNG encoding failed.
    #[error("raster export failed: {0}")]
    Raster(String),

    /// PDF composition or serialization failed.
    #[error("document export failed: {0}")]
    Document(String),

    /// Writing an artifact to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attaches the adapter name when lifting a backend capture error.
    pub(crate) fn from_capture(kind: &str, e: CaptureError) -> Self {
        match e {
            CaptureError::NoVectorContent => Error::NoVectorContent(kind.to_string()),
            CaptureError::Raster(detail) => Error::Raster(detail),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;

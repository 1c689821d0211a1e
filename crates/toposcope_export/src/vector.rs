//! SVG export.
//!
//! The view's vector markup is emitted verbatim under a standard XML
//! declaration so the file opens standalone in browsers and editors.
//! Raster-only capture backends cannot serve this path.

use crate::error::{Error, Result};
use crate::artifact_name;
use log::info;
use toposcope_view::ViewCapture;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// A finished SVG export.
#[derive(Debug, Clone)]
pub struct VectorArtifact {
    /// Canonical file name, e.g. `topology-matrix-2025-03-07.svg`.
    pub file_name: String,
    /// Complete SVG document text.
    pub svg: String,
}

/// Exports the view's vector markup as a standalone SVG document.
pub fn export_vector(view: &dyn ViewCapture) -> Result<VectorArtifact> {
    let markup = view
        .to_vector_markup()
        .ok_or_else(|| Error::NoVectorContent(view.kind_name().to_string()))?;

    let file_name = artifact_name(view.kind_name(), chrono::Local::now().date_naive(), "svg");
    info!("vector export: {} ({} bytes)", file_name, markup.len());

    Ok(VectorArtifact {
        file_name,
        svg: format!("{}{}", XML_DECLARATION, markup),
    })
}

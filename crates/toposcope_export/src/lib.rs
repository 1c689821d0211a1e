//! # Toposcope Export
//!
//! Serializes rendered topology views into shareable artifacts: a
//! supersampled PNG, a standalone SVG document, and a paginated PDF
//! report. The pipeline depends only on the
//! [`ViewCapture`](toposcope_view::ViewCapture) handle, never on the
//! layout adapters or the rendering surface.
//!
//! ## Quick Start
//!
//! ```
//! use toposcope_model::{Direction, Quality, Topology};
//! use toposcope_view::{ViewConfig, ViewController};
//! use toposcope_export::{export_vector, ExportConfig};
//!
//! let mut topology = Topology::new();
//! let a = topology.add_system("Billing");
//! let b = topology.add_system("CRM");
//! topology
//!     .add_connection(&a.id, &b.id, Direction::OneWay, Quality::Automated, None)
//!     .unwrap();
//!
//! let mut controller = ViewController::new(topology, ViewConfig::default());
//! let view = controller.render();
//! let artifact = export_vector(&view).unwrap();
//! assert!(artifact.svg.starts_with("<?xml"));
//! assert!(artifact.file_name.ends_with(".svg"));
//! ```

mod document;
mod error;
mod raster;
mod report;
mod vector;

pub use document::{export_document, DocumentArtifact, DocumentMeta};
pub use error::{Error, Result};
pub use raster::{export_raster, RasterArtifact};
pub use report::{parse_blocks, Block};
pub use vector::{export_vector, VectorArtifact};

use chrono::NaiveDate;
use std::time::Duration;

/// Knobs shared by the raster and document exporters.
#[derive(Debug, Clone, Copy)]
pub struct ExportConfig {
    /// Resolution multiplier applied during pixel capture. The default
    /// doubles both dimensions, which keeps node labels legible after
    /// the PNG lands in a slide deck.
    pub supersample: f32,
    /// Deadline for pixel capture. On elapse the export fails with
    /// [`Error::CaptureTimeout`] and no partial artifact is produced.
    pub capture_timeout: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            supersample: 2.0,
            capture_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds the canonical artifact file name:
/// `topology-{kind}-{YYYY-MM-DD}.{ext}`.
pub fn artifact_name(kind: &str, date: NaiveDate, extension: &str) -> String {
    format!("topology-{}-{}.{}", kind, date.format("%Y-%m-%d"), extension)
}

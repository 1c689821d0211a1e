//! # Toposcope View
//!
//! The view layer over the layout adapters: a [`ViewController`] that
//! owns adapter selection, zoom/pan, legend visibility and the active
//! filter, SVG renderers for all four geometries, and the
//! [`ViewCapture`] interface that hands rendered output to the export
//! pipeline as an opaque handle.
//!
//! ## Quick Start
//!
//! ```
//! use toposcope_model::{Direction, Quality, Topology};
//! use toposcope_view::{ViewConfig, ViewController};
//! use toposcope_layout::LayoutKind;
//!
//! let mut topology = Topology::new();
//! let a = topology.add_system("Billing");
//! let b = topology.add_system("CRM");
//! topology
//!     .add_connection(&a.id, &b.id, Direction::OneWay, Quality::Automated, None)
//!     .unwrap();
//!
//! let mut controller = ViewController::new(topology, ViewConfig::default());
//! controller.select_adapter(LayoutKind::Matrix);
//! let view = controller.render();
//! assert!(view.svg().starts_with("<svg"));
//! ```

mod capture;
mod controller;
mod error;
mod render;
mod rendered;

pub use capture::{CaptureError, Pixels, ViewCapture};
pub use controller::{LayoutGeometry, ViewConfig, ViewController, MAX_ZOOM, MIN_ZOOM};
pub use error::{Error, Result};
pub use rendered::RenderedView;

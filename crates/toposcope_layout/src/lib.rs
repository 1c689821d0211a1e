//! # Toposcope Layout
//!
//! Layout adapters: pure transformations from a filtered
//! [`Topology`](toposcope_model::Topology) to a specific geometric
//! representation. Four adapters share one contract: each is a
//! deterministic function of explicit inputs, never of ambient view
//! state:
//!
//! - [`ForceLayout`]: iterative physics relaxation producing 2-D node
//!   coordinates and per-direction edge curves.
//! - [`MatrixLayout`]: square adjacency grid with quality coloring and
//!   direction glyphs.
//! - [`FlowLayout`]: layered left-to-right flow diagram, volume-weighted.
//! - [`TransitionMatrix`]: row-normalized transition-probability heatmap.
//!
//! Adapters never mutate the topology they are given; every layout is a
//! fresh value computed from the snapshot passed in.

mod error;
mod flow;
mod force;
mod geometry;
mod matrix;
mod transition;

pub use error::{Error, Result};
pub use flow::{format_volume, FlowEdge, FlowLayout, FlowNode};
pub use force::{EdgeCurve, ForceConfig, ForceLayout, ForceNode};
pub use geometry::Point;
pub use matrix::{MatrixCell, MatrixCellKind, MatrixLayout};
pub use transition::{
    TransitionCell, TransitionMatrix, LIGHT_TEXT_THRESHOLD, TEXT_SUPPRESS_THRESHOLD,
};

use serde::{Deserialize, Serialize};

/// The four renderable representations of a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Force-directed node/edge graph.
    Network,
    /// Adjacency matrix grid.
    Matrix,
    /// Layered volume flow diagram.
    Flow,
    /// Transition-probability heatmap.
    Transition,
}

impl LayoutKind {
    /// All kinds, in selector order.
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Network,
        LayoutKind::Matrix,
        LayoutKind::Flow,
        LayoutKind::Transition,
    ];

    /// Stable lowercase name, used for artifact file naming.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Network => "network",
            LayoutKind::Matrix => "matrix",
            LayoutKind::Flow => "flow",
            LayoutKind::Transition => "transition",
        }
    }

    /// Human-readable label for the view selector.
    pub fn label(&self) -> &'static str {
        match self {
            LayoutKind::Network => "Network graph",
            LayoutKind::Matrix => "Adjacency matrix",
            LayoutKind::Flow => "Flow diagram",
            LayoutKind::Transition => "Transition heatmap",
        }
    }
}

//! Transition-probability heatmap adapter.
//!
//! Builds a square matrix in the same shape and axis order as the
//! adjacency matrix, populated with row-normalized outgoing volume:
//! `M[i][j] = volume(i→j) / Σ_k volume(i→k)`. Division is guarded: a
//! source with zero outgoing volume yields an all-zero row, never NaN.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use toposcope_model::{System, Topology};

/// Probabilities below this threshold render without cell text, to avoid
/// label clutter.
pub const TEXT_SUPPRESS_THRESHOLD: f64 = 0.05;

/// Probabilities above this threshold flip the cell text to a light
/// color, to keep contrast against the darker fill.
pub const LIGHT_TEXT_THRESHOLD: f64 = 0.50;

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionCell {
    /// Row-normalized outgoing volume share, in `[0, 1]`.
    pub probability: f64,
    /// Whether the probability label is drawn at all.
    pub show_text: bool,
    /// Whether the label uses the light text color.
    pub light_text: bool,
}

impl TransitionCell {
    fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            show_text: probability >= TEXT_SUPPRESS_THRESHOLD,
            light_text: probability > LIGHT_TEXT_THRESHOLD,
        }
    }
}

/// Row-normalized transition matrix over the filtered topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionMatrix {
    /// Axis order, shared by rows and columns (same order as the
    /// adjacency matrix).
    pub systems: Vec<System>,
    /// Row-major probability cells.
    pub rows: Vec<Vec<TransitionCell>>,
}

impl TransitionMatrix {
    /// Builds the matrix from a filtered topology.
    ///
    /// Like the adjacency matrix, this renders for any non-empty system
    /// set; an empty edge set just yields all-zero rows.
    ///
    /// # Errors
    ///
    /// [`Error::NoRenderableContent`] only when there are zero systems.
    pub fn build(topology: &Topology) -> Result<Self> {
        if topology.system_count() == 0 {
            return Err(Error::NoRenderableContent("topology has no systems".into()));
        }

        let systems: Vec<System> = topology.systems().cloned().collect();
        let mut rows = Vec::with_capacity(systems.len());

        for source in &systems {
            let outgoing_total: f64 = topology
                .connections()
                .filter(|conn| conn.source == source.id)
                .map(|conn| conn.volume)
                .sum();

            let row = systems
                .iter()
                .map(|target| {
                    if outgoing_total <= 0.0 {
                        // Guarded division: zero outgoing volume means an
                        // all-zero row, not NaN.
                        return TransitionCell::from_probability(0.0);
                    }
                    let volume = topology
                        .connection(&source.id, &target.id)
                        .map(|conn| conn.volume)
                        .unwrap_or(0.0);
                    TransitionCell::from_probability(volume / outgoing_total)
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { systems, rows })
    }

    /// Number of systems on each axis.
    pub fn size(&self) -> usize {
        self.systems.len()
    }

    /// Probability of the transition `(row, col)`.
    pub fn probability(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row)?.get(col).map(|cell| cell.probability)
    }

    /// Sum of one row, for invariant checks: 1.0 when the source has
    /// outgoing volume, 0.0 otherwise.
    pub fn row_sum(&self, row: usize) -> Option<f64> {
        self.rows
            .get(row)
            .map(|cells| cells.iter().map(|c| c.probability).sum())
    }
}

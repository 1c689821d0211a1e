//! Adjacency matrix layout adapter.
//!
//! Produces a square grid indexed by `systems × systems`, both axes in
//! the same stable order (topology insertion order). The diagonal is a
//! distinct "self" rendering concept, never a connection lookup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use toposcope_model::{Direction, Quality, System, Topology};

/// What one matrix cell renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum MatrixCellKind {
    /// Diagonal cell `(i, i)`: neutral self style, not a connection.
    SelfCell,

    /// No directed connection `(i, j)` survives the filter.
    Empty,

    /// A directed connection exists. The cell is colored by the quality
    /// of **this** leg only; the reverse leg's quality never merges in.
    Link {
        quality: Quality,
        /// True only when both `(i, j)` and `(j, i)` exist and both are
        /// tagged bidirectional.
        bidirectional: bool,
    },
}

impl MatrixCellKind {
    /// Direction glyph for link cells, empty string otherwise.
    pub fn glyph(&self) -> &'static str {
        match self {
            MatrixCellKind::Link { bidirectional: true, .. } => Direction::Bidirectional.glyph(),
            MatrixCellKind::Link { bidirectional: false, .. } => Direction::OneWay.glyph(),
            _ => "",
        }
    }
}

/// One cell of the matrix grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    /// Row index (source system).
    pub row: usize,
    /// Column index (target system).
    pub col: usize,
    pub kind: MatrixCellKind,
}

/// Square adjacency grid over the filtered topology.
///
/// Unlike the force and flow adapters, the matrix renders for any
/// non-empty system set: an empty filtered edge set just yields a grid
/// of neutral cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixLayout {
    /// Axis order, shared by rows and columns.
    pub systems: Vec<System>,
    /// Row-major cells, `systems.len() * systems.len()` entries.
    pub cells: Vec<MatrixCell>,
}

impl MatrixLayout {
    /// Builds the grid from a filtered topology.
    ///
    /// # Errors
    ///
    /// [`Error::NoRenderableContent`] only when there are zero systems.
    pub fn build(topology: &Topology) -> Result<Self> {
        if topology.system_count() == 0 {
            return Err(Error::NoRenderableContent("topology has no systems".into()));
        }

        let systems: Vec<System> = topology.systems().cloned().collect();
        let n = systems.len();
        let mut cells = Vec::with_capacity(n * n);

        for (row, source) in systems.iter().enumerate() {
            for (col, target) in systems.iter().enumerate() {
                let kind = if row == col {
                    // Never looked up in the connection map.
                    MatrixCellKind::SelfCell
                } else {
                    match topology.connection(&source.id, &target.id) {
                        Some(conn) => {
                            let reverse_bidi = conn.direction == Direction::Bidirectional
                                && topology
                                    .connection(&target.id, &source.id)
                                    .map(|rev| rev.direction == Direction::Bidirectional)
                                    .unwrap_or(false);
                            MatrixCellKind::Link {
                                quality: conn.quality,
                                bidirectional: reverse_bidi,
                            }
                        }
                        None => MatrixCellKind::Empty,
                    }
                };
                cells.push(MatrixCell { row, col, kind });
            }
        }

        Ok(Self { systems, cells })
    }

    /// Number of systems on each axis.
    pub fn size(&self) -> usize {
        self.systems.len()
    }

    /// Cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&MatrixCell> {
        self.cells.get(row * self.systems.len() + col)
    }
}

//! Connections: the directed edges of the topology.

use crate::SystemId;
use serde::{Deserialize, Serialize};

/// Volume assigned to a connection when the caller leaves it unspecified.
pub const DEFAULT_VOLUME: f64 = 10.0;

/// Whether data flows one way or both ways over a connection.
///
/// A bidirectional connection is stored as **two** directed entries,
/// `(A, B)` and `(B, A)`, each tagged `Bidirectional`. Layout adapters
/// only ever consume directed pairs; this enum exists for styling (the
/// matrix direction glyph) and for filtering, never for geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Data flows from source to target only.
    OneWay,
    /// Data flows both ways; the reverse directed entry also exists.
    Bidirectional,
}

impl Direction {
    /// Returns the arrow glyph used by the matrix view.
    ///
    /// # Examples
    ///
    /// ```
    /// use toposcope_model::Direction;
    ///
    /// assert_eq!(Direction::OneWay.glyph(), "→");
    /// assert_eq!(Direction::Bidirectional.glyph(), "↔");
    /// ```
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::OneWay => "→",
            Direction::Bidirectional => "↔",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::OneWay => "One-way",
            Direction::Bidirectional => "Bidirectional",
        }
    }
}

/// Categorical automation tier of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    /// Fully automated data exchange.
    Automated,
    /// Partially automated; some manual steps remain.
    SemiAutomated,
    /// Entirely manual transfer.
    Manual,
}

impl Quality {
    /// Returns a hex color code for styling the quality tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use toposcope_model::Quality;
    ///
    /// assert_eq!(Quality::Automated.color(), "#4CAF50");     // Green
    /// assert_eq!(Quality::SemiAutomated.color(), "#FF9800"); // Orange
    /// assert_eq!(Quality::Manual.color(), "#f44336");        // Red
    /// ```
    pub fn color(&self) -> &'static str {
        match self {
            Quality::Automated => "#4CAF50",     // Green
            Quality::SemiAutomated => "#FF9800", // Orange
            Quality::Manual => "#f44336",        // Red
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Automated => "Automated",
            Quality::SemiAutomated => "Semi-automated",
            Quality::Manual => "Manual",
        }
    }
}

/// A single directed edge between two systems.
///
/// The `(source, target)` pair is unique within a topology. Bidirectional
/// user requests produce two `Connection` values with mirrored endpoints
/// and identical quality/volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Id of the system data flows out of.
    pub source: SystemId,

    /// Id of the system data flows into.
    pub target: SystemId,

    /// One-way or bidirectional (see [`Direction`]).
    pub direction: Direction,

    /// Automation tier, used for cell/edge coloring and filtering.
    pub quality: Quality,

    /// Relative throughput weight used by the flow and transition layouts.
    /// Defaults to [`DEFAULT_VOLUME`].
    pub volume: f64,
}

impl Connection {
    /// Composite key identifying the directed pair, `"source-target"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

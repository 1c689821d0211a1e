//! Connection filtering.
//!
//! A [`ConnectionFilter`] is a conjunction over two independent axes:
//! quality (automated / semi-automated / manual) and direction (one-way /
//! bidirectional). Filtering is monotonic: it only ever drops edges.

use crate::{Connection, Direction, Quality};
use serde::{Deserialize, Serialize};

/// Predicate over connections, one boolean per quality tier and direction.
///
/// The default filter admits everything.
///
/// # Examples
///
/// ```
/// use toposcope_model::{ConnectionFilter, Quality};
///
/// let filter = ConnectionFilter {
///     manual: false,
///     ..ConnectionFilter::default()
/// };
/// assert!(filter.admits_quality(Quality::Automated));
/// assert!(!filter.admits_quality(Quality::Manual));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionFilter {
    /// Admit connections with [`Quality::Automated`].
    pub automated: bool,
    /// Admit connections with [`Quality::SemiAutomated`].
    pub semi_automated: bool,
    /// Admit connections with [`Quality::Manual`].
    pub manual: bool,
    /// Admit connections with [`Direction::OneWay`].
    pub one_way: bool,
    /// Admit connections with [`Direction::Bidirectional`].
    pub bidirectional: bool,
}

impl Default for ConnectionFilter {
    fn default() -> Self {
        Self {
            automated: true,
            semi_automated: true,
            manual: true,
            one_way: true,
            bidirectional: true,
        }
    }
}

impl ConnectionFilter {
    /// Whether the quality axis admits the given tier.
    pub fn admits_quality(&self, quality: Quality) -> bool {
        match quality {
            Quality::Automated => self.automated,
            Quality::SemiAutomated => self.semi_automated,
            Quality::Manual => self.manual,
        }
    }

    /// Whether the direction axis admits the given direction.
    pub fn admits_direction(&self, direction: Direction) -> bool {
        match direction {
            Direction::OneWay => self.one_way,
            Direction::Bidirectional => self.bidirectional,
        }
    }

    /// The full predicate: both axes must admit the connection.
    pub fn matches(&self, connection: &Connection) -> bool {
        self.admits_quality(connection.quality) && self.admits_direction(connection.direction)
    }

    /// True when the filter admits every connection.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

//! Systems: the nodes of the topology.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a [`System`] within a topology.
///
/// Identifiers are opaque strings. The topology generates them
/// sequentially (`sys-1`, `sys-2`, ...) so a session's ids are stable and
/// readable in exported artifacts.
///
/// # Examples
///
/// ```
/// use toposcope_model::SystemId;
///
/// let id = SystemId::new("sys-1");
/// assert_eq!(id.as_str(), "sys-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(String);

impl SystemId {
    /// Creates an id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SystemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single integrated software system: one node in the topology.
///
/// Created by [`Topology::add_system`](crate::Topology::add_system),
/// mutated only by rename, destroyed by
/// [`Topology::remove_system`](crate::Topology::remove_system) which
/// cascades to every connection referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    /// Unique identifier, generated by the owning topology.
    pub id: SystemId,

    /// Human-readable display name. Not required to be unique.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_id_display_matches_str() {
        let id = SystemId::new("sys-42");
        assert_eq!(format!("{}", id), "sys-42");
        assert_eq!(id.as_str(), "sys-42");
    }

    #[test]
    fn test_system_serde_round_trip() {
        let system = System {
            id: SystemId::new("sys-1"),
            name: "Billing".to_string(),
        };
        let json = serde_json::to_string(&system).unwrap();
        let back: System = serde_json::from_str(&json).unwrap();
        assert_eq!(back, system);
    }
}

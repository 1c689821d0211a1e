//! The canonical in-memory topology.
//!
//! [`Topology`] owns the session's systems and directed connections and is
//! the single mutating entry point for both. All graph invariants
//! (existing endpoints, directed-pair uniqueness, no self-loops, paired
//! bidirectional legs) are enforced here so that every derived structure
//! can consume the graph without re-checking them.

use crate::{
    Connection, ConnectionFilter, Direction, Error, Quality, Result, System, SystemId,
    DEFAULT_VOLUME,
};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Summary counters surfaced to the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyStats {
    /// Number of systems in the topology.
    pub total_systems: usize,
    /// Number of directed connection entries (a bidirectional pair counts
    /// as two).
    pub total_connections: usize,
    /// Number of directed entries admitted by the active filter.
    pub filtered_connections: usize,
}

/// The canonical graph of systems and directed connections.
///
/// Iteration order of systems is insertion order (backed by `IndexMap`),
/// which the matrix and transition layouts rely on for stable axes.
///
/// # Examples
///
/// ```
/// use toposcope_model::{Direction, Quality, Topology};
///
/// let mut topology = Topology::new();
/// let a = topology.add_system("Billing");
/// let b = topology.add_system("CRM");
///
/// // A bidirectional request creates two directed entries.
/// let created = topology
///     .add_connection(&a.id, &b.id, Direction::Bidirectional, Quality::Automated, Some(20.0))
///     .unwrap();
/// assert_eq!(created.len(), 2);
/// assert_eq!(topology.connection_count(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    /// Systems keyed by id, in insertion order.
    systems: IndexMap<SystemId, System>,

    /// Directed connections keyed by `(source, target)`.
    #[serde(with = "indexmap::map::serde_seq")]
    connections: IndexMap<(SystemId, SystemId), Connection>,

    /// Monotonic counter backing generated system ids.
    next_id: u64,
}

impl Topology {
    /// Creates an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Systems ==========

    /// Adds a system with a generated id and returns it.
    ///
    /// Display names are not required to be unique; ids are.
    pub fn add_system(&mut self, name: impl Into<String>) -> System {
        self.next_id += 1;
        let system = System {
            id: SystemId::new(format!("sys-{}", self.next_id)),
            name: name.into(),
        };
        self.systems.insert(system.id.clone(), system.clone());
        system
    }

    /// Renames an existing system.
    pub fn rename_system(&mut self, id: &SystemId, name: impl Into<String>) -> Result<()> {
        let system = self
            .systems
            .get_mut(id)
            .ok_or_else(|| Error::UnknownSystem(id.to_string()))?;
        system.name = name.into();
        Ok(())
    }

    /// Removes a system, cascading to every connection that references it
    /// as source or target.
    pub fn remove_system(&mut self, id: &SystemId) -> Result<()> {
        self.systems
            .shift_remove(id)
            .ok_or_else(|| Error::UnknownSystem(id.to_string()))?;

        let before = self.connections.len();
        self.connections
            .retain(|(source, target), _| source != id && target != id);
        debug!(
            "removed system {} (pruned {} connection entries)",
            id,
            before - self.connections.len()
        );
        Ok(())
    }

    /// Returns the system with the given id, if present.
    pub fn system(&self, id: &SystemId) -> Option<&System> {
        self.systems.get(id)
    }

    /// Iterates systems in insertion order.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.values()
    }

    /// Number of systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // ========== Connections ==========

    /// Adds a connection between two existing systems.
    ///
    /// Returns the directed entries actually created: one for a one-way
    /// request, two mirrored entries (identical quality and volume) for a
    /// bidirectional request. `volume` defaults to [`DEFAULT_VOLUME`].
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownSystem`] if either endpoint does not exist.
    /// - [`Error::SelfLoop`] if `source == target`.
    /// - [`Error::DuplicateConnection`] if the directed pair already has an
    ///   entry (for a bidirectional request, if *either* leg does).
    pub fn add_connection(
        &mut self,
        source: &SystemId,
        target: &SystemId,
        direction: Direction,
        quality: Quality,
        volume: Option<f64>,
    ) -> Result<Vec<Connection>> {
        if !self.systems.contains_key(source) {
            return Err(Error::UnknownSystem(source.to_string()));
        }
        if !self.systems.contains_key(target) {
            return Err(Error::UnknownSystem(target.to_string()));
        }
        if source == target {
            return Err(Error::SelfLoop(source.to_string()));
        }

        let forward = (source.clone(), target.clone());
        let reverse = (target.clone(), source.clone());
        if self.connections.contains_key(&forward) {
            return Err(Error::DuplicateConnection(format!("{} -> {}", source, target)));
        }
        if direction == Direction::Bidirectional && self.connections.contains_key(&reverse) {
            return Err(Error::DuplicateConnection(format!("{} -> {}", target, source)));
        }

        let volume = volume.unwrap_or(DEFAULT_VOLUME);
        let mut created = Vec::with_capacity(2);

        let entry = Connection {
            source: source.clone(),
            target: target.clone(),
            direction,
            quality,
            volume,
        };
        self.connections.insert(forward, entry.clone());
        created.push(entry);

        if direction == Direction::Bidirectional {
            let mirrored = Connection {
                source: target.clone(),
                target: source.clone(),
                direction,
                quality,
                volume,
            };
            self.connections.insert(reverse, mirrored.clone());
            created.push(mirrored);
        }

        Ok(created)
    }

    /// Removes the directed entry `(source, target)`.
    ///
    /// If the removed entry was one leg of a bidirectional pair, the
    /// surviving reverse leg is demoted to [`Direction::OneWay`] so the
    /// pair invariant never dangles.
    pub fn remove_connection(&mut self, source: &SystemId, target: &SystemId) -> Result<()> {
        let removed = self
            .connections
            .shift_remove(&(source.clone(), target.clone()))
            .ok_or_else(|| Error::ConnectionNotFound(format!("{} -> {}", source, target)))?;

        if removed.direction == Direction::Bidirectional {
            if let Some(reverse) = self
                .connections
                .get_mut(&(target.clone(), source.clone()))
            {
                reverse.direction = Direction::OneWay;
                debug!("demoted surviving leg {} -> {} to one-way", target, source);
            }
        }
        Ok(())
    }

    /// Returns the directed connection `(source, target)`, if present.
    pub fn connection(&self, source: &SystemId, target: &SystemId) -> Option<&Connection> {
        self.connections.get(&(source.clone(), target.clone()))
    }

    /// Iterates directed connection entries in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of directed connection entries.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// True when the topology has no systems.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    // ========== Derivation ==========

    /// Applies a filter and returns the surviving topology as a fresh
    /// snapshot.
    ///
    /// All systems are retained (so views can still show isolated nodes);
    /// the edge set is always a subset of the full edge set.
    pub fn filter(&self, filter: &ConnectionFilter) -> Topology {
        let connections: IndexMap<_, _> = self
            .connections
            .iter()
            .filter(|(_, conn)| filter.matches(conn))
            .map(|(key, conn)| (key.clone(), conn.clone()))
            .collect();

        Topology {
            systems: self.systems.clone(),
            connections,
            next_id: self.next_id,
        }
    }

    /// Summary counters for the surrounding UI.
    pub fn stats(&self, filter: &ConnectionFilter) -> TopologyStats {
        TopologyStats {
            total_systems: self.systems.len(),
            total_connections: self.connections.len(),
            filtered_connections: self
                .connections
                .values()
                .filter(|conn| filter.matches(conn))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_system_topology() -> (Topology, SystemId, SystemId) {
        let mut topology = Topology::new();
        let a = topology.add_system("A").id;
        let b = topology.add_system("B").id;
        (topology, a, b)
    }

    #[test]
    fn test_generated_ids_are_unique_and_sequential() {
        let mut topology = Topology::new();
        let a = topology.add_system("A");
        let b = topology.add_system("A"); // duplicate name is fine
        assert_eq!(a.id.as_str(), "sys-1");
        assert_eq!(b.id.as_str(), "sys-2");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rename_system() {
        let (mut topology, a, _) = two_system_topology();
        topology.rename_system(&a, "Accounts").unwrap();
        assert_eq!(topology.system(&a).unwrap().name, "Accounts");

        let missing = SystemId::new("sys-99");
        assert!(matches!(
            topology.rename_system(&missing, "X"),
            Err(Error::UnknownSystem(_))
        ));
    }

    #[test]
    fn test_one_way_creates_single_entry() {
        let (mut topology, a, b) = two_system_topology();
        let created = topology
            .add_connection(&a, &b, Direction::OneWay, Quality::Manual, None)
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].volume, DEFAULT_VOLUME);
        assert_eq!(topology.connection_count(), 1);
        assert!(topology.connection(&b, &a).is_none());
    }

    #[test]
    fn test_bidirectional_creates_mirrored_pair() {
        let (mut topology, a, b) = two_system_topology();
        let created = topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, Some(20.0))
            .unwrap();
        assert_eq!(created.len(), 2);

        let forward = topology.connection(&a, &b).unwrap();
        let reverse = topology.connection(&b, &a).unwrap();
        assert_eq!(forward.quality, reverse.quality);
        assert_eq!(forward.volume, reverse.volume);
        assert_eq!(forward.direction, Direction::Bidirectional);
        assert_eq!(reverse.direction, Direction::Bidirectional);
    }

    #[test]
    fn test_duplicate_directed_pair_rejected() {
        let (mut topology, a, b) = two_system_topology();
        topology
            .add_connection(&a, &b, Direction::OneWay, Quality::Manual, None)
            .unwrap();

        assert!(matches!(
            topology.add_connection(&a, &b, Direction::OneWay, Quality::Automated, None),
            Err(Error::DuplicateConnection(_))
        ));
        // Bidirectional request would collide with the existing reverse leg.
        assert!(matches!(
            topology.add_connection(&b, &a, Direction::Bidirectional, Quality::Manual, None),
            Err(Error::DuplicateConnection(_))
        ));
        // But a plain reverse one-way entry is a distinct directed pair.
        assert!(topology
            .add_connection(&b, &a, Direction::OneWay, Quality::Manual, None)
            .is_ok());
    }

    #[test]
    fn test_self_loop_rejected() {
        let (mut topology, a, _) = two_system_topology();
        assert!(matches!(
            topology.add_connection(&a, &a, Direction::OneWay, Quality::Manual, None),
            Err(Error::SelfLoop(_))
        ));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let (mut topology, a, _) = two_system_topology();
        let missing = SystemId::new("sys-99");
        assert!(matches!(
            topology.add_connection(&a, &missing, Direction::OneWay, Quality::Manual, None),
            Err(Error::UnknownSystem(_))
        ));
    }

    #[test]
    fn test_remove_system_cascades() {
        let mut topology = Topology::new();
        let a = topology.add_system("A").id;
        let b = topology.add_system("B").id;
        let c = topology.add_system("C").id;
        topology
            .add_connection(&a, &b, Direction::OneWay, Quality::Automated, Some(30.0))
            .unwrap();
        topology
            .add_connection(&a, &c, Direction::OneWay, Quality::Automated, Some(10.0))
            .unwrap();

        topology.remove_system(&b).unwrap();

        assert_eq!(topology.system_count(), 2);
        assert_eq!(topology.connection_count(), 1);
        assert!(topology.connection(&a, &c).is_some());
        assert!(topology.connections().all(|conn| conn.source != b && conn.target != b));
    }

    #[test]
    fn test_removing_one_leg_demotes_the_survivor() {
        let (mut topology, a, b) = two_system_topology();
        topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::Automated, None)
            .unwrap();

        topology.remove_connection(&a, &b).unwrap();

        assert_eq!(topology.connection_count(), 1);
        let survivor = topology.connection(&b, &a).unwrap();
        assert_eq!(survivor.direction, Direction::OneWay);
    }

    #[test]
    fn test_remove_missing_connection_errors() {
        let (mut topology, a, b) = two_system_topology();
        assert!(matches!(
            topology.remove_connection(&a, &b),
            Err(Error::ConnectionNotFound(_))
        ));
    }

    #[test]
    fn test_filter_is_monotonic_and_keeps_systems() {
        let (mut topology, a, b) = two_system_topology();
        topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::Manual, None)
            .unwrap();

        let filter = ConnectionFilter {
            manual: false,
            ..ConnectionFilter::default()
        };
        let filtered = topology.filter(&filter);

        assert!(filtered.connection_count() <= topology.connection_count());
        assert_eq!(filtered.connection_count(), 0);
        // Isolated systems are retained in the node set.
        assert_eq!(filtered.system_count(), 2);
    }

    #[test]
    fn test_stats_counters() {
        let (mut topology, a, b) = two_system_topology();
        topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::Manual, None)
            .unwrap();

        let stats = topology.stats(&ConnectionFilter {
            manual: false,
            ..ConnectionFilter::default()
        });
        assert_eq!(stats.total_systems, 2);
        assert_eq!(stats.total_connections, 2);
        assert_eq!(stats.filtered_connections, 0);
    }

    #[test]
    fn test_topology_serde_round_trip() {
        let (mut topology, a, b) = two_system_topology();
        topology
            .add_connection(&a, &b, Direction::Bidirectional, Quality::SemiAutomated, Some(15.0))
            .unwrap();

        let json = serde_json::to_string(&topology).unwrap();
        let back: Topology = serde_json::from_str(&json).unwrap();
        assert_eq!(back.system_count(), 2);
        assert_eq!(back.connection_count(), 2);
        assert_eq!(back.connection(&a, &b).unwrap().volume, 15.0);
    }
}

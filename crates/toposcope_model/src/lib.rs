//! # Toposcope Model
//!
//! The canonical in-memory topology of integrated systems and the data
//! connections between them, plus the pure filter engine every view is
//! derived from.
//!
//! ## Overview
//!
//! A [`Topology`] holds [`System`] nodes and directed [`Connection`]
//! edges. Bidirectional connections are represented as two mirrored
//! directed entries, created and kept consistent by the topology itself,
//! downstream layout adapters only ever consume directed pairs and carry
//! no direction-specific branches.
//!
//! Filtering is a pure function: [`Topology::filter`] takes a
//! [`ConnectionFilter`] and returns a fresh snapshot whose edge set is a
//! subset of the original. Derived structures never alias mutable state
//! back into the model.
//!
//! ## Quick Start
//!
//! ```
//! use toposcope_model::{ConnectionFilter, Direction, Quality, Topology};
//!
//! let mut topology = Topology::new();
//! let billing = topology.add_system("Billing");
//! let crm = topology.add_system("CRM");
//!
//! topology
//!     .add_connection(
//!         &billing.id,
//!         &crm.id,
//!         Direction::Bidirectional,
//!         Quality::Automated,
//!         Some(20.0),
//!     )
//!     .unwrap();
//!
//! let stats = topology.stats(&ConnectionFilter::default());
//! assert_eq!(stats.total_systems, 2);
//! assert_eq!(stats.total_connections, 2); // two directed entries
//! ```

mod connection;
mod error;
mod filter;
mod system;
mod topology;

pub use connection::{Connection, Direction, Quality, DEFAULT_VOLUME};
pub use error::{Error, Result};
pub use filter::ConnectionFilter;
pub use system::{System, SystemId};
pub use topology::{Topology, TopologyStats};

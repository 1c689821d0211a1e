//! Force-directed layout adapter.
//!
//! Implements an iterative physics relaxation over the filtered topology:
//! pairwise inverse-square repulsion between all node pairs, spring
//! attraction along edges toward a rest length, and a centering pull
//! toward the canvas center.
//!
//! The numerical method is isolated from scheduling: [`ForceLayout::tick`]
//! is an explicit state transition over positions and velocities, and
//! [`ForceLayout::run`] is the scheduler that owns the iteration budget
//! and the kinetic-energy convergence check. The simulation can be
//! interrupted between any two ticks without corrupting state.
//!
//! # Usage
//!
//! ```
//! use toposcope_layout::{ForceConfig, ForceLayout};
//! use toposcope_model::{Direction, Quality, Topology};
//!
//! let mut topology = Topology::new();
//! let a = topology.add_system("A");
//! let b = topology.add_system("B");
//! topology
//!     .add_connection(&a.id, &b.id, Direction::OneWay, Quality::Automated, None)
//!     .unwrap();
//!
//! let mut layout = ForceLayout::new(&topology, ForceConfig::default(), 800.0, 600.0).unwrap();
//! layout.run();
//! assert!(layout.is_stable() || layout.ticks() > 0);
//! ```

use crate::{Error, Point, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use toposcope_model::{Quality, SystemId, Topology};

/// Golden angle in radians, used to seed initial positions on a spiral.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Perpendicular displacement applied to every edge curve, so the two
/// legs of a bidirectional pair render as parallel offset curves.
const EDGE_OFFSET: f64 = 7.0;

/// Fixed timestep used by the [`ForceLayout::run`] scheduler.
const TICK_DT: f64 = 1.0 / 60.0;

/// Tuning parameters for the force simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceConfig {
    /// Repulsion strength between node pairs (inverse square law).
    pub repulsion: f64,

    /// Spring stiffness along edges.
    pub spring_strength: f64,

    /// Target rest length of edge springs.
    pub rest_length: f64,

    /// Pull toward the canvas center (keeps components from drifting off).
    pub center_strength: f64,

    /// Velocity damping per tick (0.0 = none, 1.0 = instant stop).
    pub damping: f64,

    /// Minimum pair distance for force calculation (prevents explosion).
    pub min_distance: f64,

    /// Maximum node speed (prevents instability).
    pub max_velocity: f64,

    /// Kinetic energy below which the layout counts as converged.
    pub energy_threshold: f64,

    /// Iteration budget for [`ForceLayout::run`].
    pub max_ticks: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            repulsion: 8000.0,
            spring_strength: 0.08,
            rest_length: 120.0,
            center_strength: 0.02,
            damping: 0.9,
            min_distance: 20.0,
            max_velocity: 500.0,
            energy_threshold: 1.0,
            max_ticks: 300,
        }
    }
}

/// A node in the force simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceNode {
    /// System this node represents.
    pub id: SystemId,

    /// Display name.
    pub name: String,

    /// Current position (updated by the simulation).
    pub position: Point,

    /// Current velocity.
    velocity: Point,

    /// Pinned nodes keep their position during integration but still
    /// exert forces on their neighbors.
    pub pinned: bool,
}

/// Renderable geometry for one directed edge.
///
/// Every directed entry gets its own curve. The control point is the edge
/// midpoint displaced perpendicular to the current edge angle, so the two
/// legs of a bidirectional pair (whose perpendiculars point to opposite
/// sides) come out as parallel curves, one arrowhead each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCurve {
    pub source: SystemId,
    pub target: SystemId,
    pub quality: Quality,
    /// Start point (source node position).
    pub start: Point,
    /// Quadratic control point, offset from the midpoint.
    pub control: Point,
    /// End point (target node position).
    pub end: Point,
    /// Arrowhead direction at the end point, in radians.
    pub arrow_angle: f64,
}

/// Resolved directed edge: indices into the node vector.
#[derive(Debug, Clone)]
struct ForceEdge {
    source: usize,
    target: usize,
    quality: Quality,
}

/// Force-directed layout over a filtered topology.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    nodes: Vec<ForceNode>,
    node_index: HashMap<SystemId, usize>,
    edges: Vec<ForceEdge>,
    config: ForceConfig,
    center: Point,
    energy: f64,
    ticks: usize,
}

impl ForceLayout {
    /// Builds a simulation from the filtered topology, seeding positions
    /// on a golden-angle spiral around the canvas center.
    ///
    /// Isolated systems participate (they are repelled into free space);
    /// the adapter only refuses to build when there is nothing to connect.
    ///
    /// # Errors
    ///
    /// [`Error::NoRenderableContent`] when the topology has zero systems
    /// or zero surviving edges.
    pub fn new(topology: &Topology, config: ForceConfig, width: f64, height: f64) -> Result<Self> {
        if topology.system_count() == 0 {
            return Err(Error::NoRenderableContent("topology has no systems".into()));
        }
        if topology.connection_count() == 0 {
            return Err(Error::NoRenderableContent(
                "no connections survive the filter".into(),
            ));
        }

        let center = Point::new(width / 2.0, height / 2.0);
        let mut nodes = Vec::with_capacity(topology.system_count());
        let mut node_index = HashMap::new();

        for (i, system) in topology.systems().enumerate() {
            let angle = i as f64 * GOLDEN_ANGLE;
            let radius = 60.0 + i as f64 * 18.0;
            let position = center + Point::new(angle.cos(), angle.sin()) * radius;
            node_index.insert(system.id.clone(), i);
            nodes.push(ForceNode {
                id: system.id.clone(),
                name: system.name.clone(),
                position,
                velocity: Point::ZERO,
                pinned: false,
            });
        }

        let mut edges = Vec::with_capacity(topology.connection_count());
        for conn in topology.connections() {
            match (node_index.get(&conn.source), node_index.get(&conn.target)) {
                (Some(&source), Some(&target)) => edges.push(ForceEdge {
                    source,
                    target,
                    quality: conn.quality,
                }),
                _ => {
                    // Cascade should prevent this; recover by dropping the edge.
                    warn!(
                        "skipping connection with unknown endpoint: {} -> {}",
                        conn.source, conn.target
                    );
                }
            }
        }

        Ok(Self {
            nodes,
            node_index,
            edges,
            config,
            center,
            energy: f64::MAX,
            ticks: 0,
        })
    }

    // ========== Simulation ==========

    /// Advances the simulation by one timestep.
    ///
    /// A pure function of the previous positions and velocities: forces
    /// are accumulated first, then integrated, so interrupting between
    /// ticks never leaves the state half-updated.
    pub fn tick(&mut self, dt: f64) {
        if self.nodes.is_empty() {
            return;
        }
        let dt = dt.min(0.05); // Cap dt to prevent instability

        let forces = self.accumulate_forces();

        let mut total_energy = 0.0;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if node.pinned {
                node.velocity = Point::ZERO;
                continue;
            }

            node.velocity += forces[i] * dt;
            node.velocity = node.velocity * self.config.damping;

            // Energy uses the clamped speed, the one actually integrated.
            let mut speed = node.velocity.length();
            if speed > self.config.max_velocity {
                node.velocity = node.velocity.normalized() * self.config.max_velocity;
                speed = self.config.max_velocity;
            }

            node.position += node.velocity * dt;
            total_energy += speed * speed;
        }

        self.energy = total_energy;
        self.ticks += 1;
    }

    /// Accumulates repulsion, spring and centering forces for every node.
    fn accumulate_forces(&self) -> Vec<Point> {
        let n = self.nodes.len();
        let mut forces = vec![Point::ZERO; n];

        // Pairwise repulsion, inverse square.
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.nodes[i].position - self.nodes[j].position;
                let dist = delta.length().max(self.config.min_distance);
                let magnitude = self.config.repulsion / (dist * dist);
                let push = delta.normalized() * magnitude;
                forces[i] += push;
                forces[j] += push * -1.0;
            }
        }

        // Spring attraction along edges toward the rest length.
        for edge in &self.edges {
            let delta = self.nodes[edge.target].position - self.nodes[edge.source].position;
            let dist = delta.length().max(self.config.min_distance);
            let stretch = dist - self.config.rest_length;
            let pull = delta.normalized() * (stretch * self.config.spring_strength);
            forces[edge.source] += pull;
            forces[edge.target] += pull * -1.0;
        }

        // Centering.
        for (i, node) in self.nodes.iter().enumerate() {
            forces[i] += (self.center - node.position) * self.config.center_strength;
        }

        forces
    }

    /// Runs ticks until the kinetic energy decays below the configured
    /// threshold or the iteration budget is exhausted. Returns the number
    /// of ticks executed by this call.
    pub fn run(&mut self) -> usize {
        let start = self.ticks;
        while self.ticks - start < self.config.max_ticks && !self.is_stable() {
            self.tick(TICK_DT);
        }
        self.ticks - start
    }

    /// Whether the layout has converged.
    pub fn is_stable(&self) -> bool {
        self.energy < self.config.energy_threshold
    }

    /// Kinetic energy after the last tick.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Total ticks executed so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    // ========== Interaction ==========

    /// Pins a node to a fixed position (pointer-down). Pinned nodes are
    /// excluded from integration but keep repelling their neighbors.
    /// Returns false if the id is unknown.
    pub fn pin(&mut self, id: &SystemId, position: Point) -> bool {
        match self.node_index.get(id) {
            Some(&i) => {
                let node = &mut self.nodes[i];
                node.position = position;
                node.velocity = Point::ZERO;
                node.pinned = true;
                true
            }
            None => false,
        }
    }

    /// Releases a pinned node (pointer-up), resuming free simulation for
    /// it. Returns false if the id is unknown.
    pub fn unpin(&mut self, id: &SystemId) -> bool {
        match self.node_index.get(id) {
            Some(&i) => {
                self.nodes[i].pinned = false;
                true
            }
            None => false,
        }
    }

    // ========== Output ==========

    /// Current node states.
    pub fn nodes(&self) -> &[ForceNode] {
        &self.nodes
    }

    /// Node lookup by system id.
    pub fn node(&self, id: &SystemId) -> Option<&ForceNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Current edge curves, recomputed from the node positions.
    ///
    /// The perpendicular offset is derived from the edge's current angle,
    /// so curves track the simulation tick by tick.
    pub fn edge_curves(&self) -> Vec<EdgeCurve> {
        self.edges
            .iter()
            .map(|edge| {
                let start = self.nodes[edge.source].position;
                let end = self.nodes[edge.target].position;
                let midpoint = (start + end) * 0.5;
                let offset = (end - start).normalized().perpendicular() * EDGE_OFFSET;
                let control = midpoint + offset;
                EdgeCurve {
                    source: self.nodes[edge.source].id.clone(),
                    target: self.nodes[edge.target].id.clone(),
                    quality: edge.quality,
                    start,
                    control,
                    end,
                    arrow_angle: (end - control).angle(),
                }
            })
            .collect()
    }
}

//! Layered flow layout adapter.
//!
//! Aggregates the filtered connections into a left-to-right flow diagram:
//! systems become ranked columns, edge thickness is proportional to
//! volume, and node vertical extent is proportional to total through-
//! volume. Unlike the force and matrix adapters, systems with zero
//! surviving connections are excluded from this layout.
//!
//! Ranking uses Kahn's topological ordering with longest-path layer
//! assignment; nodes left over by cycles are appended deterministically.

use crate::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use toposcope_model::{SystemId, Topology};

/// Horizontal margin around the diagram.
const MARGIN: f64 = 40.0;

/// Vertical gap between stacked nodes in one column.
const NODE_GAP: f64 = 14.0;

/// Minimum rendered node height / edge thickness.
const MIN_EXTENT: f64 = 2.0;

/// A system placed into the flow diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: SystemId,
    pub name: String,
    /// Column index, increasing left to right.
    pub rank: usize,
    /// Left edge of the node bar.
    pub x: f64,
    /// Top edge of the node bar.
    pub y: f64,
    /// Vertical extent, proportional to total through-volume.
    pub height: f64,
    /// Sum of incident edge volumes (incoming plus outgoing).
    pub throughput: f64,
}

/// A volume-weighted edge between two placed nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: SystemId,
    pub target: SystemId,
    /// Connection volume.
    pub value: f64,
    /// Stroke thickness, proportional to `value`.
    pub thickness: f64,
    /// Hover text, `"{source} → {target}: {volume}"`.
    pub tooltip: String,
}

/// The layered flow diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowLayout {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub width: f64,
    pub height: f64,
}

impl FlowLayout {
    /// Width of a node bar. Renderers draw bars at exactly this width, so
    /// edge anchor points and the placement math below stay in agreement.
    pub const NODE_WIDTH: f64 = 18.0;

    /// Builds the diagram from a filtered topology.
    ///
    /// # Errors
    ///
    /// [`Error::NoRenderableContent`] when no connections survive the
    /// filter (this adapter has nothing to aggregate without edges).
    pub fn build(topology: &Topology, width: f64, height: f64) -> Result<Self> {
        // Edge list first; connections with unknown endpoints are skipped.
        let mut edges: Vec<(SystemId, SystemId, f64)> = Vec::new();
        for conn in topology.connections() {
            if topology.system(&conn.source).is_none() || topology.system(&conn.target).is_none() {
                warn!(
                    "skipping connection with unknown endpoint: {} -> {}",
                    conn.source, conn.target
                );
                continue;
            }
            edges.push((conn.source.clone(), conn.target.clone(), conn.volume));
        }
        if edges.is_empty() {
            return Err(Error::NoRenderableContent(
                "no connections survive the filter".into(),
            ));
        }

        // Distinct systems appearing as either endpoint, in edge order.
        let mut node_ids: Vec<SystemId> = Vec::new();
        let mut seen: HashSet<SystemId> = HashSet::new();
        for (source, target, _) in &edges {
            for id in [source, target] {
                if seen.insert(id.clone()) {
                    node_ids.push(id.clone());
                }
            }
        }

        let ranks = compute_ranks(&node_ids, &edges);
        let max_rank = ranks.values().copied().max().unwrap_or(0);

        // Bucket nodes per rank, then run one median-of-predecessors pass
        // to reduce crossings.
        let mut rank_buckets: Vec<Vec<SystemId>> = vec![Vec::new(); max_rank + 1];
        for id in &node_ids {
            rank_buckets[ranks[id]].push(id.clone());
        }
        order_by_median(&mut rank_buckets, &edges);

        // Through-volume per node.
        let mut throughput: HashMap<SystemId, f64> = HashMap::new();
        for (source, target, volume) in &edges {
            *throughput.entry(source.clone()).or_insert(0.0) += volume;
            *throughput.entry(target.clone()).or_insert(0.0) += volume;
        }

        // One shared volume→pixels scale so columns and edges agree.
        let usable = (height - 2.0 * MARGIN).max(50.0);
        let max_column: f64 = rank_buckets
            .iter()
            .map(|bucket| bucket.iter().map(|id| throughput[id]).sum::<f64>())
            .fold(0.0, f64::max);
        let scale = if max_column > 0.0 { usable * 0.8 / max_column } else { 1.0 };

        let column_span = if max_rank > 0 {
            (width - 2.0 * MARGIN - Self::NODE_WIDTH) / max_rank as f64
        } else {
            0.0
        };

        let mut nodes = Vec::with_capacity(node_ids.len());
        for (rank, bucket) in rank_buckets.iter().enumerate() {
            let total: f64 = bucket
                .iter()
                .map(|id| (throughput[id] * scale).max(MIN_EXTENT))
                .sum::<f64>()
                + NODE_GAP * bucket.len().saturating_sub(1) as f64;
            let mut y = (height - total) / 2.0;

            for id in bucket {
                let node_height = (throughput[id] * scale).max(MIN_EXTENT);
                let name = topology
                    .system(id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                nodes.push(FlowNode {
                    id: id.clone(),
                    name,
                    rank,
                    x: MARGIN + rank as f64 * column_span,
                    y,
                    height: node_height,
                    throughput: throughput[id],
                });
                y += node_height + NODE_GAP;
            }
        }

        let name_of = |id: &SystemId| -> String {
            topology
                .system(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        let flow_edges = edges
            .iter()
            .map(|(source, target, volume)| FlowEdge {
                source: source.clone(),
                target: target.clone(),
                value: *volume,
                thickness: (volume * scale).max(MIN_EXTENT),
                tooltip: format!(
                    "{} → {}: {}",
                    name_of(source),
                    name_of(target),
                    format_volume(*volume)
                ),
            })
            .collect();

        Ok(Self {
            nodes,
            edges: flow_edges,
            width,
            height,
        })
    }

    /// Node lookup by system id.
    pub fn node(&self, id: &SystemId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

/// Formats a volume without a trailing `.0` for whole numbers.
pub fn format_volume(volume: f64) -> String {
    if volume.fract() == 0.0 {
        format!("{}", volume as i64)
    } else {
        format!("{:.1}", volume)
    }
}

/// Kahn topological ordering with longest-path layer assignment.
///
/// Nodes left unordered by a cycle are appended in their original order,
/// so the result is deterministic for any input.
fn compute_ranks(
    node_ids: &[SystemId],
    edges: &[(SystemId, SystemId, f64)],
) -> HashMap<SystemId, usize> {
    let mut indeg: HashMap<SystemId, usize> = node_ids.iter().map(|id| (id.clone(), 0)).collect();
    let mut adj: HashMap<SystemId, Vec<SystemId>> = HashMap::new();

    for (source, target, _) in edges {
        adj.entry(source.clone()).or_default().push(target.clone());
        *indeg.entry(target.clone()).or_insert(0) += 1;
    }

    let mut queue: VecDeque<SystemId> = node_ids
        .iter()
        .filter(|id| indeg[*id] == 0)
        .cloned()
        .collect();

    let mut order = Vec::new();
    while let Some(node) = queue.pop_front() {
        order.push(node.clone());
        if let Some(nexts) = adj.get(&node) {
            for next in nexts {
                if let Some(deg) = indeg.get_mut(next) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(next.clone());
                    }
                }
            }
        }
    }

    // Cycle leftovers, original order.
    if order.len() < node_ids.len() {
        let seen: HashSet<SystemId> = order.iter().cloned().collect();
        for id in node_ids {
            if !seen.contains(id) {
                order.push(id.clone());
            }
        }
    }

    let mut ranks: HashMap<SystemId, usize> = HashMap::new();
    for node in &order {
        let rank = *ranks.get(node).unwrap_or(&0);
        ranks.entry(node.clone()).or_insert(rank);
        if let Some(nexts) = adj.get(node) {
            for next in nexts {
                let entry = ranks.entry(next.clone()).or_insert(0);
                *entry = (*entry).max(rank + 1);
            }
        }
    }

    ranks
}

/// Single left-to-right sweep ordering each bucket by the median position
/// of its predecessors in the previous rank.
fn order_by_median(rank_buckets: &mut [Vec<SystemId>], edges: &[(SystemId, SystemId, f64)]) {
    if rank_buckets.len() <= 1 {
        return;
    }

    let mut incoming: HashMap<SystemId, Vec<SystemId>> = HashMap::new();
    for (source, target, _) in edges {
        incoming.entry(target.clone()).or_default().push(source.clone());
    }

    for rank in 1..rank_buckets.len() {
        let positions: HashMap<SystemId, usize> = rank_buckets[rank - 1]
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        rank_buckets[rank].sort_by_key(|id| {
            let mut prevs: Vec<usize> = incoming
                .get(id)
                .map(|sources| {
                    sources
                        .iter()
                        .filter_map(|s| positions.get(s).copied())
                        .collect()
                })
                .unwrap_or_default();
            if prevs.is_empty() {
                return usize::MAX; // no upstream anchor, sink to the bottom
            }
            prevs.sort_unstable();
            prevs[prevs.len() / 2]
        });
    }
}

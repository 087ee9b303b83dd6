//! Dijkstra's shortest paths with a step-event log.
//!
//! The working set starts with every node and is re-sorted by tentative
//! distance on every iteration (stable, so ties keep their current order).
//! No heap: the log is the product, not throughput.
//!
//! The log is total and ordered:
//! - `initializing` once;
//! - per extracted node, `consider_node`, then for each outgoing edge
//!   `consider_edge` followed by `update_distance` or `distance_unchanged`,
//!   then `shortest_distance_calculated`;
//! - if the extracted node is unreachable, `consider_node` is followed by a
//!   single `no_more_reachable` and the run ends.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use combviz_core::{Graph, NodeId, Weighted};

/// One discrete decision of the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum DijkstraStep {
    Initializing { start: NodeId },
    ConsiderNode { node: NodeId },
    ConsiderEdge { from: NodeId, to: NodeId },
    UpdateDistance { from: NodeId, to: NodeId, dist: f64 },
    DistanceUnchanged { from: NodeId, to: NodeId, dist: f64 },
    ShortestDistanceCalculated { node: NodeId },
    NoMoreReachable { node: NodeId },
}

impl DijkstraStep {
    /// The serialized action name.
    pub fn action(&self) -> &'static str {
        match self {
            DijkstraStep::Initializing { .. } => "initializing",
            DijkstraStep::ConsiderNode { .. } => "consider_node",
            DijkstraStep::ConsiderEdge { .. } => "consider_edge",
            DijkstraStep::UpdateDistance { .. } => "update_distance",
            DijkstraStep::DistanceUnchanged { .. } => "distance_unchanged",
            DijkstraStep::ShortestDistanceCalculated { .. } => "shortest_distance_calculated",
            DijkstraStep::NoMoreReachable { .. } => "no_more_reachable",
        }
    }
}

/// Final distances, predecessors, and the full step log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DijkstraResult {
    /// Shortest distance from the start; `f64::INFINITY` when unreachable.
    /// Unreachable distances are written as `null`.
    #[serde(with = "unreachable_as_null")]
    pub distances: IndexMap<NodeId, f64>,
    /// Predecessor on a shortest path; `None` for the start and unreachable
    /// nodes.
    pub previous: IndexMap<NodeId, Option<NodeId>>,
    pub steps: Vec<DijkstraStep>,
}

mod unreachable_as_null {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use combviz_core::NodeId;

    pub fn serialize<S: Serializer>(distances: &IndexMap<NodeId, f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let finite: IndexMap<&NodeId, Option<f64>> = distances
            .iter()
            .map(|(id, &d)| (id, Some(d).filter(|d| d.is_finite())))
            .collect();
        finite.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<NodeId, f64>, D::Error> {
        let raw = IndexMap::<NodeId, Option<f64>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(id, d)| (id, d.unwrap_or(f64::INFINITY)))
            .collect())
    }
}

impl DijkstraResult {
    pub fn distance(&self, id: &str) -> Option<f64> {
        self.distances.get(id).copied()
    }

    /// Rebuilds the shortest path from the start to `target` by following
    /// predecessors. `None` if `target` is unreachable or unknown.
    pub fn path_to(&self, target: &str) -> Option<Vec<NodeId>> {
        let distance = self.distance(target)?;
        if distance.is_infinite() {
            return None;
        }
        let mut path = Vec::new();
        let mut cursor = self.distances.get_key_value(target).map(|(id, _)| id.clone());
        while let Some(id) = cursor {
            // Predecessor chains only loop on inputs with negative weights.
            if path.len() > self.previous.len() {
                return None;
            }
            cursor = self.previous.get(&id).cloned().flatten();
            path.push(id);
        }
        path.reverse();
        Some(path)
    }

    /// Number of nodes whose distance was finalized.
    pub fn finalized_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, DijkstraStep::ShortestDistanceCalculated { .. }))
            .count()
    }
}

/// Runs Dijkstra from `start`.
///
/// The start id always receives distance 0 in the output, even if it is not
/// a node of `graph` (every graph node then stays unreachable). An edge
/// whose target is not a node never improves a distance.
pub fn dijkstra<N, E: Weighted>(graph: &Graph<N, E>, start: &str) -> DijkstraResult {
    let mut distances: IndexMap<NodeId, f64> = IndexMap::with_capacity(graph.node_count());
    let mut previous: IndexMap<NodeId, Option<NodeId>> = IndexMap::with_capacity(graph.node_count());
    let mut queue: Vec<&NodeId> = Vec::with_capacity(graph.node_count());
    let mut steps = Vec::new();

    for node in graph.nodes() {
        distances.insert(node.id.clone(), f64::INFINITY);
        previous.insert(node.id.clone(), None);
        queue.push(&node.id);
    }
    let start = NodeId::from(start);
    distances.insert(start.clone(), 0.0);
    previous.entry(start.clone()).or_insert(None);
    steps.push(DijkstraStep::Initializing { start });

    while !queue.is_empty() {
        queue.sort_by(|a, b| tentative(&distances, a).total_cmp(&tentative(&distances, b)));
        let current = queue.remove(0);
        steps.push(DijkstraStep::ConsiderNode {
            node: current.clone(),
        });

        let current_distance = tentative(&distances, current);
        if current_distance.is_infinite() {
            steps.push(DijkstraStep::NoMoreReachable {
                node: current.clone(),
            });
            break;
        }

        if let Some(node) = graph.node(current.as_str()) {
            for (target, data) in node.successors() {
                let dist = current_distance + data.weight();
                steps.push(DijkstraStep::ConsiderEdge {
                    from: current.clone(),
                    to: target.clone(),
                });
                match distances.get_mut(target) {
                    Some(known) if dist < *known => {
                        *known = dist;
                        previous.insert(target.clone(), Some(current.clone()));
                        steps.push(DijkstraStep::UpdateDistance {
                            from: current.clone(),
                            to: target.clone(),
                            dist,
                        });
                    }
                    _ => steps.push(DijkstraStep::DistanceUnchanged {
                        from: current.clone(),
                        to: target.clone(),
                        dist,
                    }),
                }
            }
        }

        steps.push(DijkstraStep::ShortestDistanceCalculated {
            node: current.clone(),
        });
    }

    tracing::debug!(
        nodes = graph.node_count(),
        steps = steps.len(),
        "dijkstra finished"
    );

    DijkstraResult {
        distances,
        previous,
        steps,
    }
}

fn tentative(distances: &IndexMap<NodeId, f64>, id: &NodeId) -> f64 {
    distances.get(id).copied().unwrap_or(f64::INFINITY)
}

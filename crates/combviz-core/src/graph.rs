//! Graph: the identifier-indexed directed graph container.
//!
//! [`Graph`] owns every [`Node`]; nodes reference their successors by
//! [`NodeId`] only. Edges may point at identifiers that are not (yet) nodes
//! in the graph -- only the *source* of an edge has to exist.
//!
//! No reverse index is maintained. Incoming-edge queries
//! ([`all_edges_to`](Graph::all_edges_to),
//! [`all_predecessors`](Graph::all_predecessors)) are O(V) scans, which keeps
//! every mutation trivially consistent.
//!
//! # Snapshot format
//!
//! `{id, nodes: [{id, data, successors: [{target, data}]}]}`. Loading is
//! two-pass: all nodes are materialized first, then every edge is wired, so
//! forward and cyclic references resolve.

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::Node;

/// Identifier used when a graph is created without one.
pub const DEFAULT_GRAPH_ID: &str = "1";

/// Directed graph with node payload `N` and edge payload `E`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<N, E> {
    pub id: String,
    nodes: IndexMap<NodeId, Node<N, E>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Graph::with_id(DEFAULT_GRAPH_ID)
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Graph {
            id: id.into(),
            nodes: IndexMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Iterates all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<N, E>> {
        self.nodes.values()
    }

    /// Returns the underlying identifier -> node map.
    pub fn nodes_map(&self) -> &IndexMap<NodeId, Node<N, E>> {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node<N, E>> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node<N, E>> {
        self.nodes.get_mut(id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::out_degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every edge pointing at `id`, as `(source, payload)` pairs.
    pub fn all_edges_to(&self, id: &str) -> Vec<(&NodeId, &E)> {
        self.nodes
            .values()
            .filter_map(|node| node.edge_data(id).map(|data| (&node.id, data)))
            .collect()
    }

    /// Every node with an edge pointing at `id`.
    pub fn all_predecessors(&self, id: &str) -> Vec<&Node<N, E>> {
        self.nodes
            .values()
            .filter(|node| node.has_successor(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Inserts a node unless `id` is taken. An existing node is returned
    /// unchanged and `data` is discarded.
    pub fn add_node(&mut self, id: impl Into<NodeId>, data: N) -> &mut Node<N, E> {
        let id = id.into();
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id, data))
    }

    /// Inserts a pre-built node unless its id is taken, in which case the
    /// existing node is returned and `node` is dropped.
    pub fn add_complete_node(&mut self, node: Node<N, E>) -> &mut Node<N, E> {
        self.nodes.entry(node.id.clone()).or_insert(node)
    }

    /// Sets the edge `source -> dest`, returning the payload it replaced.
    /// No-op when `source` does not exist.
    pub fn add_edge(&mut self, source: &str, dest: impl Into<NodeId>, data: E) -> Option<E> {
        self.nodes
            .get_mut(source)
            .and_then(|node| node.add_edge(dest, data))
    }

    /// Removes the edge `source -> dest`, returning its payload.
    pub fn remove_edge(&mut self, source: &str, dest: &str) -> Option<E> {
        self.nodes
            .get_mut(source)
            .and_then(|node| node.remove_edge(dest))
    }

    /// Removes a node together with every edge pointing at it.
    ///
    /// Returns whether the node existed.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        for node in self.nodes.values_mut() {
            node.remove_edge(id);
        }
        self.nodes.shift_remove(id).is_some()
    }

    /// Clears the graph, handing back the previous node map.
    pub fn remove_all_nodes(&mut self) -> IndexMap<NodeId, Node<N, E>> {
        std::mem::take(&mut self.nodes)
    }

    /// Replaces the whole node map, returning the one it displaced.
    pub fn replace_nodes(
        &mut self,
        nodes: IndexMap<NodeId, Node<N, E>>,
    ) -> IndexMap<NodeId, Node<N, E>> {
        std::mem::replace(&mut self.nodes, nodes)
    }

    /// Removes only the node entry, leaving edges that point at it in place.
    pub(crate) fn detach_node(&mut self, id: &str) -> Option<Node<N, E>> {
        self.nodes.shift_remove(id)
    }

    /// Removes a node and its incoming edges, recording positions so that
    /// [`restore_node`](Self::restore_node) can put everything back in order.
    pub(crate) fn take_node(&mut self, id: &str) -> Option<RemovedNode<N, E>> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        let mut incoming = Vec::new();
        for node in self.nodes.values_mut() {
            if let Some((position, data)) = node.take_edge(id) {
                incoming.push(IncomingEdge {
                    source: node.id.clone(),
                    position,
                    data,
                });
            }
        }
        let (index, _, node) = self.nodes.shift_remove_full(id)?;
        Some(RemovedNode {
            index,
            node,
            incoming,
        })
    }

    /// Inverse of [`take_node`](Self::take_node).
    pub(crate) fn restore_node(&mut self, removed: RemovedNode<N, E>) {
        let RemovedNode {
            index,
            node,
            incoming,
        } = removed;
        let target = node.id.clone();
        if self.nodes.contains_key(&target) {
            return;
        }
        let index = index.min(self.nodes.len());
        self.nodes.shift_insert(index, target.clone(), node);
        for edge in incoming {
            if let Some(source) = self.nodes.get_mut(&edge.source) {
                source.restore_edge(edge.position, target.clone(), edge.data);
            }
        }
    }
}

/// A node taken out of a graph along with everything needed to put it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedNode<N, E> {
    /// Position of the node in the graph's node map.
    pub index: usize,
    pub node: Node<N, E>,
    pub incoming: Vec<IncomingEdge<E>>,
}

/// An edge that pointed at a removed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingEdge<E> {
    pub source: NodeId,
    /// Position of the edge in the source's adjacency map.
    pub position: usize,
    pub data: E,
}

impl<N: Clone, E: Clone> Graph<N, E> {
    /// Deep copy by depth-first traversal.
    ///
    /// Every not-yet-visited node starts a traversal; a successor that has
    /// already been cloned is skipped, so cycles terminate. Dangling edges
    /// are copied as-is.
    pub fn clone_graph(&self) -> Graph<N, E> {
        let mut cloned = Graph::with_id(self.id.clone());
        let mut stack: Vec<&Node<N, E>> = Vec::new();

        for root in self.nodes.values() {
            if cloned.has_node(root.id.as_str()) {
                continue;
            }
            stack.push(root);
            while let Some(node) = stack.pop() {
                if cloned.has_node(node.id.as_str()) {
                    continue;
                }
                let copy = cloned.add_node(node.id.clone(), node.data.clone());
                for (target, data) in node.successors() {
                    copy.add_edge(target.clone(), data.clone());
                }
                // Reverse so the first successor is explored first.
                for (target, _) in node.successors.iter().rev() {
                    if let Some(next) = self.nodes.get(target) {
                        if !cloned.has_node(target.as_str()) {
                            stack.push(next);
                        }
                    }
                }
            }
        }
        cloned
    }

    /// Snapshot in the `{id, nodes: [...]}` format.
    pub fn to_json(&self) -> GraphJson<N, E> {
        GraphJson {
            id: self.id.clone(),
            nodes: self
                .nodes
                .values()
                .map(|node| NodeJson {
                    id: node.id.clone(),
                    data: node.data.clone(),
                    successors: node
                        .successors()
                        .map(|(target, data)| SuccessorJson {
                            target: target.clone(),
                            data: data.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Builds a petgraph view of the graph for use with petgraph's
    /// algorithms. Dangling edges are skipped.
    pub fn to_petgraph(&self) -> (DiGraph<NodeId, E>, IndexMap<NodeId, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.node_count(), self.edge_count());
        let mut indices = IndexMap::with_capacity(self.node_count());
        for id in self.nodes.keys() {
            indices.insert(id.clone(), graph.add_node(id.clone()));
        }
        for node in self.nodes.values() {
            let from = indices[&node.id];
            for (target, data) in node.successors() {
                if let Some(&to) = indices.get(target) {
                    graph.add_edge(from, to, data.clone());
                }
            }
        }
        (graph, indices)
    }
}

impl<N, E> Graph<N, E> {
    /// Loads a snapshot: nodes first, then edges.
    ///
    /// A duplicated node id keeps its first payload; edges listed under every
    /// copy are attached to that single node.
    pub fn from_json(json: GraphJson<N, E>) -> Graph<N, E> {
        let mut graph = Graph::with_id(json.id);
        let mut pending = Vec::with_capacity(json.nodes.len());

        for node_json in json.nodes {
            graph.add_node(node_json.id.clone(), node_json.data);
            pending.push((node_json.id, node_json.successors));
        }

        for (id, successors) in pending {
            for edge in successors {
                graph.add_edge(id.as_str(), edge.target, edge.data);
            }
        }
        graph
    }
}

impl<N, E> Graph<N, E>
where
    N: Clone + Serialize,
    E: Clone + Serialize,
{
    pub fn to_json_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.to_json())?)
    }
}

impl<N, E> Graph<N, E>
where
    N: for<'de> Deserialize<'de>,
    E: for<'de> Deserialize<'de>,
{
    pub fn from_json_str(json: &str) -> Result<Graph<N, E>, CoreError> {
        let snapshot: GraphJson<N, E> = serde_json::from_str(json)?;
        Ok(Graph::from_json(snapshot))
    }
}

impl<N: Clone + Serialize, E: Clone + Serialize> Serialize for Graph<N, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de, N: Deserialize<'de>, E: Deserialize<'de>> Deserialize<'de> for Graph<N, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        GraphJson::deserialize(deserializer).map(Graph::from_json)
    }
}

/// Serialized graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphJson<N, E> {
    pub id: String,
    pub nodes: Vec<NodeJson<N, E>>,
}

/// Serialized node with its outgoing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson<N, E> {
    pub id: NodeId,
    pub data: N,
    pub successors: Vec<SuccessorJson<E>>,
}

/// Serialized outgoing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessorJson<E> {
    pub target: NodeId,
    pub data: E,
}

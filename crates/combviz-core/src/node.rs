//! Graph node: identifier, payload, and outgoing adjacency.
//!
//! A node never owns its neighbours. Successors are stored by identifier and
//! resolved through the owning [`Graph`](crate::graph::Graph); a successor
//! identifier need not name an existing node.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::payload::Mergeable;

/// A node with payload `N` and outgoing edges carrying payload `E`.
///
/// At most one edge exists per ordered `(self, target)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<N, E> {
    pub id: NodeId,
    pub data: N,
    /// Outgoing edges: target identifier -> edge payload, in insertion order.
    pub successors: IndexMap<NodeId, E>,
}

impl<N, E> Node<N, E> {
    pub fn new(id: impl Into<NodeId>, data: N) -> Self {
        Node {
            id: id.into(),
            data,
            successors: IndexMap::new(),
        }
    }

    pub fn data(&self) -> &N {
        &self.data
    }

    /// Replaces the payload wholesale.
    pub fn set_data(&mut self, data: N) {
        self.data = data;
    }

    /// Iterates outgoing edges as `(target, payload)` pairs.
    pub fn successors(&self) -> impl Iterator<Item = (&NodeId, &E)> {
        self.successors.iter()
    }

    pub fn out_degree(&self) -> usize {
        self.successors.len()
    }

    /// Returns the payload of the edge to `target`, if present.
    pub fn edge_data(&self, target: &str) -> Option<&E> {
        self.successors.get(target)
    }

    pub fn has_successor(&self, target: &str) -> bool {
        self.successors.contains_key(target)
    }

    /// Sets the edge to `target`, returning the payload it replaced.
    pub fn add_edge(&mut self, target: impl Into<NodeId>, data: E) -> Option<E> {
        self.successors.insert(target.into(), data)
    }

    /// Removes the edge to `target`, returning its payload.
    pub fn remove_edge(&mut self, target: &str) -> Option<E> {
        self.successors.shift_remove(target)
    }

    /// Replaces the payload of an existing edge. No-op if the edge is absent.
    pub fn set_edge_data(&mut self, target: &str, data: E) {
        if let Some(slot) = self.successors.get_mut(target) {
            *slot = data;
        }
    }

    /// Removes the edge to `target`, also reporting its adjacency position.
    pub(crate) fn take_edge(&mut self, target: &str) -> Option<(usize, E)> {
        self.successors
            .shift_remove_full(target)
            .map(|(index, _, data)| (index, data))
    }

    /// Re-inserts an edge at the adjacency position it was removed from.
    pub(crate) fn restore_edge(&mut self, index: usize, target: NodeId, data: E) {
        let index = index.min(self.successors.len());
        self.successors.shift_insert(index, target, data);
    }
}

impl<N: Mergeable, E> Node<N, E> {
    /// Merges `patch` into the payload.
    pub fn change_data(&mut self, patch: &N::Patch) {
        self.data.merge(patch);
    }
}

impl<N, E: Mergeable> Node<N, E> {
    /// Merges `patch` into the edge to `target`. Returns `false` if the edge
    /// does not exist.
    pub fn change_edge_data(&mut self, target: &str, patch: &E::Patch) -> bool {
        match self.successors.get_mut(target) {
            Some(data) => {
                data.merge(patch);
                true
            }
            None => false,
        }
    }
}

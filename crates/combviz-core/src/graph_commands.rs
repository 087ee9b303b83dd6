//! Reversible graph edits.
//!
//! [`GraphCommand`] is the closed set of structural edits on a [`Graph`].
//! Each variant carries its arguments plus a capture slot that `execute`
//! fills with exactly what it needs to invert itself. Captures are owned
//! copies, so later edits to the graph cannot corrupt them.
//!
//! Edits that turn out to be no-ops (adding an existing node, touching a
//! missing source) capture that fact too, and their undo is a no-op.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::graph::{Graph, RemovedNode};
use crate::id::NodeId;
use crate::node::Node;
use crate::payload::Mergeable;

/// What an edge slot held before an [`GraphCommand::AddEdge`] wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum PriorEdge<E> {
    Vacant,
    Occupied(E),
}

/// A reversible mutation of a `Graph<N, E>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    bound(
        serialize = "N: Serialize, N::Patch: Serialize, E: Serialize, E::Patch: Serialize",
        deserialize = "N: Deserialize<'de>, N::Patch: Deserialize<'de>, E: Deserialize<'de>, E::Patch: Deserialize<'de>"
    )
)]
pub enum GraphCommand<N: Mergeable, E: Mergeable> {
    /// Insert a node. A no-op if the id is taken.
    AddNode {
        id: NodeId,
        data: N,
        #[serde(default)]
        inserted: bool,
    },
    /// Remove a node and every edge pointing at it.
    RemoveNode {
        id: NodeId,
        #[serde(default)]
        removed: Option<RemovedNode<N, E>>,
    },
    /// Set the edge `source -> target`, replacing any previous payload.
    AddEdge {
        source: NodeId,
        target: NodeId,
        data: E,
        #[serde(default)]
        prior: Option<PriorEdge<E>>,
    },
    /// Remove the edge `source -> target`.
    RemoveEdge {
        source: NodeId,
        target: NodeId,
        /// Adjacency position and payload of the removed edge.
        #[serde(default)]
        removed: Option<(usize, E)>,
    },
    /// Merge a partial update into a node payload.
    ChangeNodeData {
        id: NodeId,
        patch: N::Patch,
        #[serde(default)]
        previous: Option<N>,
    },
    /// Merge a partial update into an edge payload.
    ChangeEdgeData {
        source: NodeId,
        target: NodeId,
        patch: E::Patch,
        #[serde(default)]
        previous: Option<E>,
    },
    /// Clear the graph. Undo restores the whole node map at once.
    RemoveAllNodes {
        #[serde(default)]
        removed: Option<IndexMap<NodeId, Node<N, E>>>,
    },
}

impl<N: Mergeable, E: Mergeable> GraphCommand<N, E> {
    pub fn add_node(id: impl Into<NodeId>, data: N) -> Self {
        GraphCommand::AddNode {
            id: id.into(),
            data,
            inserted: false,
        }
    }

    pub fn remove_node(id: impl Into<NodeId>) -> Self {
        GraphCommand::RemoveNode {
            id: id.into(),
            removed: None,
        }
    }

    pub fn add_edge(source: impl Into<NodeId>, target: impl Into<NodeId>, data: E) -> Self {
        GraphCommand::AddEdge {
            source: source.into(),
            target: target.into(),
            data,
            prior: None,
        }
    }

    pub fn remove_edge(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        GraphCommand::RemoveEdge {
            source: source.into(),
            target: target.into(),
            removed: None,
        }
    }

    pub fn change_node_data(id: impl Into<NodeId>, patch: N::Patch) -> Self {
        GraphCommand::ChangeNodeData {
            id: id.into(),
            patch,
            previous: None,
        }
    }

    pub fn change_edge_data(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        patch: E::Patch,
    ) -> Self {
        GraphCommand::ChangeEdgeData {
            source: source.into(),
            target: target.into(),
            patch,
            previous: None,
        }
    }

    pub fn remove_all_nodes() -> Self {
        GraphCommand::RemoveAllNodes { removed: None }
    }
}

impl<N: Mergeable, E: Mergeable> Command<Graph<N, E>> for GraphCommand<N, E> {
    fn execute(&mut self, graph: &mut Graph<N, E>) {
        match self {
            GraphCommand::AddNode { id, data, inserted } => {
                *inserted = !graph.has_node(id.as_str());
                if *inserted {
                    graph.add_node(id.clone(), data.clone());
                }
            }
            GraphCommand::RemoveNode { id, removed } => {
                *removed = graph.take_node(id.as_str());
            }
            GraphCommand::AddEdge {
                source,
                target,
                data,
                prior,
            } => {
                *prior = graph.node_mut(source.as_str()).map(|node| {
                    match node.add_edge(target.clone(), data.clone()) {
                        Some(old) => PriorEdge::Occupied(old),
                        None => PriorEdge::Vacant,
                    }
                });
            }
            GraphCommand::RemoveEdge {
                source,
                target,
                removed,
            } => {
                *removed = graph
                    .node_mut(source.as_str())
                    .and_then(|node| node.take_edge(target.as_str()));
            }
            GraphCommand::ChangeNodeData {
                id,
                patch,
                previous,
            } => {
                *previous = graph.node_mut(id.as_str()).map(|node| {
                    let before = node.data.clone();
                    node.change_data(patch);
                    before
                });
            }
            GraphCommand::ChangeEdgeData {
                source,
                target,
                patch,
                previous,
            } => {
                *previous = graph.node_mut(source.as_str()).and_then(|node| {
                    let before = node.edge_data(target.as_str()).cloned()?;
                    node.change_edge_data(target.as_str(), patch);
                    Some(before)
                });
            }
            GraphCommand::RemoveAllNodes { removed } => {
                *removed = Some(graph.remove_all_nodes());
            }
        }
    }

    fn undo(&mut self, graph: &mut Graph<N, E>) {
        match self {
            GraphCommand::AddNode { id, inserted, .. } => {
                // Only the node entry goes: dangling edges that already
                // pointed at this id predate the command.
                if std::mem::take(inserted) {
                    graph.detach_node(id.as_str());
                }
            }
            GraphCommand::RemoveNode { removed, .. } => {
                if let Some(removed) = removed.take() {
                    graph.restore_node(removed);
                }
            }
            GraphCommand::AddEdge {
                source,
                target,
                prior,
                ..
            } => match prior.take() {
                Some(PriorEdge::Vacant) => {
                    graph.remove_edge(source.as_str(), target.as_str());
                }
                Some(PriorEdge::Occupied(old)) => {
                    if let Some(node) = graph.node_mut(source.as_str()) {
                        node.set_edge_data(target.as_str(), old);
                    }
                }
                None => {}
            },
            GraphCommand::RemoveEdge {
                source,
                target,
                removed,
            } => {
                if let Some((position, data)) = removed.take() {
                    if let Some(node) = graph.node_mut(source.as_str()) {
                        node.restore_edge(position, target.clone(), data);
                    }
                }
            }
            GraphCommand::ChangeNodeData { id, previous, .. } => {
                if let Some(before) = previous.take() {
                    if let Some(node) = graph.node_mut(id.as_str()) {
                        node.set_data(before);
                    }
                }
            }
            GraphCommand::ChangeEdgeData {
                source,
                target,
                previous,
                ..
            } => {
                if let Some(before) = previous.take() {
                    if let Some(node) = graph.node_mut(source.as_str()) {
                        node.set_edge_data(target.as_str(), before);
                    }
                }
            }
            GraphCommand::RemoveAllNodes { removed } => {
                if let Some(nodes) = removed.take() {
                    graph.replace_nodes(nodes);
                }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            GraphCommand::AddNode { id, .. } => format!("add node {}", id),
            GraphCommand::RemoveNode { id, .. } => format!("remove node {}", id),
            GraphCommand::AddEdge { source, target, .. } => {
                format!("add edge {} -> {}", source, target)
            }
            GraphCommand::RemoveEdge { source, target, .. } => {
                format!("remove edge {} -> {}", source, target)
            }
            GraphCommand::ChangeNodeData { id, .. } => format!("change node {}", id),
            GraphCommand::ChangeEdgeData { source, target, .. } => {
                format!("change edge {} -> {}", source, target)
            }
            GraphCommand::RemoveAllNodes { .. } => "remove all nodes".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::BatchCommand;
    use crate::payload::{EdgeData, EdgeDataPatch, NodeData, NodeDataPatch};
    use crate::store::UndoRedoStore;
    use proptest::prelude::*;

    type EditorGraph = Graph<NodeData, EdgeData>;
    type EditorCommand = GraphCommand<NodeData, EdgeData>;

    fn editor_graph() -> EditorGraph {
        let mut graph = Graph::new();
        graph.add_node("A", NodeData::at(100.0, 100.0));
        graph.add_node("B", NodeData::at(200.0, 100.0));
        graph.add_node("C", NodeData::at(300.0, 100.0));
        graph.add_edge("A", "B", EdgeData::weighted(4.0));
        graph.add_edge("A", "C", EdgeData::weighted(0.0));
        graph.add_edge("C", "B", EdgeData::weighted(3.0));
        graph.add_edge("B", "ghost", EdgeData::weighted(1.0));
        graph
    }

    /// Executes then undoes `command`, asserting the graph came back exactly,
    /// node and adjacency order included.
    fn assert_round_trip(mut command: EditorCommand, graph: &EditorGraph) -> EditorGraph {
        let mut working = graph.clone();
        command.execute(&mut working);
        let executed = working.clone();
        command.undo(&mut working);
        assert_eq!(working.to_json(), graph.to_json(), "{}", command.describe());
        executed
    }

    #[test]
    fn remove_node_undo_restores_incoming_edges() {
        let graph = editor_graph();
        let executed = assert_round_trip(GraphCommand::remove_node("B"), &graph);
        assert!(!executed.has_node("B"));
        assert!(executed.all_edges_to("B").is_empty());
    }

    #[test]
    fn add_node_on_existing_id_undoes_to_nothing() {
        let graph = editor_graph();
        let executed = assert_round_trip(
            GraphCommand::add_node("A", NodeData::at(0.0, 0.0)),
            &graph,
        );
        assert_eq!(executed.node("A").unwrap().data.point.x, 100.0);
    }

    #[test]
    fn add_node_undo_keeps_prior_dangling_edges() {
        let graph = editor_graph();
        let executed = assert_round_trip(
            GraphCommand::add_node("ghost", NodeData::default()),
            &graph,
        );
        assert!(executed.has_node("ghost"));
    }

    #[test]
    fn add_edge_undo_restores_replaced_payload() {
        let graph = editor_graph();
        let executed = assert_round_trip(
            GraphCommand::add_edge("A", "B", EdgeData::weighted(10.0)),
            &graph,
        );
        assert_eq!(executed.node("A").unwrap().edge_data("B").unwrap().weight, 10.0);

        assert_round_trip(GraphCommand::add_edge("C", "A", EdgeData::weighted(1.0)), &graph);
        assert_round_trip(GraphCommand::add_edge("nope", "A", EdgeData::weighted(1.0)), &graph);
    }

    #[test]
    fn remove_edge_undo_restores_zero_weight_edge() {
        let graph = editor_graph();
        let executed = assert_round_trip(GraphCommand::remove_edge("A", "C"), &graph);
        assert!(!executed.node("A").unwrap().has_successor("C"));

        assert_round_trip(GraphCommand::remove_edge("A", "nope"), &graph);
    }

    #[test]
    fn change_node_data_merges_and_undo_restores() {
        let graph = editor_graph();
        let patch = NodeDataPatch {
            fill: Some("#06b6d4".into()),
            ..NodeDataPatch::default()
        };
        let executed = assert_round_trip(GraphCommand::change_node_data("A", patch), &graph);
        let data = &executed.node("A").unwrap().data;
        assert_eq!(data.fill.as_deref(), Some("#06b6d4"));
        assert_eq!(data.point.x, 100.0);
    }

    #[test]
    fn change_edge_data_merges_and_undo_restores() {
        let graph = editor_graph();
        let patch = EdgeDataPatch {
            stroke: Some("#ea580c".into()),
            ..EdgeDataPatch::default()
        };
        let executed =
            assert_round_trip(GraphCommand::change_edge_data("A", "C", patch.clone()), &graph);
        let edge = executed.node("A").unwrap().edge_data("C").unwrap();
        assert_eq!(edge.stroke.as_deref(), Some("#ea580c"));
        assert_eq!(edge.weight, 0.0);

        // Missing edge: nothing captured, nothing created.
        let executed = assert_round_trip(GraphCommand::change_edge_data("C", "A", patch), &graph);
        assert!(!executed.node("C").unwrap().has_successor("A"));
    }

    #[test]
    fn undo_without_execute_is_noop() {
        let mut graph = editor_graph();
        let before = graph.clone();
        let mut command: EditorCommand = GraphCommand::change_node_data("A", NodeDataPatch::default());
        command.undo(&mut graph);
        assert_eq!(graph, before);
    }

    #[test]
    fn remove_all_nodes_restores_whole_map() {
        let graph = editor_graph();
        let executed = assert_round_trip(GraphCommand::remove_all_nodes(), &graph);
        assert!(executed.is_empty());
    }

    #[test]
    fn store_drives_graph_edits() {
        let mut store: UndoRedoStore<EditorGraph, EditorCommand> =
            UndoRedoStore::new(editor_graph());
        store.execute(GraphCommand::add_node("D", NodeData::at(1.0, 2.0)));
        store.execute(GraphCommand::add_edge("D", "A", EdgeData::weighted(2.0)));
        store.execute(GraphCommand::remove_node("A"));
        assert!(!store.state().has_node("A"));
        assert!(store.state().node("D").unwrap().successors.is_empty());

        store.undo();
        assert_eq!(store.state().node("D").unwrap().edge_data("A").unwrap().weight, 2.0);
        store.undo_all();
        assert_eq!(store.state().to_json(), editor_graph().to_json());
        store.redo_all();
        assert!(!store.state().has_node("A"));
    }

    #[test]
    fn batch_of_graph_edits_unwinds_in_reverse() {
        let graph = editor_graph();
        let mut working = graph.clone();
        let mut batch: BatchCommand<EditorCommand> = BatchCommand::new();
        batch.push(GraphCommand::add_node("D", NodeData::default()));
        batch.push(GraphCommand::add_edge("D", "C", EdgeData::weighted(1.0)));
        batch.push(GraphCommand::remove_node("C"));
        batch.execute(&mut working);
        assert_eq!(working.node("D").map(|n| n.out_degree()), Some(0));

        batch.undo(&mut working);
        assert_eq!(working.to_json(), graph.to_json());
    }

    #[test]
    fn commands_serialize_with_type_tag() {
        let command: EditorCommand = GraphCommand::remove_edge("A", "B");
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "RemoveEdge");
        assert_eq!(json["source"], "A");
        let back: EditorCommand = serde_json::from_value(json).unwrap();
        assert_eq!(back, command);
    }

    // -----------------------------------------------------------------------
    // Round-trip law over random graphs and commands
    // -----------------------------------------------------------------------

    const IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

    fn id() -> impl Strategy<Value = &'static str> {
        prop::sample::select(IDS.to_vec())
    }

    type FloatCommand = GraphCommand<f64, f64>;

    fn random_graph() -> impl Strategy<Value = Graph<f64, f64>> {
        (
            prop::collection::vec((id(), 0.0f64..10.0), 0..5),
            prop::collection::vec((id(), id(), 0u8..5), 0..12),
        )
            .prop_map(|(nodes, edges)| {
                let mut graph: Graph<f64, f64> = Graph::new();
                for (id, data) in nodes {
                    graph.add_node(id, data);
                }
                for (source, target, weight) in edges {
                    graph.add_edge(source, target, f64::from(weight));
                }
                graph
            })
    }

    fn random_command() -> impl Strategy<Value = GraphCommand<f64, f64>> {
        prop_oneof![
            (id(), 0.0f64..10.0).prop_map(|(id, data)| FloatCommand::add_node(id, data)),
            id().prop_map(|id| FloatCommand::remove_node(id)),
            (id(), id(), 0u8..5)
                .prop_map(|(s, t, w)| FloatCommand::add_edge(s, t, f64::from(w))),
            (id(), id()).prop_map(|(s, t)| FloatCommand::remove_edge(s, t)),
            (id(), 0.0f64..10.0).prop_map(|(id, v)| FloatCommand::change_node_data(id, v)),
            (id(), id(), 0u8..5)
                .prop_map(|(s, t, w)| FloatCommand::change_edge_data(s, t, f64::from(w))),
            Just(FloatCommand::remove_all_nodes()),
        ]
    }

    proptest! {
        #[test]
        fn undo_inverts_execute(graph in random_graph(), mut command in random_command()) {
            let mut working = graph.clone();
            command.execute(&mut working);
            command.undo(&mut working);
            prop_assert_eq!(working.to_json(), graph.to_json());
        }

        #[test]
        fn undo_all_returns_to_start(
            graph in random_graph(),
            commands in prop::collection::vec(random_command(), 0..10),
        ) {
            let mut store = UndoRedoStore::new(graph.clone());
            for command in commands {
                store.execute(command);
            }
            let end = store.state().to_json();
            store.undo_all();
            prop_assert_eq!(store.state().to_json(), graph.to_json());
            store.redo_all();
            prop_assert_eq!(store.state().to_json(), end);
        }
    }
}

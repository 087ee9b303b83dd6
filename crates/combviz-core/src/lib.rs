//! Core data model for replayable combinatorial algorithms.
//!
//! - [`graph`] / [`node`]: identifier-indexed directed graph with a JSON
//!   snapshot format
//! - [`command`] / [`store`]: reversible commands and the undo/redo store
//! - [`graph_commands`]: one reversible command per graph edit
//! - [`table`]: the knapsack DP table and its cell/cursor commands
//! - [`payload`]: partial-merge payloads used by the data-change commands

pub mod command;
pub mod error;
pub mod graph;
pub mod graph_commands;
pub mod id;
pub mod node;
pub mod payload;
pub mod store;
pub mod table;

// Re-export commonly used types
pub use command::{BatchCommand, Command};
pub use error::CoreError;
pub use graph::{Graph, GraphJson, NodeJson, SuccessorJson};
pub use graph_commands::GraphCommand;
pub use id::NodeId;
pub use node::Node;
pub use payload::{EdgeData, EdgeDataPatch, Mergeable, NodeData, NodeDataPatch, Point, Weighted};
pub use store::{SubscriptionId, UndoRedoStore};
pub use table::{Cell, CellPatch, CellStatus, KnapsackTable, TableCommand};

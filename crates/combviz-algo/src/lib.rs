//! Combinatorial algorithms that narrate their own execution.
//!
//! - [`dijkstra`]: shortest paths with a totally ordered step-event log
//! - [`knapsack`]: 0/1 knapsack DP whose every cell write is a replayable
//!   [`TableCommand`](combviz_core::TableCommand)
//! - [`binpack`]: next-fit / first-fit packing heuristics (untraced)

pub mod binpack;
pub mod dijkstra;
pub mod error;
pub mod knapsack;

pub use binpack::{pack, Bin, BinElement, BinItem, BinPackStrategy};
pub use dijkstra::{dijkstra, DijkstraResult, DijkstraStep};
pub use error::AlgoError;
pub use knapsack::{knapsack, KnapsackTrace, TableStep};

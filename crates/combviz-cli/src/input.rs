//! Input file formats and loaders.
//!
//! Graphs use the snapshot format `{id, nodes: [{id, data, successors:
//! [{target, data}]}]}`. Edge data may be a bare number or an object with a
//! `weight` field; node data is kept as opaque JSON.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use combviz_algo::BinItem;
use combviz_core::{EdgeData, Graph, Weighted};

use crate::error::CliError;

/// Edge payload accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeWeight {
    Plain(f64),
    Data(EdgeData),
}

impl Weighted for EdgeWeight {
    fn weight(&self) -> f64 {
        match self {
            EdgeWeight::Plain(weight) => *weight,
            EdgeWeight::Data(data) => data.weight(),
        }
    }
}

pub type InputGraph = Graph<serde_json::Value, EdgeWeight>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackInput {
    pub values: Vec<i64>,
    pub weights: Vec<usize>,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinPackInput {
    pub items: Vec<BinItem>,
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses any JSON input file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = read(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_graph(path: &Path) -> Result<InputGraph, CliError> {
    let text = read(path)?;
    let graph = Graph::from_json_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

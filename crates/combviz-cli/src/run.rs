//! Subcommand bodies. Each returns the JSON document printed to stdout.

use serde_json::{json, Map, Value};

use combviz_algo::{dijkstra, knapsack, pack, BinPackStrategy};

use crate::error::CliError;
use crate::input::{BinPackInput, InputGraph, KnapsackInput};

/// Shortest paths from `start`. Unreachable distances print as `null`.
pub fn run_dijkstra(graph: &InputGraph, start: &str, steps: bool) -> Result<Value, CliError> {
    let result = dijkstra(graph, start);

    let mut paths = Map::new();
    for id in result.distances.keys() {
        if let Some(path) = result.path_to(id.as_str()) {
            paths.insert(id.to_string(), serde_json::to_value(path)?);
        }
    }

    let mut out = json!({
        "start": start,
        "distances": result.distances,
        "previous": result.previous,
        "paths": paths,
        "finalized": result.finalized_count(),
        "step_count": result.steps.len(),
    });
    if steps {
        out["steps"] = serde_json::to_value(&result.steps)?;
    }
    Ok(out)
}

/// Knapsack optimum, selection and DP table; `steps` adds the command trace.
pub fn run_knapsack(input: &KnapsackInput, steps: bool) -> Result<Value, CliError> {
    let trace = knapsack(&input.values, &input.weights, input.capacity)?;

    let mut out = json!({
        "best_value": trace.best_value,
        "items": trace.items,
        "table": trace.table,
        "step_count": trace.steps.len(),
    });
    if steps {
        out["steps"] = serde_json::to_value(&trace.steps)?;
    }
    Ok(out)
}

pub fn run_binpack(input: &BinPackInput, strategy: BinPackStrategy) -> Result<Value, CliError> {
    let bins = pack(strategy, &input.items);
    Ok(json!({
        "strategy": strategy,
        "bin_count": bins.len(),
        "total_size": combviz_algo::binpack::total_size(&input.items),
        "bins": serde_json::to_value(&bins)?,
    }))
}

//! 0/1 knapsack DP with a replayable trace.
//!
//! The numeric table is computed directly; alongside it the tracer records
//! every visible change as [`TableCommand`]s grouped into steps
//! ([`BatchCommand`]s). Replaying the steps against
//! [`KnapsackTrace::initial_table`] reproduces the fill and the backtrack.
//!
//! Per cell `(i, j)` with `i, j >= 1` the trace holds four steps:
//! 1. move the cursors to `(i, j)` (both are table coordinates, so the item
//!    cursor names the 1-based item of row `i`);
//! 2. highlight the candidate source cells (`A` = take the item from
//!    `[i-1][j-w]`, `B` = skip it from `[i-1][j]`; only `B` when the item
//!    does not fit);
//! 3. write the winning value and status into `[i][j]`;
//! 4. reset every cell touched in 2 and 3 to `Default`.
//!
//! The reset step means that stepping backwards through a batch always lands
//! on a neutral table, never on stale highlights.

use serde::{Deserialize, Serialize};

use combviz_core::{BatchCommand, CellPatch, CellStatus, KnapsackTable, TableCommand, UndoRedoStore};

use crate::error::AlgoError;

/// One replayable step of the trace.
pub type TableStep = BatchCommand<TableCommand>;

/// Result of a traced knapsack run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackTrace {
    /// The filled `(N+1) x (W+1)` DP table.
    pub table: Vec<Vec<i64>>,
    /// Ordered steps, to be replayed against [`initial_table`](Self::initial_table).
    pub steps: Vec<TableStep>,
    /// 1-based indices of the selected items, ascending.
    pub items: Vec<usize>,
    /// `table[N][W]`.
    pub best_value: i64,
}

impl KnapsackTrace {
    /// The all-zero table the steps start from.
    pub fn initial_table(&self) -> KnapsackTable {
        let cols = self.table.first().map_or(0, Vec::len);
        KnapsackTable::zeroed(self.table.len(), cols)
    }

    /// A store positioned before the first step; `redo` walks forward.
    pub fn replay_store(&self) -> UndoRedoStore<KnapsackTable, TableStep> {
        UndoRedoStore::replay(self.initial_table(), self.steps.clone())
    }
}

/// Solves 0/1 knapsack for parallel `values`/`weights` under `capacity`.
pub fn knapsack(values: &[i64], weights: &[usize], capacity: usize) -> Result<KnapsackTrace, AlgoError> {
    if values.len() != weights.len() {
        return Err(AlgoError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }
    let n = values.len();
    let mut table = vec![vec![0i64; capacity + 1]; n + 1];
    let mut steps: Vec<TableStep> = Vec::new();

    for i in 1..=n {
        let (value, weight) = (values[i - 1], weights[i - 1]);
        for j in 1..=capacity {
            steps.push(BatchCommand::from_commands(vec![
                TableCommand::set_current_item(Some(i)),
                TableCommand::set_current_weight(Some(j)),
            ]));

            if weight > j {
                let carried = table[i - 1][j];
                table[i][j] = carried;
                steps.push(BatchCommand::from_commands(vec![TableCommand::mark(
                    i - 1,
                    j,
                    CellStatus::CandidateB,
                )]));
                steps.push(BatchCommand::from_commands(vec![TableCommand::change_cell(
                    i,
                    j,
                    CellPatch::write(CellStatus::CandidateB, carried),
                )]));
                steps.push(BatchCommand::from_commands(vec![
                    TableCommand::reset(i, j),
                    TableCommand::reset(i - 1, j),
                ]));
                continue;
            }

            let take = value.saturating_add(table[i - 1][j - weight]);
            let skip = table[i - 1][j];
            steps.push(BatchCommand::from_commands(vec![
                TableCommand::mark(i - 1, j - weight, CellStatus::CandidateA),
                TableCommand::mark(i - 1, j, CellStatus::CandidateB),
            ]));

            let (best, status) = if take > skip {
                (take, CellStatus::CandidateA)
            } else {
                (skip, CellStatus::CandidateB)
            };
            table[i][j] = best;
            steps.push(BatchCommand::from_commands(vec![TableCommand::change_cell(
                i,
                j,
                CellPatch::write(status, best),
            )]));
            steps.push(BatchCommand::from_commands(vec![
                TableCommand::reset(i - 1, j),
                TableCommand::reset(i - 1, j - weight),
                TableCommand::reset(i, j),
            ]));
        }
    }

    let items = backtrack(&table, weights, &mut steps);
    let best_value = table[n][capacity];

    tracing::debug!(
        items = n,
        capacity,
        steps = steps.len(),
        best_value,
        "knapsack finished"
    );

    Ok(KnapsackTrace {
        table,
        steps,
        items,
        best_value,
    })
}

/// Walks back from `[N][W]`, appending each decision to the trace.
///
/// Each decision is appended to the previous step (highlight the row above,
/// move the cursors, mark the current cell) and followed by a reset step.
/// Included cells are marked `Selected` and never reset.
fn backtrack(table: &[Vec<i64>], weights: &[usize], steps: &mut Vec<TableStep>) -> Vec<usize> {
    steps.push(clear_cursors());

    let mut items = Vec::new();
    let mut i = table.len() - 1;
    let mut j = table[i].len() - 1;

    while i > 0 {
        let mut reset = BatchCommand::from_commands(vec![TableCommand::reset(i - 1, j)]);
        let mut decision = vec![
            TableCommand::mark(i - 1, j, CellStatus::CandidateB),
            TableCommand::set_current_item(Some(i)),
            TableCommand::set_current_weight(Some(j)),
        ];

        let included = table[i][j] > table[i - 1][j];
        if included {
            decision.push(TableCommand::mark(i, j, CellStatus::Selected));
            items.push(i);
        } else {
            decision.push(TableCommand::mark(i, j, CellStatus::CandidateB));
            reset.push(TableCommand::reset(i, j));
        }

        if let Some(last) = steps.last_mut() {
            last.extend(decision);
        }
        steps.push(reset);

        if included {
            j = j.saturating_sub(weights[i - 1]);
        }
        i -= 1;
    }

    steps.push(clear_cursors());
    items.reverse();
    items
}

fn clear_cursors() -> TableStep {
    BatchCommand::from_commands(vec![
        TableCommand::set_current_weight(None),
        TableCommand::set_current_item(None),
    ])
}

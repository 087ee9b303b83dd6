//! Knapsack DP table state and its reversible edits.
//!
//! The table is a 2-D grid of [`Cell`]s plus two cursors (current item row,
//! current weight column) that a viewer uses for highlighting. A cleared
//! cursor is `None`.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::payload::Mergeable;

/// Highlight state of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Source of the "take the item" candidate.
    CandidateA,
    /// Source of the "skip the item" candidate.
    CandidateB,
    /// Part of the reconstructed optimal selection.
    Selected,
    #[default]
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: i64,
    pub status: CellStatus,
}

/// Partial update for a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CellStatus>,
}

impl CellPatch {
    pub fn status(status: CellStatus) -> Self {
        CellPatch {
            value: None,
            status: Some(status),
        }
    }

    pub fn write(status: CellStatus, value: i64) -> Self {
        CellPatch {
            value: Some(value),
            status: Some(status),
        }
    }
}

impl Mergeable for Cell {
    type Patch = CellPatch;

    fn merge(&mut self, patch: &CellPatch) {
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// The knapsack visualization state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KnapsackTable {
    pub cells: Vec<Vec<Cell>>,
    /// Highlighted row. Row `i` holds item `i` (1-based); row 0 is the
    /// empty-selection base row, so this is never the 0-based item index.
    pub current_item: Option<usize>,
    /// Highlighted column, which is also the capacity being filled.
    pub current_weight: Option<usize>,
}

impl KnapsackTable {
    /// A `rows x cols` table of zero cells with both cursors cleared.
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        KnapsackTable {
            cells: vec![vec![Cell::default(); cols]; rows],
            current_item: None,
            current_weight: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Cell values only, row by row.
    pub fn values(&self) -> Vec<Vec<i64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.value).collect())
            .collect()
    }

    /// Coordinates of every cell whose status is not `Default`.
    pub fn highlighted(&self) -> Vec<(usize, usize, CellStatus)> {
        let mut out = Vec::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if cell.status != CellStatus::Default {
                    out.push((i, j, cell.status));
                }
            }
        }
        out
    }
}

/// A reversible edit of a [`KnapsackTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TableCommand {
    /// Merge a patch into one cell. Out-of-range coordinates are a no-op.
    ChangeCell {
        row: usize,
        col: usize,
        patch: CellPatch,
        #[serde(default)]
        previous: Option<Cell>,
    },
    /// Move the item cursor.
    SetCurrentItem {
        item: Option<usize>,
        /// `Some(prior cursor)` once executed.
        #[serde(default)]
        previous: Option<Option<usize>>,
    },
    /// Move the weight cursor.
    SetCurrentWeight {
        weight: Option<usize>,
        #[serde(default)]
        previous: Option<Option<usize>>,
    },
}

impl TableCommand {
    pub fn change_cell(row: usize, col: usize, patch: CellPatch) -> Self {
        TableCommand::ChangeCell {
            row,
            col,
            patch,
            previous: None,
        }
    }

    /// Sets only the status of a cell.
    pub fn mark(row: usize, col: usize, status: CellStatus) -> Self {
        TableCommand::change_cell(row, col, CellPatch::status(status))
    }

    /// Returns a cell to the neutral `Default` status.
    pub fn reset(row: usize, col: usize) -> Self {
        TableCommand::mark(row, col, CellStatus::Default)
    }

    pub fn set_current_item(item: Option<usize>) -> Self {
        TableCommand::SetCurrentItem {
            item,
            previous: None,
        }
    }

    pub fn set_current_weight(weight: Option<usize>) -> Self {
        TableCommand::SetCurrentWeight {
            weight,
            previous: None,
        }
    }
}

impl Command<KnapsackTable> for TableCommand {
    fn execute(&mut self, table: &mut KnapsackTable) {
        match self {
            TableCommand::ChangeCell {
                row,
                col,
                patch,
                previous,
            } => {
                *previous = table.cell_mut(*row, *col).map(|cell| {
                    let before = *cell;
                    cell.merge(patch);
                    before
                });
            }
            TableCommand::SetCurrentItem { item, previous } => {
                *previous = Some(std::mem::replace(&mut table.current_item, *item));
            }
            TableCommand::SetCurrentWeight { weight, previous } => {
                *previous = Some(std::mem::replace(&mut table.current_weight, *weight));
            }
        }
    }

    fn undo(&mut self, table: &mut KnapsackTable) {
        match self {
            TableCommand::ChangeCell {
                row,
                col,
                previous,
                ..
            } => {
                if let (Some(before), Some(cell)) = (previous.take(), table.cell_mut(*row, *col)) {
                    *cell = before;
                }
            }
            TableCommand::SetCurrentItem { previous, .. } => {
                if let Some(before) = previous.take() {
                    table.current_item = before;
                }
            }
            TableCommand::SetCurrentWeight { previous, .. } => {
                if let Some(before) = previous.take() {
                    table.current_weight = before;
                }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            TableCommand::ChangeCell { row, col, .. } => format!("change cell [{}][{}]", row, col),
            TableCommand::SetCurrentItem { item, .. } => format!("item cursor {:?}", item),
            TableCommand::SetCurrentWeight { weight, .. } => format!("weight cursor {:?}", weight),
        }
    }
}

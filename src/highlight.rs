//! Row / column / cell highlight of the lookup table.

use serde::{Deserialize, Deserializer, Serialize};

/// How a single cell is emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellHighlight {
    None,
    /// The cell shares the highlighted row or column.
    Line,
    /// The cell is the intersection of the highlighted row and column.
    Deep,
}

/// Something in the table a double click or double tap can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridTarget {
    Cell { row: usize, col: usize },
    Row(usize),
    Column(usize),
}

// Missing keys must fail instead of silently becoming `None`
fn nullable_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    Option::<usize>::deserialize(deserializer)
}

/// Independently nullable row and column selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(alias = "r", deserialize_with = "nullable_index")]
    pub row: Option<usize>,
    #[serde(alias = "c", deserialize_with = "nullable_index")]
    pub col: Option<usize>,
}

impl Highlight {
    pub fn new(row: Option<usize>, col: Option<usize>) -> Self {
        Self { row, col }
    }

    pub fn toggle_column(&mut self, col: usize) {
        self.col = if self.col == Some(col) { None } else { Some(col) };
    }

    pub fn toggle_row(&mut self, row: usize) {
        self.row = if self.row == Some(row) { None } else { Some(row) };
    }

    /// Select exactly `(row, col)`, or clear both when that is already the selection.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        if self.row == Some(row) && self.col == Some(col) {
            self.clear();
        } else {
            self.row = Some(row);
            self.col = Some(col);
        }
    }

    pub fn clear(&mut self) {
        self.row = None;
        self.col = None;
    }

    pub fn apply(&mut self, target: GridTarget) {
        match target {
            GridTarget::Cell { row, col } => self.toggle_cell(row, col),
            GridTarget::Row(row) => self.toggle_row(row),
            GridTarget::Column(col) => self.toggle_column(col),
        }
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.row == Some(row)
    }

    pub fn is_column_selected(&self, col: usize) -> bool {
        self.col == Some(col)
    }

    /// Emphasis for cell `(row, col)`. The intersection wins over the lines.
    pub fn cell_level(&self, row: usize, col: usize) -> CellHighlight {
        let on_row = self.is_row_selected(row);
        let on_col = self.is_column_selected(col);
        if on_row && on_col {
            CellHighlight::Deep
        } else if on_row || on_col {
            CellHighlight::Line
        } else {
            CellHighlight::None
        }
    }

    /// Clear any index that no longer fits axes of `rows` x `cols`.
    /// Returns true when something was cleared.
    pub fn retain_within(&mut self, rows: usize, cols: usize) -> bool {
        let mut changed = false;
        if self.row.is_some_and(|r| r >= rows) {
            self.row = None;
            changed = true;
        }
        if self.col.is_some_and(|c| c >= cols) {
            self.col = None;
            changed = true;
        }
        changed
    }
}

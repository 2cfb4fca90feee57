//! Table types.

use serde::{Deserialize, Serialize};

/// Raw cell rectangle as reported by the backend (not normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// A table assembled from one tabular item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Index of the item this table was built from
    pub index: usize,

    /// Row-wise cell text from a structured export
    pub rows: Vec<TableRow>,

    /// Number of rows
    pub num_rows: usize,

    /// Number of columns
    pub num_cols: usize,

    /// Positioned cells
    pub cells: Vec<TableCell>,

    /// Column headers from a structured export
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub headers: Option<Vec<String>>,
}

impl TableRecord {
    /// Create an empty table record.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Check if the table has no rows and no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cells.is_empty() && self.num_rows == 0
    }

    /// Check if any cell spans more than one row or column.
    pub fn has_merged_cells(&self) -> bool {
        self.cells.iter().any(|c| c.is_merged())
    }

    /// Cell at the given origin position.
    pub fn cell(&self, row: u32, column: u32) -> Option<&TableCell> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
    }
}

/// A row of a structured table export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row position (0-indexed)
    pub index: usize,

    /// Cell text, left to right
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(index: usize, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            index,
            cells: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Row of the cell's origin (0-indexed)
    pub row: u32,

    /// Column of the cell's origin (0-indexed)
    #[serde(rename = "col")]
    pub column: u32,

    /// Cell text
    pub content: String,

    /// Number of rows this cell spans
    pub rowspan: u32,

    /// Number of columns this cell spans
    pub colspan: u32,

    /// Cell rectangle
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox: Option<CellRect>,
}

impl TableCell {
    /// Create a single-span cell.
    pub fn new(row: u32, column: u32, content: impl Into<String>) -> Self {
        Self {
            row,
            column,
            content: content.into(),
            rowspan: 1,
            colspan: 1,
            bbox: None,
        }
    }

    /// Set spans and return self.
    pub fn spans(mut self, rowspan: u32, colspan: u32) -> Self {
        self.rowspan = rowspan;
        self.colspan = colspan;
        self
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.rowspan > 1 || self.colspan > 1
    }
}

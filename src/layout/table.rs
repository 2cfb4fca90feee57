//! Table assembly from backend table data.

use crate::backend::TableSource;
use crate::model::{TableCell, TableRecord, TableRow};

/// Column delimiter of the text rendering.
const DELIMITER: char = '|';

/// Marker of a header separator line in the text rendering.
const SEPARATOR: &str = "---";

/// Build a table record for the item at `index`.
///
/// Per-cell data is copied verbatim and determines the row/column counts.
/// Without cells, counts are estimated from the text rendering. A structured
/// export contributes its rows and header list either way.
pub fn assemble_table(index: usize, source: Option<&TableSource>) -> TableRecord {
    let mut table = TableRecord::new(index);
    let Some(source) = source else {
        return table;
    };

    if !source.cells.is_empty() {
        table.cells = source
            .cells
            .iter()
            .map(|c| TableCell {
                row: c.row,
                column: c.column,
                content: c.content.clone(),
                rowspan: c.rowspan.unwrap_or(1).max(1),
                colspan: c.colspan.unwrap_or(1).max(1),
                bbox: c.bbox,
            })
            .collect();
        table.num_rows = table
            .cells
            .iter()
            .map(|c| (c.row as usize).saturating_add(c.rowspan as usize))
            .max()
            .unwrap_or(0);
        table.num_cols = table
            .cells
            .iter()
            .map(|c| (c.column as usize).saturating_add(c.colspan as usize))
            .max()
            .unwrap_or(0);
    } else if let Some(markdown) = source.markdown.as_deref() {
        let (rows, cols) = markdown_dimensions(markdown);
        table.num_rows = rows;
        table.num_cols = cols;
    }

    if let Some(grid) = &source.grid {
        table.rows = grid
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| TableRow::from_strings(i, row.iter().cloned()))
            .collect();
        if !grid.headers.is_empty() {
            table.headers = Some(grid.headers.clone());
        }
        if table.num_rows == 0 && table.num_cols == 0 {
            table.num_rows = grid.rows.len();
            table.num_cols = grid
                .rows
                .iter()
                .map(Vec::len)
                .chain(std::iter::once(grid.headers.len()))
                .max()
                .unwrap_or(0);
        }
    }

    log::debug!(
        "Table {}: {} x {} ({} cells)",
        index,
        table.num_rows,
        table.num_cols,
        table.cells.len()
    );

    table
}

/// Row and column counts of a pipe-delimited rendering.
///
/// Rows are delimited lines that are not separators; columns are the
/// non-empty tokens of the first such line.
pub fn markdown_dimensions(markdown: &str) -> (usize, usize) {
    let mut rows = markdown
        .lines()
        .filter(|line| line.contains(DELIMITER) && !line.contains(SEPARATOR));

    let Some(first) = rows.next() else {
        return (0, 0);
    };
    let cols = first
        .split(DELIMITER)
        .filter(|token| !token.trim().is_empty())
        .count();

    (1 + rows.count(), cols)
}

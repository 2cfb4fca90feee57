//! Reading-order assignment for multi-column pages.

use crate::model::Item;

/// Quantize a top edge into a row band of `row_height` units.
pub fn row_band(top: f64, row_height: f64) -> i64 {
    (top / row_height).floor() as i64
}

/// Rank column-tagged items by `(row_band, column)`.
///
/// Only items carrying both a bbox and a column take part; they receive
/// `row_band` and a 0-based `reading_order`. Ties keep their input order.
/// Returns the number of ranked items.
pub fn assign_reading_order(items: &mut [Item], row_height: f64) -> usize {
    let row_height = if row_height > 0.0 { row_height } else { 1.0 };

    let mut keyed: Vec<(i64, usize, usize)> = Vec::new();
    for (pos, item) in items.iter_mut().enumerate() {
        let (Some(bbox), Some(column)) = (&item.bbox, item.attributes.column) else {
            continue;
        };
        let band = row_band(bbox.top, row_height);
        item.attributes.row_band = Some(band);
        keyed.push((band, column, pos));
    }

    keyed.sort_by_key(|&(band, column, _)| (band, column));

    for (rank, &(_, _, pos)) in keyed.iter().enumerate() {
        items[pos].attributes.reading_order = Some(rank);
    }

    keyed.len()
}

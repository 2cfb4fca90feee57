//! Column detection by gap analysis of left edges.

use crate::model::Item;

use super::LayoutOptions;

/// Detected column structure of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Left boundary of each column; the first is always 0
    pub boundaries: Vec<f64>,
}

impl ColumnLayout {
    /// Number of columns.
    pub fn count(&self) -> usize {
        self.boundaries.len()
    }

    /// Column whose interval `[boundary_i, boundary_i+1)` contains `x`.
    ///
    /// Positions left of the first boundary belong to column 0.
    pub fn column_of(&self, x: f64) -> usize {
        self.boundaries
            .iter()
            .rposition(|b| *b <= x)
            .unwrap_or(0)
    }

    /// Tag every positioned item with its column.
    pub fn assign(&self, items: &mut [Item]) {
        for item in items.iter_mut() {
            if let Some(bbox) = &item.bbox {
                item.attributes.column = Some(self.column_of(bbox.left));
            }
        }
    }
}

/// Find column boundaries from the left edges of positioned items.
///
/// Returns `None` when there are too few positioned items or when no gap
/// between consecutive left edges exceeds the threshold.
pub fn detect_columns(items: &[Item], options: &LayoutOptions) -> Option<ColumnLayout> {
    let lefts: Vec<f64> = items
        .iter()
        .filter_map(|item| item.bbox.as_ref().map(|b| b.left))
        .collect();

    if lefts.len() < options.min_items_for_columns {
        return None;
    }

    detect_from_lefts(lefts, options.column_gap_threshold)
}

/// Gap analysis over raw left-edge positions.
pub fn detect_from_lefts(mut lefts: Vec<f64>, gap_threshold: f64) -> Option<ColumnLayout> {
    lefts.sort_by(f64::total_cmp);

    let mids: Vec<f64> = lefts
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1] - pair[0];
            (gap > gap_threshold).then(|| pair[0] + gap / 2.0)
        })
        .collect();

    if mids.is_empty() {
        return None;
    }

    let mut boundaries = Vec::with_capacity(mids.len() + 1);
    boundaries.push(0.0);
    boundaries.extend(mids);

    log::debug!(
        "Column gaps over {} items: boundaries = {:?}",
        lefts.len(),
        boundaries
    );

    Some(ColumnLayout { boundaries })
}

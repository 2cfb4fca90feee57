//! Layout reconstruction passes.
//!
//! Per item: [`normalize`] maps raw boxes into the canonical top-left frame and
//! [`classify`] assigns semantic types. Per page: [`columns`] finds column
//! boundaries, [`reading_order`] ranks items within them and [`merge`]
//! coalesces fragmented runs. [`table`] builds table records.
//!
//! Page passes are pure: [`process_page`] takes a page and its items and
//! returns new data, so pages can run on any thread.

pub mod classify;
pub mod columns;
pub mod merge;
pub mod normalize;
mod options;
pub mod reading_order;
pub mod table;

pub use columns::{detect_columns, ColumnLayout};
pub use merge::{merge_fragments, MergedItem};
pub use normalize::{normalize_box, BoxRejection, PageFrame};
pub use options::LayoutOptions;
pub use reading_order::assign_reading_order;
pub use table::assemble_table;

use crate::model::{Item, PageInfo};

/// Result of running the page passes over one page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page with column metadata filled in
    pub page: PageInfo,

    /// Items in page order, each with the input positions it came from
    pub items: Vec<MergedItem>,
}

/// Run column detection, reading order and merging over one page.
///
/// `items` are the page's items in backend order; `size_known` tells whether
/// the page dimensions came from the backend, which gates relative ratios on
/// merged boxes.
pub fn process_page(
    mut page: PageInfo,
    mut items: Vec<Item>,
    size_known: bool,
    options: &LayoutOptions,
) -> PageLayout {
    if let Some(layout) = detect_columns(&items, options) {
        layout.assign(&mut items);
        let ranked = assign_reading_order(&mut items, options.row_height);

        log::debug!(
            "Page {}: {} columns, {} items ranked",
            page.page_number,
            layout.count(),
            ranked
        );

        page.columns = Some(layout.count());
        page.column_boundaries = Some(layout.boundaries);
    }

    let items = if options.merge_fragments {
        let page_size = size_known.then(|| page.size());
        merge_fragments(items, options, page_size)
    } else {
        items
            .into_iter()
            .enumerate()
            .map(|(pos, item)| MergedItem {
                item,
                members: vec![pos],
            })
            .collect()
    };

    PageLayout { page, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn item(content: &str, left: f64, top: f64, right: f64) -> Item {
        Item::new(content, 1).with_bbox(BoundingBox::from_edges(left, top, right, top + 10.0).unwrap())
    }

    fn two_column_page() -> Vec<Item> {
        vec![
            item("L1", 20.0, 100.0, 120.0),
            item("R1", 320.0, 100.0, 420.0),
            item("L2", 20.0, 140.0, 120.0),
            item("R2", 320.0, 140.0, 420.0),
            item("L3", 25.0, 180.0, 120.0),
            item("R3", 325.0, 180.0, 420.0),
        ]
    }

    #[test]
    fn test_process_page_two_columns() {
        let layout = process_page(
            PageInfo::letter(1),
            two_column_page(),
            true,
            &LayoutOptions::default(),
        );

        assert_eq!(layout.page.columns, Some(2));
        assert_eq!(layout.page.column_boundaries.as_ref().unwrap()[0], 0.0);
        assert_eq!(layout.items.len(), 6);

        let r1 = &layout.items[1].item;
        assert_eq!(r1.attributes.column, Some(1));
        assert_eq!(r1.attributes.row_band, Some(5));
        assert_eq!(r1.reading_order(), Some(1));

        let l2 = &layout.items[2].item;
        assert_eq!(l2.reading_order(), Some(2));
    }

    #[test]
    fn test_process_page_without_columns() {
        let items = vec![item("a", 10.0, 10.0, 50.0), item("b", 10.0, 40.0, 50.0)];
        let layout = process_page(PageInfo::letter(1), items, true, &LayoutOptions::default());

        assert!(layout.page.columns.is_none());
        assert!(layout.items.iter().all(|m| m.item.reading_order().is_none()));
    }

    #[test]
    fn test_merge_can_be_disabled() {
        let items = vec![item("Invoice", 0.0, 100.0, 50.0), item("Number", 55.0, 100.0, 90.0)];

        let merged = process_page(PageInfo::letter(1), items.clone(), true, &LayoutOptions::default());
        assert_eq!(merged.items.len(), 1);

        let kept = process_page(
            PageInfo::letter(1),
            items,
            true,
            &LayoutOptions::default().without_merge(),
        );
        assert_eq!(kept.items.len(), 2);
        assert_eq!(kept.items[1].members, vec![1]);
    }
}

//! Merging of fragmented text runs.
//!
//! Backends often split one line into several items at token or glyph-run
//! boundaries. Fragments on the same line whose horizontal gap is small are
//! coalesced into one item.

use std::cmp::Ordering;

use crate::model::{BoundingBox, Item, PageSize};

use super::LayoutOptions;

/// One output item together with the input positions it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedItem {
    pub item: Item,

    /// Input positions of the members, ascending
    pub members: Vec<usize>,
}

impl MergedItem {
    /// Position of the earliest member.
    pub fn first_position(&self) -> usize {
        self.members[0]
    }

    /// Whether this item replaced more than one input item.
    pub fn is_merged(&self) -> bool {
        self.members.len() > 1
    }
}

/// Merge same-line fragments.
///
/// Items are visited in `(page, -top, left)` order; an item joins the current
/// group when it is on the same page as the group's last member, both carry
/// a bbox, their tops differ by less than the vertical tolerance and the gap
/// from the previous right edge to this left edge lies in `[0, threshold)`.
///
/// The result is ordered by each group's earliest input position. `page_size`
/// is used to recompute relative ratios for merged boxes.
pub fn merge_fragments(
    items: Vec<Item>,
    options: &LayoutOptions,
    page_size: Option<PageSize>,
) -> Vec<MergedItem> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| visit_order(&items[a], &items[b]));

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for pos in order {
        let joins = groups
            .last()
            .and_then(|g| g.last())
            .map_or(false, |&last| continues_line(&items[last], &items[pos], options));

        match groups.last_mut() {
            Some(group) if joins => group.push(pos),
            _ => groups.push(vec![pos]),
        }
    }

    let mut slots: Vec<Option<Item>> = items.into_iter().map(Some).collect();
    let mut merged: Vec<MergedItem> = groups
        .into_iter()
        .filter_map(|group| {
            let members: Vec<Item> = group.iter().filter_map(|&p| slots[p].take()).collect();
            let item = combine(members, page_size)?;
            let mut positions = group;
            positions.sort_unstable();
            Some(MergedItem {
                item,
                members: positions,
            })
        })
        .collect();

    merged.sort_by_key(MergedItem::first_position);

    let collapsed = merged.iter().filter(|m| m.is_merged()).count();
    if collapsed > 0 {
        log::debug!("Merged {} fragment groups", collapsed);
    }

    merged
}

fn visit_order(a: &Item, b: &Item) -> Ordering {
    a.page.cmp(&b.page).then_with(|| match (&a.bbox, &b.bbox) {
        (Some(x), Some(y)) => y.top.total_cmp(&x.top).then(x.left.total_cmp(&y.left)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

fn continues_line(prev: &Item, next: &Item, options: &LayoutOptions) -> bool {
    if prev.page != next.page {
        return false;
    }
    let (Some(a), Some(b)) = (&prev.bbox, &next.bbox) else {
        return false;
    };

    let vertical = (b.top - a.top).abs();
    let horizontal = a.horizontal_gap_to(b);

    vertical < options.merge_vertical_tolerance
        && horizontal >= 0.0
        && horizontal < options.merge_horizontal_threshold
}

/// Fold a group into one item: joined content, union bbox, first member's fields.
fn combine(members: Vec<Item>, page_size: Option<PageSize>) -> Option<Item> {
    if members.len() <= 1 {
        return members.into_iter().next();
    }

    let content = members
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let bbox = BoundingBox::union(members.iter().filter_map(|m| m.bbox.as_ref()))
        .map(|b| match page_size {
            Some(size) => b.with_page(size),
            None => b,
        });
    let fragments = members
        .iter()
        .map(|m| m.attributes.merged_from.unwrap_or(1))
        .sum();

    let mut iter = members.into_iter();
    let mut merged = iter.next()?;
    merged.content = content;
    merged.bbox = bbox;
    merged.attributes.merged_from = Some(fragments);
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(content: &str, left: f64, top: f64, right: f64) -> Item {
        Item::new(content, 1).with_bbox(BoundingBox::from_edges(left, top, right, top + 12.0).unwrap())
    }

    #[test]
    fn test_merge_invoice_number() {
        let items = vec![frag("Invoice", 0.0, 100.0, 50.0), frag("Number", 55.0, 100.0, 90.0)];
        let merged = merge_fragments(items, &LayoutOptions::default(), None);

        assert_eq!(merged.len(), 1);
        let item = &merged[0].item;
        assert_eq!(item.content, "Invoice Number");
        let bbox = item.bbox.as_ref().unwrap();
        assert_eq!(bbox.left, 0.0);
        assert_eq!(bbox.right, 90.0);
        assert_eq!(bbox.top, 100.0);
        assert_eq!(bbox.width, 90.0);
        assert_eq!(item.attributes.merged_from, Some(2));
        assert_eq!(merged[0].members, vec![0, 1]);
    }

    #[test]
    fn test_source_order_does_not_matter() {
        let items = vec![frag("Number", 55.0, 100.0, 90.0), frag("Invoice", 0.0, 100.0, 50.0)];
        let merged = merge_fragments(items, &LayoutOptions::default(), None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].item.content, "Invoice Number");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let items = vec![
            frag("Total", 10.0, 200.0, 40.0),
            frag("due", 45.0, 200.0, 65.0),
            frag("Far away", 300.0, 200.0, 360.0),
            frag("Next line", 10.0, 230.0, 80.0),
        ];
        let once = merge_fragments(items, &LayoutOptions::default(), None);
        assert_eq!(once.len(), 3);

        let again = merge_fragments(
            once.into_iter().map(|m| m.item).collect(),
            &LayoutOptions::default(),
            None,
        );
        assert_eq!(again.len(), 3);
        assert!(again.iter().all(|m| !m.is_merged()));
    }

    #[test]
    fn test_gap_limits() {
        let options = LayoutOptions::default();

        let overlapping = vec![frag("a", 0.0, 10.0, 50.0), frag("b", 45.0, 10.0, 60.0)];
        assert_eq!(merge_fragments(overlapping, &options, None).len(), 2);

        let touching = vec![frag("a", 0.0, 10.0, 50.0), frag("b", 50.0, 10.0, 60.0)];
        assert_eq!(merge_fragments(touching, &options, None).len(), 1);

        let at_threshold = vec![frag("a", 0.0, 10.0, 50.0), frag("b", 70.0, 10.0, 90.0)];
        assert_eq!(merge_fragments(at_threshold, &options, None).len(), 2);

        let off_line = vec![frag("a", 0.0, 10.0, 50.0), frag("b", 55.0, 15.0, 90.0)];
        assert_eq!(merge_fragments(off_line, &options, None).len(), 2);
    }

    #[test]
    fn test_items_without_bbox_pass_through() {
        let items = vec![
            frag("Invoice", 0.0, 100.0, 50.0),
            Item::new("floating", 1),
            frag("Number", 55.0, 100.0, 90.0),
        ];
        let merged = merge_fragments(items, &LayoutOptions::default(), None);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].item.content, "Invoice Number");
        assert_eq!(merged[0].members, vec![0, 2]);
        assert_eq!(merged[1].item.content, "floating");
        assert_eq!(merged[1].members, vec![1]);
    }

    #[test]
    fn test_different_pages_never_merge() {
        let mut second = frag("Number", 55.0, 100.0, 90.0);
        second.page = 2;
        let items = vec![frag("Invoice", 0.0, 100.0, 50.0), second];
        assert_eq!(merge_fragments(items, &LayoutOptions::default(), None).len(), 2);
    }

    #[test]
    fn test_merged_box_gets_ratios_on_known_page() {
        let items = vec![frag("Invoice", 0.0, 100.0, 50.0), frag("Number", 55.0, 100.0, 90.0)];
        let merged = merge_fragments(items, &LayoutOptions::default(), Some(PageSize::LETTER));
        let rel = merged[0].item.bbox.as_ref().unwrap().relative.unwrap();
        assert!((rel.width_ratio - 90.0 / 612.0).abs() < 1e-9);
    }
}

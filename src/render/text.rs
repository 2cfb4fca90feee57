//! Plain text rendering in reading order.

use crate::error::Result;
use crate::model::{DocumentRecord, Item};

/// Render item content page by page.
///
/// Within a page, ranked items come first by `reading_order`, then the rest
/// in sequence order. Pages are separated by a blank line and empty items
/// are skipped.
pub fn to_text(doc: &DocumentRecord) -> Result<String> {
    let mut page_numbers: Vec<u32> = doc.items.iter().map(|i| i.page).collect();
    page_numbers.dedup();

    let mut blocks = Vec::new();
    for page in page_numbers {
        let lines: Vec<&str> = page_reading_order(doc, page)
            .into_iter()
            .map(|item| item.content.as_str())
            .filter(|content| !content.is_empty())
            .collect();
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    let mut text = blocks.join("\n\n");
    if !text.is_empty() {
        text.push('\n');
    }
    Ok(text)
}

/// Items of one page in reading order.
pub fn page_reading_order(doc: &DocumentRecord, page: u32) -> Vec<&Item> {
    let (mut ranked, rest): (Vec<&Item>, Vec<&Item>) = doc
        .items_on_page(page)
        .partition(|item| item.reading_order().is_some());
    ranked.sort_by_key(|item| item.reading_order());
    ranked.extend(rest);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, PageInfo};

    fn ranked(content: &str, page: u32, rank: Option<usize>) -> Item {
        let mut item = Item::new(content, page);
        item.attributes.reading_order = rank;
        item
    }

    fn doc(items: Vec<Item>) -> DocumentRecord {
        DocumentRecord {
            metadata: Metadata::for_source("doc.json"),
            pages: vec![PageInfo::letter(1), PageInfo::letter(2)],
            items,
            tables: Vec::new(),
        }
    }

    #[test]
    fn test_reading_order_wins_within_page() {
        let record = doc(vec![
            ranked("right column", 1, Some(1)),
            ranked("left column", 1, Some(0)),
            ranked("caption", 1, None),
            ranked("next page", 2, None),
        ]);

        let text = to_text(&record).unwrap();
        assert_eq!(text, "left column\nright column\ncaption\n\nnext page\n");
    }

    #[test]
    fn test_empty_items_skipped() {
        let record = doc(vec![ranked("", 1, None), ranked("only", 1, None)]);
        assert_eq!(to_text(&record).unwrap(), "only\n");
        assert_eq!(to_text(&doc(Vec::new())).unwrap(), "");
    }
}

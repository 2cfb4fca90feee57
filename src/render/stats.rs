//! Summary statistics for a reconstructed document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{DocumentRecord, ItemType};

/// Counts collected from a [`DocumentRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of pages
    pub page_count: usize,

    /// Number of items
    pub item_count: usize,

    /// Number of tables
    pub table_count: usize,

    /// Item count per type, keyed by type name
    pub by_type: BTreeMap<String, usize>,

    /// Pages with more than one detected column
    pub multi_column_pages: usize,

    /// Items produced by merging fragments
    pub merged_items: usize,

    /// Items that carry no bounding box
    pub items_without_bbox: usize,

    /// Recoverable issues reported during assembly
    pub warnings: usize,
}

impl DocumentStats {
    /// Collect statistics from a document record.
    pub fn from_document(doc: &DocumentRecord) -> Self {
        let mut by_type = BTreeMap::new();
        for item in &doc.items {
            *by_type.entry(format!("{:?}", item.item_type)).or_insert(0) += 1;
        }

        Self {
            page_count: doc.pages.len(),
            item_count: doc.items.len(),
            table_count: doc.tables.len(),
            by_type,
            multi_column_pages: doc.pages.iter().filter(|p| p.is_multi_column()).count(),
            merged_items: doc
                .items
                .iter()
                .filter(|i| i.attributes.merged_from.is_some())
                .count(),
            items_without_bbox: doc.items.iter().filter(|i| !i.has_bbox()).count(),
            warnings: doc.metadata.warnings,
        }
    }

    /// Count of items of one type.
    pub fn count_of(&self, item_type: ItemType) -> usize {
        self.by_type
            .get(&format!("{:?}", item_type))
            .copied()
            .unwrap_or(0)
    }

    /// Number of form-related items (labels, fields, checkboxes).
    pub fn form_items(&self) -> usize {
        self.count_of(ItemType::FormLabel)
            + self.count_of(ItemType::FormField)
            + self.count_of(ItemType::Checkbox)
    }
}

//! Document-level types.

use super::{Item, ItemType, PageInfo, TableRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reconstructed document, ready for a downstream renderer.
///
/// Built once by the assembler and not modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Source and processing metadata
    pub metadata: Metadata,

    /// Pages in ascending page order
    pub pages: Vec<PageInfo>,

    /// Items in output order; `items[i].index == i`
    pub items: Vec<Item>,

    /// Tables built from tabular items
    pub tables: Vec<TableRecord>,
}

impl DocumentRecord {
    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_number: u32) -> Option<&PageInfo> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Items on one page, in output order.
    pub fn items_on_page(&self, page_number: u32) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.page == page_number)
    }

    /// Items of one type, in output order.
    pub fn items_of_type(&self, item_type: ItemType) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.item_type == item_type)
    }

    /// Check if the document has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Source identifier (usually the input path)
    pub source_file: String,

    /// Final path component of the source
    pub file_name: String,

    /// Short id unique per extraction run
    pub document_id: String,

    /// When extraction finished
    pub extraction_timestamp: DateTime<Utc>,

    /// Wall-clock processing duration in seconds
    pub processing_time: f64,

    /// Number of items in the record
    pub item_count: usize,

    /// Number of tables in the record
    pub table_count: usize,

    /// Name of the backend that produced the input
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub backend: Option<String>,

    /// Number of recoverable issues encountered
    pub warnings: usize,
}

impl Metadata {
    /// Create metadata for a source, stamped now.
    pub fn for_source(source_file: impl Into<String>) -> Self {
        let source_file = source_file.into();
        let file_name = std::path::Path::new(&source_file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source_file.clone());
        let extraction_timestamp = Utc::now();
        let document_id = document_id(&source_file, &extraction_timestamp);

        Self {
            source_file,
            file_name,
            document_id,
            extraction_timestamp,
            processing_time: 0.0,
            item_count: 0,
            table_count: 0,
            backend: None,
            warnings: 0,
        }
    }
}

/// First 16 hex characters of an MD5 over source and timestamp.
fn document_id(source: &str, timestamp: &DateTime<Utc>) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(source.as_bytes());
    hasher.update(b"_");
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_for_source() {
        let metadata = Metadata::for_source("/tmp/exports/invoice.json");
        assert_eq!(metadata.file_name, "invoice.json");
        assert_eq!(metadata.document_id.len(), 16);
        assert!(metadata
            .document_id
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_document_id_depends_on_source() {
        let now = Utc::now();
        assert_ne!(document_id("a.json", &now), document_id("b.json", &now));
        assert_eq!(document_id("a.json", &now), document_id("a.json", &now));
    }

    #[test]
    fn test_document_lookup() {
        let doc = DocumentRecord {
            metadata: Metadata::for_source("doc"),
            pages: vec![PageInfo::letter(1), PageInfo::letter(2)],
            items: vec![Item::new("a", 1), Item::new("b", 2)],
            tables: Vec::new(),
        };

        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(2).is_some());
        assert!(doc.get_page(3).is_none());
        assert_eq!(doc.items_on_page(2).count(), 1);
        assert_eq!(doc.items_of_type(ItemType::Text).count(), 2);
    }
}

//! JSON rendering for document records.

use crate::error::{Error, Result};
use crate::model::DocumentRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document record to JSON.
pub fn to_json(doc: &DocumentRecord, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Metadata, PageInfo};

    fn record() -> DocumentRecord {
        DocumentRecord {
            metadata: Metadata::for_source("/tmp/form.pdf"),
            pages: vec![PageInfo::letter(1)],
            items: vec![Item::new("Date:", 1)],
            tables: Vec::new(),
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"file_name\": \"form.pdf\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&record(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_output_shape() {
        let json = to_json(&record(), JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in ["metadata", "pages", "items", "tables"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        for key in [
            "source_file",
            "file_name",
            "document_id",
            "extraction_timestamp",
            "processing_time",
        ] {
            assert!(value["metadata"].get(key).is_some(), "missing {}", key);
        }
        let item = &value["items"][0];
        assert_eq!(item["type"], "Text");
        assert_eq!(item["index"], 0);
        assert!(item.get("bbox").is_none());
        assert!(value["pages"][0].get("columns").is_none());
    }
}

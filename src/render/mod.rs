//! Rendering of document records.

mod json;
mod stats;
mod text;

pub use json::{to_json, JsonFormat};
pub use stats::DocumentStats;
pub use text::{page_reading_order, to_text};

use crate::error::Result;
use crate::model::DocumentRecord;

/// Output format for rendered documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The document record as JSON
    Json(JsonFormat),
    /// Item content in reading order
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json(_) => "json",
            OutputFormat::Text => "txt",
        }
    }

    /// Render a document in this format.
    pub fn render(&self, doc: &DocumentRecord) -> Result<String> {
        match self {
            OutputFormat::Json(format) => to_json(doc, *format),
            OutputFormat::Text => to_text(doc),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json(JsonFormat::Pretty)
    }
}

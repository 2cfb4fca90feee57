//! Normalized intake types.
//!
//! Every backend adapter produces these. They carry only what the layout
//! passes need, with each capability explicitly optional, so the core never
//! inspects backend-specific shapes.

use crate::model::{CellRect, CoordOrigin, PageSize};

/// A document as delivered by a conversion backend.
#[derive(Debug, Clone, Default)]
pub struct IntakeDocument {
    /// Source identifier reported by the backend, if any
    pub source: Option<String>,

    /// Backend name/version
    pub backend: Option<String>,

    /// Page descriptions (may be empty)
    pub pages: Vec<IntakePage>,

    /// Items in backend order
    pub items: Vec<ItemOutcome>,
}

impl IntakeDocument {
    /// Create an empty intake document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully decoded item.
    pub fn push_item(&mut self, item: IntakeItem) {
        self.items.push(ItemOutcome::Complete(item));
    }

    /// Append a page description.
    pub fn push_page(&mut self, page: IntakePage) {
        self.pages.push(page);
    }
}

/// A page description from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakePage {
    /// Page number (1-indexed)
    pub page_number: u32,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl IntakePage {
    /// Create a page with known dimensions.
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width: Some(width),
            height: Some(height),
        }
    }

    /// The page size, if both dimensions are present and usable.
    pub fn known_size(&self) -> Option<PageSize> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(PageSize::new(w, h)).filter(PageSize::is_usable),
            _ => None,
        }
    }
}

/// Raw bounding box, any field possibly missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawBox {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub origin: CoordOrigin,
}

impl RawBox {
    /// Create a complete raw box.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64, origin: CoordOrigin) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            origin,
        }
    }
}

/// Location metadata for an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    /// Page number (1-indexed)
    pub page: Option<u32>,

    /// Raw bounding box
    pub bbox: Option<RawBox>,

    /// Page size attached to the provenance entry
    pub page_size: Option<PageSize>,
}

/// One candidate source of font information.
///
/// Backends expose style in several places; the classifier takes, per field,
/// the first hint that has a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleHint {
    pub font: Option<String>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

/// A positioned cell from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSource {
    pub row: u32,
    pub column: u32,
    pub content: String,
    pub rowspan: Option<u32>,
    pub colspan: Option<u32>,
    pub bbox: Option<CellRect>,
}

/// A structured row/column export of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything a backend can tell about a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSource {
    /// Per-cell data
    pub cells: Vec<CellSource>,

    /// Pipe-delimited text rendering
    pub markdown: Option<String>,

    /// Structured export with headers
    pub grid: Option<TableGrid>,
}

/// One item with explicitly optional capabilities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeItem {
    /// Backend kind label, e.g. `"TextItem"`
    pub kind: Option<String>,

    /// Text content
    pub text: Option<String>,

    /// Caption (figures, tables)
    pub caption: Option<String>,

    /// Structural nesting level
    pub level: u32,

    /// First provenance entry
    pub provenance: Option<Provenance>,

    /// Backend confidence
    pub confidence: Option<f32>,

    /// Style sources in priority order
    pub style_hints: Vec<StyleHint>,

    /// List marker reported by the backend
    pub marker: Option<String>,

    /// List nesting level reported by the backend
    pub list_level: Option<u32>,

    /// Table data for tabular items
    pub table: Option<TableSource>,
}

impl IntakeItem {
    /// Create an item with a kind label and text.
    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Place the item on a page with a raw box and return self.
    pub fn at(mut self, page: u32, bbox: RawBox) -> Self {
        self.provenance = Some(Provenance {
            page: Some(page),
            bbox: Some(bbox),
            page_size: None,
        });
        self
    }

    /// Text if present, otherwise caption, otherwise empty.
    pub fn content(&self) -> &str {
        self.text
            .as_deref()
            .or(self.caption.as_deref())
            .unwrap_or("")
    }

    /// Page number from provenance.
    pub fn page(&self) -> Option<u32> {
        self.provenance.as_ref().and_then(|p| p.page)
    }
}

/// Outcome of decoding one backend record.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// Every field decoded.
    Complete(IntakeItem),
    /// Some fields were salvaged; enrichment of the rest was skipped.
    Partial { item: IntakeItem, warning: String },
    /// Nothing usable; the record is dropped.
    Failed { warning: String },
}

impl ItemOutcome {
    /// The decoded item, if any.
    pub fn item(&self) -> Option<&IntakeItem> {
        match self {
            ItemOutcome::Complete(item) | ItemOutcome::Partial { item, .. } => Some(item),
            ItemOutcome::Failed { .. } => None,
        }
    }

    /// The warning attached to a partial or failed outcome.
    pub fn warning(&self) -> Option<&str> {
        match self {
            ItemOutcome::Complete(_) => None,
            ItemOutcome::Partial { warning, .. } | ItemOutcome::Failed { warning } => Some(warning),
        }
    }
}

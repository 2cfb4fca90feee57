//! Backend adapter for Docling-style JSON exports.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};
use crate::model::{CellRect, CoordOrigin, PageSize};

use super::intake::{
    CellSource, IntakeDocument, IntakeItem, IntakePage, ItemOutcome, Provenance, RawBox,
    StyleHint, TableGrid, TableSource,
};
use super::ConversionBackend;

/// Font weights above this are treated as bold.
const BOLD_WEIGHT: f32 = 400.0;

/// Reads the JSON export of a document-conversion backend.
///
/// Accepted shape (all fields optional except `items`):
///
/// ```json
/// {
///   "source": "invoice.pdf",
///   "backend": "docling 2.x",
///   "pages": [{ "page_no": 1, "width": 612, "height": 792 }],
///   "items": [{
///     "label": "TextItem",
///     "text": "Invoice",
///     "level": 1,
///     "prov": [{ "page_no": 1, "bbox": { "l": 0, "t": 700, "r": 50, "b": 688,
///                "coord_origin": "BOTTOMLEFT" } }]
///   }]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonBackend {
    _private: (),
}

impl JsonBackend {
    /// Create a new JSON backend.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Decode an export held in memory.
    pub fn parse_str(&self, json: &str) -> Result<IntakeDocument> {
        let raw: RawDocument = serde_json::from_str(json)?;
        raw.into_intake()
    }
}

impl ConversionBackend for JsonBackend {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn load(&self, path: &Path) -> Result<IntakeDocument> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        self.load_bytes(&data)
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<IntakeDocument> {
        match detect_format_from_bytes(bytes)? {
            InputFormat::BackendJson => {}
            InputFormat::Pdf { version } => {
                return Err(Error::UnsupportedInput(format!(
                    "PDF {} must be converted by a document-conversion backend first",
                    version
                )));
            }
        }

        let raw: RawDocument = serde_json::from_slice(bytes)?;
        raw.into_intake()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default, alias = "source_file", alias = "name")]
    source: Option<String>,
    #[serde(default, alias = "backend_version", alias = "docling_version")]
    backend: Option<String>,
    #[serde(default)]
    pages: Option<Value>,
    #[serde(default, alias = "elements")]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPage {
    #[serde(alias = "page_number")]
    page_no: Option<u32>,
    width: Option<f64>,
    height: Option<f64>,
    size: Option<RawSize>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawSize {
    width: Option<f64>,
    height: Option<f64>,
}

/// One provenance entry, decoded field by field.
#[derive(Debug, Default)]
struct RawProv {
    page_no: Option<u32>,
    bbox: Option<RawBBox>,
    size: Option<RawSize>,
    text_style: Option<RawProvStyle>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct RawBBox {
    #[serde(alias = "left")]
    l: Option<f64>,
    #[serde(alias = "top")]
    t: Option<f64>,
    #[serde(alias = "right")]
    r: Option<f64>,
    #[serde(alias = "bottom")]
    b: Option<f64>,
    coord_origin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStyle {
    #[serde(alias = "font")]
    font_name: Option<String>,
    font_size: Option<f32>,
    bold: Option<bool>,
    italic: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTextStyle {
    is_bold: Option<bool>,
    is_italic: Option<bool>,
    font_size: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProvStyle {
    font_size: Option<f32>,
    font_weight: Option<f32>,
    font_style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCell {
    #[serde(alias = "start_row_offset_idx")]
    row: Option<u32>,
    #[serde(alias = "column", alias = "start_col_offset_idx")]
    col: Option<u32>,
    #[serde(alias = "content")]
    text: Option<String>,
    #[serde(alias = "row_span")]
    rowspan: Option<u32>,
    #[serde(alias = "col_span")]
    colspan: Option<u32>,
    bbox: Option<RawBBox>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGrid {
    #[serde(alias = "columns")]
    headers: Vec<Value>,
    #[serde(alias = "data")]
    rows: Vec<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// Resolution into intake types
// ---------------------------------------------------------------------------

impl RawDocument {
    fn into_intake(self) -> Result<IntakeDocument> {
        let items = self
            .items
            .ok_or_else(|| Error::Backend("export has no `items` array".to_string()))?;

        let pages = match self.pages {
            Some(value) => decode_pages(value),
            None => Vec::new(),
        };

        let items = items
            .into_iter()
            .enumerate()
            .map(|(position, value)| decode_item(position, value))
            .collect();

        Ok(IntakeDocument {
            source: self.source,
            backend: self.backend,
            pages,
            items,
        })
    }
}

/// Pages come either as an array or as an object keyed by page number.
fn decode_pages(value: Value) -> Vec<IntakePage> {
    let entries: Vec<(Option<u32>, Value)> = match value {
        Value::Array(values) => values.into_iter().map(|v| (None, v)).collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, v)| (key.parse::<u32>().ok(), v))
            .collect(),
        other => {
            log::warn!("Ignoring page list of unexpected shape: {}", other);
            return Vec::new();
        }
    };

    let mut pages = Vec::with_capacity(entries.len());
    for (position, (key, value)) in entries.into_iter().enumerate() {
        let raw: RawPage = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping page entry {}: {}", position, e);
                continue;
            }
        };

        let size = raw.size.unwrap_or_default();
        pages.push(IntakePage {
            page_number: raw.page_no.or(key).unwrap_or(position as u32 + 1),
            width: raw.width.or(size.width),
            height: raw.height.or(size.height),
        });
    }

    pages.sort_by_key(|p| p.page_number);
    pages
}

/// Decode one field of a record, trying `keys` in order.
///
/// A field of the wrong shape becomes `None` and leaves a warning. The rest of
/// the record is unaffected.
fn field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    keys: &[&str],
    context: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| object.get(*key).map(|value| (*key, value)))?;
    if value.is_null() {
        return None;
    }

    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::warn!("{}: ignoring `{}`: {}", context, key, e);
            warnings.push(format!("{}: `{}` ignored: {}", context, key, e));
            None
        }
    }
}

fn decode_item(position: usize, value: Value) -> ItemOutcome {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return ItemOutcome::Failed {
                warning: format!("item {}: not an object ({})", position, other),
            }
        }
    };

    let context = format!("item {}", position);
    let mut warnings = Vec::new();

    let entries: Vec<Value> =
        field(&object, &["prov", "provenance"], &context, &mut warnings).unwrap_or_default();
    let mut prov = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let entry_context = format!("{} prov {}", context, i);
        if let Some(p) = RawProv::decode(entry, &entry_context, &mut warnings) {
            prov.push(p);
        }
    }

    let table = field::<Value>(&object, &["table", "data"], &context, &mut warnings)
        .and_then(|value| decode_table(&value, &context, &mut warnings));
    let style = field(&object, &["style"], &context, &mut warnings);
    let text_style = field(&object, &["text_style"], &context, &mut warnings);

    let item = IntakeItem {
        kind: field(&object, &["label", "type", "kind"], &context, &mut warnings),
        text: field(&object, &["text"], &context, &mut warnings),
        caption: field(&object, &["caption"], &context, &mut warnings),
        level: field(&object, &["level"], &context, &mut warnings).unwrap_or(0),
        provenance: prov.first().map(RawProv::to_provenance),
        confidence: field::<f64>(&object, &["confidence"], &context, &mut warnings)
            .map(|c| c as f32),
        style_hints: style_hints(style, text_style, &prov),
        marker: field(&object, &["marker"], &context, &mut warnings),
        list_level: field(&object, &["list_level"], &context, &mut warnings),
        table,
    };

    if warnings.is_empty() {
        return ItemOutcome::Complete(item);
    }

    let warning = warnings.join("; ");
    let nothing_usable = item.kind.is_none()
        && item.text.is_none()
        && item.caption.is_none()
        && item.provenance.is_none()
        && item.table.is_none();
    if nothing_usable {
        ItemOutcome::Failed { warning }
    } else {
        ItemOutcome::Partial { item, warning }
    }
}

impl RawProv {
    fn decode(value: &Value, context: &str, warnings: &mut Vec<String>) -> Option<Self> {
        let Some(object) = value.as_object() else {
            log::warn!("{}: provenance entry is not an object", context);
            warnings.push(format!("{}: not an object", context));
            return None;
        };

        Some(Self {
            page_no: field(object, &["page_no", "page_number"], context, warnings),
            bbox: field(object, &["bbox"], context, warnings),
            size: field(object, &["size", "page", "page_size"], context, warnings),
            text_style: field(object, &["text_style"], context, warnings),
        })
    }

    fn to_provenance(&self) -> Provenance {
        Provenance {
            page: self.page_no,
            bbox: self.bbox.as_ref().map(RawBBox::to_raw_box),
            page_size: self.size.and_then(|s| match (s.width, s.height) {
                (Some(w), Some(h)) => Some(PageSize::new(w, h)),
                _ => None,
            }),
        }
    }
}

impl RawBBox {
    fn to_raw_box(&self) -> RawBox {
        RawBox {
            left: self.l,
            top: self.t,
            right: self.r,
            bottom: self.b,
            origin: self
                .coord_origin
                .as_deref()
                .map(CoordOrigin::from_tag)
                .unwrap_or_default(),
        }
    }

    fn to_cell_rect(&self) -> Option<CellRect> {
        Some(CellRect {
            left: self.l?,
            top: self.t?,
            right: self.r?,
            bottom: self.b?,
        })
    }
}

/// Style sources in priority order: `style`, `text_style`, then every
/// provenance entry's `text_style`.
fn style_hints(
    style: Option<RawStyle>,
    text_style: Option<RawTextStyle>,
    prov: &[RawProv],
) -> Vec<StyleHint> {
    let mut hints = Vec::new();

    if let Some(s) = style {
        hints.push(StyleHint {
            font: s.font_name,
            font_size: s.font_size,
            bold: s.bold,
            italic: s.italic,
        });
    }

    if let Some(ts) = text_style {
        hints.push(StyleHint {
            font: None,
            font_size: ts.font_size,
            bold: ts.is_bold,
            italic: ts.is_italic,
        });
    }

    for ts in prov.iter().filter_map(|p| p.text_style.as_ref()) {
        hints.push(StyleHint {
            font: None,
            font_size: ts.font_size,
            bold: ts.font_weight.map(|w| w > BOLD_WEIGHT),
            italic: ts.font_style.as_deref().map(|s| s == "italic"),
        });
    }

    hints
}

/// Tables degrade piece by piece: a bad cell is dropped on its own, and a
/// bad structured export leaves the cells and markdown in place.
fn decode_table(
    value: &Value,
    context: &str,
    warnings: &mut Vec<String>,
) -> Option<TableSource> {
    let Some(object) = value.as_object() else {
        log::warn!("{}: table payload is not an object", context);
        warnings.push(format!("{}: table dropped: not an object", context));
        return None;
    };

    let raw_cells: Vec<Value> =
        field(object, &["cells", "table_cells"], context, warnings).unwrap_or_default();
    let mut cells = Vec::with_capacity(raw_cells.len());
    for (i, cell) in raw_cells.iter().enumerate() {
        match RawCell::deserialize(cell) {
            Ok(raw) => cells.push(raw.into_source()),
            Err(e) => {
                log::warn!("{}: dropping table cell {}: {}", context, i, e);
                warnings.push(format!("{}: table cell {} dropped: {}", context, i, e));
            }
        }
    }

    let markdown = field(object, &["markdown"], context, warnings);
    let grid = field::<Value>(object, &["grid", "dataframe"], context, warnings).and_then(
        |value| match RawGrid::deserialize(&value) {
            Ok(raw) => Some(TableGrid {
                headers: raw.headers.iter().map(value_to_text).collect(),
                rows: raw
                    .rows
                    .iter()
                    .map(|row| row.iter().map(value_to_text).collect())
                    .collect(),
            }),
            Err(e) => {
                log::warn!("{}: structured table export unusable: {}", context, e);
                warnings.push(format!("{}: table export dropped: {}", context, e));
                None
            }
        },
    );

    Some(TableSource {
        cells,
        markdown,
        grid,
    })
}

impl RawCell {
    fn into_source(self) -> CellSource {
        CellSource {
            row: self.row.unwrap_or(0),
            column: self.col.unwrap_or(0),
            content: self.text.unwrap_or_default(),
            rowspan: self.rowspan,
            colspan: self.colspan,
            bbox: self.bbox.as_ref().and_then(RawBBox::to_cell_rect),
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

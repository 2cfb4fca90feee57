//! # relayout
//!
//! Layout reconstruction for spatially annotated document exports.
//!
//! A document-conversion backend (a PDF/OCR pipeline) delivers a flat stream
//! of items with partial, inconsistent geometry. This library normalizes
//! every box into one top-left frame, classifies form labels, checkboxes and
//! blanks, detects text columns, assigns reading order, merges fragmented
//! runs and assembles tables into one [`DocumentRecord`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use relayout::{reconstruct_file, render};
//!
//! fn main() -> relayout::Result<()> {
//!     let doc = reconstruct_file("export.json")?;
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Canonical coordinates**: bottom-left and top-left boxes, validated per origin
//! - **Form heuristics**: labels, checkboxes with state, underline fields
//! - **Column detection**: gap analysis with configurable thresholds
//! - **Reading order**: row bands resolved left to right within columns
//! - **Fragment merging**: same-line runs split by the backend are rejoined
//! - **Parallel processing**: pages and batch documents run on Rayon

pub mod assembler;
pub mod backend;
pub mod batch;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use assembler::DocumentAssembler;
pub use backend::{BackendRegistry, ConversionBackend, IntakeDocument, IntakeItem, JsonBackend};
pub use batch::{BatchEvent, BatchProcessor, BatchReport, FileOutcome, FileResult};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use layout::LayoutOptions;
pub use model::{
    BoundingBox, CoordOrigin, DocumentRecord, Item, ItemAttributes, ItemType, Metadata, PageInfo,
    TableCell, TableRecord, TextStyle,
};
pub use render::{DocumentStats, JsonFormat, OutputFormat};

use std::path::Path;

/// Source identifier used for records built from in-memory input.
const MEMORY_SOURCE: &str = "memory";

/// Reconstruct the layout of a backend export file.
///
/// # Arguments
///
/// * `path` - Path to the export
///
/// # Example
///
/// ```no_run
/// use relayout::reconstruct_file;
///
/// let doc = reconstruct_file("export.json").unwrap();
/// println!("Items: {}", doc.items.len());
/// ```
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<DocumentRecord> {
    reconstruct_file_with_options(path, LayoutOptions::default())
}

/// Reconstruct a backend export file with custom options.
///
/// # Example
///
/// ```no_run
/// use relayout::{reconstruct_file_with_options, LayoutOptions};
///
/// let options = LayoutOptions::new()
///     .with_column_gap(80.0)
///     .without_merge();
/// let doc = reconstruct_file_with_options("export.json", options).unwrap();
/// ```
pub fn reconstruct_file_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<DocumentRecord> {
    let path = path.as_ref();
    let intake = BackendRegistry::with_defaults().load(path)?;
    Ok(DocumentAssembler::new(options).assemble(path.display().to_string(), intake))
}

/// Reconstruct a backend export held in memory.
///
/// # Example
///
/// ```no_run
/// use relayout::reconstruct_bytes;
///
/// let data = std::fs::read("export.json").unwrap();
/// let doc = reconstruct_bytes(&data).unwrap();
/// ```
pub fn reconstruct_bytes(data: &[u8]) -> Result<DocumentRecord> {
    reconstruct_bytes_with_options(data, LayoutOptions::default())
}

/// Reconstruct an in-memory export with custom options.
pub fn reconstruct_bytes_with_options(data: &[u8], options: LayoutOptions) -> Result<DocumentRecord> {
    let intake = match detect_format_from_bytes(data)? {
        InputFormat::BackendJson => JsonBackend::new().load_bytes(data)?,
        InputFormat::Pdf { version } => {
            return Err(Error::UnsupportedInput(format!(
                "raw PDF {} input; run it through a conversion backend first",
                version
            )))
        }
    };
    Ok(reconstruct_intake(intake, options))
}

/// Reconstruct a backend export given as a JSON string.
pub fn reconstruct_str(json: &str) -> Result<DocumentRecord> {
    let intake = JsonBackend::new().parse_str(json)?;
    Ok(reconstruct_intake(intake, LayoutOptions::default()))
}

/// Reconstruct an intake document produced by any backend.
///
/// The record's source is the intake's own source identifier, if any.
pub fn reconstruct_intake(intake: IntakeDocument, options: LayoutOptions) -> DocumentRecord {
    let source = intake
        .source
        .clone()
        .unwrap_or_else(|| MEMORY_SOURCE.to_string());
    DocumentAssembler::new(options).assemble(source, intake)
}

/// Render a record and write it to `output`.
///
/// The file is written only once rendering has succeeded, so a failure never
/// leaves a partial output behind. Missing parent directories are created.
pub fn write_record(record: &DocumentRecord, output: &Path, format: OutputFormat) -> Result<()> {
    let content = format.render(record)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, content)?;

    log::debug!("Wrote {}", output.display());
    Ok(())
}

/// Reconstruct `input` and write the pretty JSON record to `output`.
///
/// Returns the record that was written.
///
/// # Example
///
/// ```no_run
/// use relayout::{extract_to_json, LayoutOptions};
///
/// let doc = extract_to_json("export.json", "layout.json", LayoutOptions::default()).unwrap();
/// println!("{} items written", doc.items.len());
/// ```
pub fn extract_to_json<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: LayoutOptions,
) -> Result<DocumentRecord> {
    let record = reconstruct_file_with_options(input, options)?;
    write_record(&record, output.as_ref(), OutputFormat::Json(JsonFormat::Pretty))?;
    Ok(record)
}

/// Reconstruct a backend export file asynchronously.
///
/// The file is read with tokio; assembly itself runs on the calling task.
#[cfg(feature = "async")]
pub async fn reconstruct_file_async<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<DocumentRecord> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let data = tokio::fs::read(path).await?;
    let intake = JsonBackend::new().load_bytes(&data)?;
    Ok(DocumentAssembler::new(options).assemble(path.display().to_string(), intake))
}

/// Builder for reconstructing and rendering documents.
///
/// # Example
///
/// ```no_run
/// use relayout::Relayout;
///
/// let json = Relayout::new()
///     .with_column_gap(60.0)
///     .without_merge()
///     .compact()
///     .reconstruct("export.json")?
///     .to_json()?;
/// # Ok::<(), relayout::Error>(())
/// ```
pub struct Relayout {
    options: LayoutOptions,
    json_format: JsonFormat,
}

impl Relayout {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: LayoutOptions::default(),
            json_format: JsonFormat::Pretty,
        }
    }

    /// Set the column gap threshold.
    pub fn with_column_gap(mut self, threshold: f64) -> Self {
        self.options = self.options.with_column_gap(threshold);
        self
    }

    /// Set the row band height.
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.options = self.options.with_row_height(height);
        self
    }

    /// Set the horizontal merge threshold.
    pub fn with_merge_gap(mut self, threshold: f64) -> Self {
        self.options = self.options.with_merge_gap(threshold);
        self
    }

    /// Disable fragment merging.
    pub fn without_merge(mut self) -> Self {
        self.options = self.options.without_merge();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.json_format = JsonFormat::Compact;
        self
    }

    /// Reconstruct a file.
    pub fn reconstruct<P: AsRef<Path>>(self, path: P) -> Result<Reconstructed> {
        let doc = reconstruct_file_with_options(path, self.options)?;
        Ok(Reconstructed {
            doc,
            json_format: self.json_format,
        })
    }

    /// Reconstruct an in-memory export.
    pub fn reconstruct_bytes(self, data: &[u8]) -> Result<Reconstructed> {
        let doc = reconstruct_bytes_with_options(data, self.options)?;
        Ok(Reconstructed {
            doc,
            json_format: self.json_format,
        })
    }
}

impl Default for Relayout {
    fn default() -> Self {
        Self::new()
    }
}

/// A reconstructed document ready for rendering.
pub struct Reconstructed {
    doc: DocumentRecord,
    json_format: JsonFormat,
}

impl Reconstructed {
    /// Get the document record.
    pub fn document(&self) -> &DocumentRecord {
        &self.doc
    }

    /// Take ownership of the document record.
    pub fn into_document(self) -> DocumentRecord {
        self.doc
    }

    /// Render as JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.doc, self.json_format)
    }

    /// Render as plain text in reading order.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.doc)
    }

    /// Collect summary statistics.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_document(&self.doc)
    }
}

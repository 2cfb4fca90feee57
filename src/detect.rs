//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kinds of input the pipeline can recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// A JSON export produced by a document-conversion backend.
    BackendJson,
    /// A raw PDF file (needs the external backend first).
    Pdf {
        /// PDF version (e.g., "1.7", "2.0")
        version: String,
    },
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::BackendJson => write!(f, "backend JSON export"),
            InputFormat::Pdf { version } => write!(f, "PDF {}", version),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SNIFF_LEN: usize = 64;

/// Detect the input format of a file.
///
/// Only the first few bytes are read.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the input format from the leading bytes of a document.
///
/// # Returns
/// * `Ok(InputFormat::BackendJson)` if the data is a JSON object
/// * `Ok(InputFormat::Pdf { .. })` if the data starts with a PDF header
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC.len() + VERSION_LEN {
            return Err(Error::UnknownFormat);
        }
        let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        return Ok(InputFormat::Pdf { version });
    }

    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(InputFormat::BackendJson),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes look like a backend JSON export.
pub fn is_backend_json(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::BackendJson))
}

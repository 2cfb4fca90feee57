//! Error types for relayout.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for relayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal, per-document errors.
///
/// Anything that goes wrong with a single item, bounding box or table is
/// recovered locally and logged; only failures that make the whole document
/// unusable surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document does not exist.
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input is not a format any backend understands.
    #[error("Unknown input format: not a conversion-backend export")]
    UnknownFormat,

    /// The input is recognised but cannot be handled without an external backend.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// The backend export could not be read as a document.
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON decoding failed at the document level.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

//! Conversion-backend boundary.
//!
//! A backend turns an input document into an [`IntakeDocument`]. Backend
//! quirks (field aliases, coordinate-origin tags, the places style data hides)
//! are resolved here, once, so the layout passes only ever see intake types.
//!
//! # Example
//!
//! ```no_run
//! use relayout::backend::BackendRegistry;
//! use std::path::Path;
//!
//! fn main() -> relayout::Result<()> {
//!     let registry = BackendRegistry::with_defaults();
//!     let intake = registry.load(Path::new("export.json"))?;
//!     println!("{} items", intake.items.len());
//!     Ok(())
//! }
//! ```

mod intake;
mod json;

pub use intake::{
    CellSource, IntakeDocument, IntakeItem, IntakePage, ItemOutcome, Provenance, RawBox,
    StyleHint, TableGrid, TableSource,
};
pub use json::JsonBackend;

use crate::detect::{detect_format_from_path, InputFormat};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for conversion backends.
///
/// Implement this trait to feed the layout pipeline from a new backend.
pub trait ConversionBackend: Send + Sync {
    /// Get the supported file extensions for this backend.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["json"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Load a document from a file.
    fn load(&self, path: &Path) -> Result<IntakeDocument>;

    /// Load a document from bytes.
    fn load_bytes(&self, bytes: &[u8]) -> Result<IntakeDocument>;

    /// Check if this backend supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to backends.
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn ConversionBackend>>,
    by_name: HashMap<String, Arc<dyn ConversionBackend>>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the default backends (JSON exports).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonBackend::new()));
        registry
    }

    /// Register a backend for all its supported extensions.
    pub fn register(&mut self, backend: Arc<dyn ConversionBackend>) {
        for ext in backend.supported_extensions() {
            self.backends.insert(ext.to_lowercase(), backend.clone());
        }
        self.by_name.insert(backend.name().to_lowercase(), backend);
    }

    /// Get a backend by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn ConversionBackend>> {
        self.backends.get(&ext.to_lowercase()).cloned()
    }

    /// Get a backend by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn ConversionBackend>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.backends.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.backends.keys().map(|s| s.as_str()).collect()
    }

    /// Load a file with the backend registered for its extension.
    ///
    /// Files with no extension, or one no backend claims, are sniffed: a
    /// backend JSON export goes to the `json` backend, raw PDF is rejected.
    pub fn load(&self, path: &Path) -> Result<IntakeDocument> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let backend = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext));

        let backend = match backend {
            Some(backend) => backend,
            None => self.sniff(path)?,
        };

        log::debug!("Loading {} with backend '{}'", path.display(), backend.name());
        backend.load(path)
    }

    fn sniff(&self, path: &Path) -> Result<Arc<dyn ConversionBackend>> {
        match detect_format_from_path(path)? {
            InputFormat::BackendJson => self
                .get_by_name("json")
                .ok_or_else(|| Error::UnsupportedInput("no backend for JSON exports".into())),
            InputFormat::Pdf { version } => Err(Error::UnsupportedInput(format!(
                "raw PDF {} input; run it through a conversion backend first",
                version
            ))),
        }
    }

    /// Load bytes with the backend registered for `ext`.
    pub fn load_bytes(&self, bytes: &[u8], ext: &str) -> Result<IntakeDocument> {
        let backend = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedInput(format!("no backend for extension: {}", ext)))?;

        backend.load_bytes(bytes)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

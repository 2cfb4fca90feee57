//! Page-level types.

use super::PageSize;
use serde::{Deserialize, Serialize};

/// A single page of the reconstructed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Page width in page units
    pub width: f64,

    /// Page height in page units
    pub height: f64,

    /// Number of text columns, when more than one was detected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub columns: Option<usize>,

    /// Left edge of every column, starting with 0
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_boundaries: Option<Vec<f64>>,
}

impl PageInfo {
    /// Create a new page with the given dimensions.
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
            columns: None,
            column_boundaries: None,
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(page_number: u32) -> Self {
        Self::new(page_number, PageSize::LETTER.width, PageSize::LETTER.height)
    }

    /// Page dimensions.
    pub fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }

    /// Check if a multi-column layout was detected.
    pub fn is_multi_column(&self) -> bool {
        self.columns.map_or(false, |c| c > 1)
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::letter(1)
    }
}

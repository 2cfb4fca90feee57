//! Layout pass configuration.

/// Thresholds and switches for the layout passes.
///
/// All distances are in page units (points). The defaults are heuristics,
/// not measured values; they assume a 72-unit-per-inch page and body text
/// around 10-12pt.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Minimum horizontal gap between sorted left edges that opens a new column
    pub column_gap_threshold: f64,

    /// Pages with fewer positioned items are not analysed for columns
    pub min_items_for_columns: usize,

    /// Height of one row band used to quantize vertical position
    pub row_height: f64,

    /// Whether to merge fragmented text runs
    pub merge_fragments: bool,

    /// Maximum right-to-left gap for two fragments to merge
    pub merge_horizontal_threshold: f64,

    /// Maximum difference between fragment tops to count as one line
    pub merge_vertical_tolerance: f64,

    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column gap threshold.
    pub fn with_column_gap(mut self, threshold: f64) -> Self {
        self.column_gap_threshold = threshold;
        self
    }

    /// Set the minimum item count for column detection.
    pub fn with_min_items_for_columns(mut self, count: usize) -> Self {
        self.min_items_for_columns = count;
        self
    }

    /// Set the row band height.
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Set the horizontal merge threshold.
    pub fn with_merge_gap(mut self, threshold: f64) -> Self {
        self.merge_horizontal_threshold = threshold;
        self
    }

    /// Set the vertical merge tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_vertical_tolerance = tolerance;
        self
    }

    /// Enable or disable fragment merging.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge_fragments = merge;
        self
    }

    /// Disable fragment merging.
    pub fn without_merge(mut self) -> Self {
        self.merge_fragments = false;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_gap_threshold: 50.0,
            min_items_for_columns: 5,
            row_height: 20.0,
            merge_fragments: true,
            merge_horizontal_threshold: 20.0,
            merge_vertical_tolerance: 5.0,
            parallel: true,
        }
    }
}

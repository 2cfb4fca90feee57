//! Bounding box types.

use serde::{Deserialize, Serialize};

/// Which page corner a coordinate pair is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordOrigin {
    /// (0,0) is the top-left corner; y grows downward.
    #[serde(rename = "TOPLEFT")]
    TopLeft,
    /// (0,0) is the bottom-left corner; y grows upward (PDF user space).
    #[default]
    #[serde(rename = "BOTTOMLEFT")]
    BottomLeft,
}

impl CoordOrigin {
    /// Interpret a backend origin tag such as `"CoordOrigin.TOPLEFT"`.
    ///
    /// Anything that does not name the top-left corner is treated as bottom-left.
    pub fn from_tag(tag: &str) -> Self {
        let upper = tag.to_ascii_uppercase();
        if upper.contains("TOPLEFT") || upper.contains("TOP_LEFT") {
            CoordOrigin::TopLeft
        } else {
            CoordOrigin::BottomLeft
        }
    }

    /// The tag written to diagnostics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordOrigin::TopLeft => "TOPLEFT",
            CoordOrigin::BottomLeft => "BOTTOMLEFT",
        }
    }
}

/// Page width and height in page units (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
}

impl PageSize {
    /// US-Letter, 8.5 x 11 inches at 72 units per inch.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Create a page size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Position and size relative to the page, each in `0.0..=1.0` for boxes on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeBox {
    pub x_ratio: f64,
    pub y_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

/// A validated bounding box in the canonical top-left frame.
///
/// `right > left` and `bottom >= top` hold for every value built through
/// [`BoundingBox::from_edges`]; `width` and `height` are derived from the edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    /// Always [`CoordOrigin::TopLeft`] once normalized.
    pub coord_origin: CoordOrigin,
    /// Ratios against the page, present only when the page size is known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub relative: Option<RelativeBox>,
}

impl BoundingBox {
    /// Build a canonical box from top-left-frame edges.
    ///
    /// Returns `None` unless `right > left` and `bottom >= top`.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        let finite = [left, top, right, bottom].iter().all(|v| v.is_finite());
        if !finite || right <= left || bottom < top {
            return None;
        }

        Some(Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: (top - bottom).abs(),
            coord_origin: CoordOrigin::TopLeft,
            relative: None,
        })
    }

    /// Attach page-relative ratios. Non-usable page sizes leave the box unchanged.
    pub fn with_page(mut self, page: PageSize) -> Self {
        if page.is_usable() {
            self.relative = Some(RelativeBox {
                x_ratio: self.left / page.width,
                y_ratio: self.top / page.height,
                width_ratio: self.width / page.width,
                height_ratio: self.height / page.height,
            });
        }
        self
    }

    /// Top and bottom edges re-expressed in a bottom-left frame of the given page height.
    pub fn to_bottom_left(&self, page_height: f64) -> (f64, f64) {
        (page_height - self.top, page_height - self.bottom)
    }

    /// Smallest box covering every box in `boxes`.
    ///
    /// Returns `None` for an empty iterator. Relative ratios are dropped.
    pub fn union<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut iter = boxes.into_iter();
        let first = iter.next()?;
        let (mut left, mut top, mut right, mut bottom) =
            (first.left, first.top, first.right, first.bottom);

        for b in iter {
            left = left.min(b.left);
            top = top.min(b.top);
            right = right.max(b.right);
            bottom = bottom.max(b.bottom);
        }

        Self::from_edges(left, top, right, bottom)
    }

    /// Horizontal distance from this box's right edge to `other`'s left edge.
    ///
    /// Negative when the boxes overlap horizontally.
    pub fn horizontal_gap_to(&self, other: &BoundingBox) -> f64 {
        other.left - self.right
    }
}

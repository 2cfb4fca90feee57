//! Coordinate normalization into the canonical top-left frame.

use thiserror::Error;

use crate::backend::RawBox;
use crate::model::{BoundingBox, CoordOrigin, PageSize};

/// Why a raw box could not be normalized.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoxRejection {
    /// One or more edges were not supplied.
    #[error("bounding box is missing edges")]
    Incomplete,

    /// An edge is NaN or infinite.
    #[error("bounding box has non-finite edges")]
    NonFinite,

    /// The edges do not describe a box in the declared frame.
    #[error(
        "invalid {} box (l={left}, t={top}, r={right}, b={bottom})",
        origin.as_str()
    )]
    Degenerate {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        origin: CoordOrigin,
    },
}

impl BoxRejection {
    /// Whether this rejection deserves a warning (geometry was supplied but wrong).
    pub fn is_invalid_geometry(&self) -> bool {
        !matches!(self, BoxRejection::Incomplete)
    }
}

/// Page dimensions available to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// Height used to flip bottom-left boxes
    pub flip_height: f64,

    /// Size used for relative ratios; `None` when the page size is unknown
    pub known: Option<PageSize>,
}

impl PageFrame {
    /// A frame for a page whose size is known.
    pub fn known(size: PageSize) -> Self {
        Self {
            flip_height: size.height,
            known: Some(size).filter(PageSize::is_usable),
        }
    }

    /// A frame for a page of unknown size; flips against US-Letter height.
    pub fn unknown() -> Self {
        Self {
            flip_height: PageSize::LETTER.height,
            known: None,
        }
    }
}

/// Convert a raw box into a canonical [`BoundingBox`].
///
/// Bottom-left boxes must satisfy `right > left && top > bottom`, top-left
/// boxes `right > left && bottom > top`. Bottom-left boxes are flipped so
/// that `top` becomes the distance from the top of the page. Width and
/// height are preserved exactly.
pub fn normalize_box(raw: &RawBox, frame: PageFrame) -> Result<BoundingBox, BoxRejection> {
    let (left, top, right, bottom) = match (raw.left, raw.top, raw.right, raw.bottom) {
        (Some(l), Some(t), Some(r), Some(b)) => (l, t, r, b),
        _ => return Err(BoxRejection::Incomplete),
    };

    if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
        return Err(BoxRejection::NonFinite);
    }

    let valid = match raw.origin {
        CoordOrigin::BottomLeft => right > left && top > bottom,
        CoordOrigin::TopLeft => right > left && bottom > top,
    };
    if !valid {
        return Err(BoxRejection::Degenerate {
            left,
            top,
            right,
            bottom,
            origin: raw.origin,
        });
    }

    let (canonical_top, canonical_bottom) = match raw.origin {
        CoordOrigin::TopLeft => (top, bottom),
        CoordOrigin::BottomLeft => (frame.flip_height - top, frame.flip_height - bottom),
    };

    let bbox = BoundingBox::from_edges(left, canonical_top, right, canonical_bottom).ok_or(
        BoxRejection::Degenerate {
            left,
            top,
            right,
            bottom,
            origin: raw.origin,
        },
    )?;

    Ok(match frame.known {
        Some(size) => bbox.with_page(size),
        None => bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> PageFrame {
        PageFrame::known(PageSize::LETTER)
    }

    #[test]
    fn test_bottom_left_is_flipped() {
        let raw = RawBox::new(72.0, 720.0, 300.0, 700.0, CoordOrigin::BottomLeft);
        let bbox = normalize_box(&raw, letter()).unwrap();

        assert_eq!(bbox.coord_origin, CoordOrigin::TopLeft);
        assert_eq!(bbox.top, 72.0);
        assert_eq!(bbox.bottom, 92.0);
        assert_eq!(bbox.width, 228.0);
        assert_eq!(bbox.height, 20.0);
    }

    #[test]
    fn test_bottom_left_round_trip() {
        let raw = RawBox::new(10.5, 512.25, 99.75, 498.125, CoordOrigin::BottomLeft);
        let bbox = normalize_box(&raw, letter()).unwrap();

        let (top, bottom) = bbox.to_bottom_left(PageSize::LETTER.height);
        assert!((top - 512.25).abs() < 1e-9);
        assert!((bottom - 498.125).abs() < 1e-9);
        assert!((bbox.width - (99.75 - 10.5)).abs() < 1e-9);
        assert!((bbox.height - (512.25 - 498.125)).abs() < 1e-9);
        assert!(bbox.right > bbox.left);
        assert!(bbox.height >= 0.0);
    }

    #[test]
    fn test_top_left_kept() {
        let raw = RawBox::new(0.0, 100.0, 50.0, 112.0, CoordOrigin::TopLeft);
        let bbox = normalize_box(&raw, letter()).unwrap();
        assert_eq!(bbox.top, 100.0);
        assert_eq!(bbox.bottom, 112.0);
        assert_eq!(bbox.height, 12.0);
    }

    #[test]
    fn test_invalid_bottom_left_rejected() {
        let raw = RawBox::new(0.0, 10.0, 50.0, 50.0, CoordOrigin::BottomLeft);
        let err = normalize_box(&raw, letter()).unwrap_err();
        assert!(matches!(err, BoxRejection::Degenerate { .. }));
        assert!(err.is_invalid_geometry());
    }

    #[test]
    fn test_invalid_top_left_rejected() {
        let raw = RawBox::new(0.0, 50.0, 50.0, 10.0, CoordOrigin::TopLeft);
        assert!(normalize_box(&raw, letter()).is_err());

        let raw = RawBox::new(50.0, 10.0, 50.0, 20.0, CoordOrigin::TopLeft);
        assert!(normalize_box(&raw, letter()).is_err());
    }

    #[test]
    fn test_missing_and_non_finite() {
        let raw = RawBox {
            left: Some(0.0),
            top: None,
            right: Some(10.0),
            bottom: Some(5.0),
            origin: CoordOrigin::TopLeft,
        };
        let err = normalize_box(&raw, letter()).unwrap_err();
        assert_eq!(err, BoxRejection::Incomplete);
        assert!(!err.is_invalid_geometry());

        let raw = RawBox::new(0.0, f64::INFINITY, 10.0, 5.0, CoordOrigin::BottomLeft);
        assert_eq!(
            normalize_box(&raw, letter()).unwrap_err(),
            BoxRejection::NonFinite
        );
    }

    #[test]
    fn test_ratios_only_for_known_pages() {
        let raw = RawBox::new(61.2, 79.2, 122.4, 158.4, CoordOrigin::TopLeft);

        let bbox = normalize_box(&raw, letter()).unwrap();
        let rel = bbox.relative.unwrap();
        assert!((rel.x_ratio - 0.1).abs() < 1e-9);
        assert!((rel.height_ratio - 0.1).abs() < 1e-9);

        let bbox = normalize_box(&raw, PageFrame::unknown()).unwrap();
        assert!(bbox.relative.is_none());

        let bbox = normalize_box(&raw, PageFrame::known(PageSize::new(-1.0, 792.0))).unwrap();
        assert!(bbox.relative.is_none());
    }
}

//! Contain-fit calculation for placing one page inside another.
//!
//! The transform preserves the source aspect ratio and never crops: the
//! scaled page always fits entirely inside the target, centered on both
//! axes. Offsets are expressed in PDF user space (origin at bottom-left).

use crate::error::{Error, Result};

/// Scale factor and centering offsets for one page, in points.
///
/// Ephemeral: recomputed per page, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    /// Uniform scale applied to both axes
    pub scale: f32,
    /// Horizontal offset of the scaled page's lower-left corner
    pub offset_x: f32,
    /// Vertical offset of the scaled page's lower-left corner
    pub offset_y: f32,
}

/// Compute the contain-fit transform of a `source_width` x `source_height`
/// page into a `target_width` x `target_height` page.
///
/// Fails fast on non-positive dimensions rather than propagating NaN or
/// infinity into the output document.
pub fn fit(
    source_width: f32,
    source_height: f32,
    target_width: f32,
    target_height: f32,
) -> Result<PageFit> {
    if source_width <= 0.0 || source_height <= 0.0 {
        return Err(Error::InvalidPageSize {
            width: source_width,
            height: source_height,
        });
    }
    if target_width <= 0.0 || target_height <= 0.0 {
        return Err(Error::InvalidPageSize {
            width: target_width,
            height: target_height,
        });
    }

    let scale = (target_width / source_width).min(target_height / source_height);
    let offset_x = (target_width - source_width * scale) / 2.0;
    let offset_y = (target_height - source_height * scale) / 2.0;

    Ok(PageFit {
        scale,
        offset_x,
        offset_y,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_identity() {
        let f = fit(612.0, 792.0, 612.0, 792.0).unwrap();
        assert!((f.scale - 1.0).abs() < EPSILON);
        assert!(f.offset_x.abs() < EPSILON);
        assert!(f.offset_y.abs() < EPSILON);
    }

    #[test]
    fn test_wide_page_into_square() {
        // 200x100 into 100x100: width limits, vertical centering
        let f = fit(200.0, 100.0, 100.0, 100.0).unwrap();
        assert!((f.scale - 0.5).abs() < EPSILON);
        assert!(f.offset_x.abs() < EPSILON);
        assert!((f.offset_y - 25.0).abs() < EPSILON);
    }

    #[test]
    fn test_square_page_into_wide() {
        // 50x50 into 200x100: height limits, horizontal centering
        let f = fit(50.0, 50.0, 200.0, 100.0).unwrap();
        assert!((f.scale - 2.0).abs() < EPSILON);
        assert!((f.offset_x - 50.0).abs() < EPSILON);
        assert!(f.offset_y.abs() < EPSILON);
    }

    #[test]
    fn test_scaled_page_never_overflows_target() {
        let cases = [
            (200.0, 100.0, 100.0, 100.0),
            (50.0, 50.0, 200.0, 100.0),
            (612.0, 792.0, 595.0, 842.0),
            (842.0, 595.0, 595.0, 842.0),
            (1.0, 1000.0, 612.0, 792.0),
        ];

        for (sw, sh, tw, th) in cases {
            let f = fit(sw, sh, tw, th).unwrap();
            assert!(f.scale > 0.0);
            assert!(sw * f.scale <= tw + EPSILON, "width overflow for {sw}x{sh} -> {tw}x{th}");
            assert!(sh * f.scale <= th + EPSILON, "height overflow for {sw}x{sh} -> {tw}x{th}");
        }
    }

    #[test]
    fn test_scaled_page_is_centered() {
        let cases = [
            (200.0, 100.0, 100.0, 100.0),
            (595.0, 842.0, 612.0, 792.0),
            (300.0, 300.0, 1000.0, 50.0),
        ];

        for (sw, sh, tw, th) in cases {
            let f = fit(sw, sh, tw, th).unwrap();
            let center_x = f.offset_x + sw * f.scale / 2.0;
            let center_y = f.offset_y + sh * f.scale / 2.0;
            assert!((center_x - tw / 2.0).abs() < EPSILON);
            assert!((center_y - th / 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_zero_dimension_fails() {
        assert!(fit(0.0, 100.0, 100.0, 100.0).is_err());
        assert!(fit(100.0, 0.0, 100.0, 100.0).is_err());
        assert!(fit(100.0, 100.0, 0.0, 100.0).is_err());
        assert!(fit(100.0, 100.0, 100.0, 0.0).is_err());
    }

    #[test]
    fn test_negative_dimension_fails() {
        let err = fit(-10.0, 100.0, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, Error::InvalidPageSize { .. }));
    }
}

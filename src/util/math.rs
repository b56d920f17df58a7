//! Numeric helpers for aspect-preserving scaling.

/// Returns the scale factor `k = min(dst_w / src_w, dst_h / src_h)`.
///
/// All inputs must be non-zero; callers validate dimensions first.
pub(crate) fn fit_scale(src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> f64 {
    let kx = dst_w as f64 / src_w as f64;
    let ky = dst_h as f64 / src_h as f64;
    kx.min(ky)
}

/// Returns the content extent of `src` scaled to fit inside `dst`.
///
/// The limiting dimension maps exactly onto the target; the other one is
/// `floor(src_other * dst_lim / src_lim)` evaluated in integers, which equals
/// `floor(k * src_other)` without floating-point drift. Extents are clamped
/// to at least one pixel.
pub(crate) fn fit_extent(
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> (usize, usize) {
    let (sw, sh, dw, dh) = (src_w as u128, src_h as u128, dst_w as u128, dst_h as u128);
    // dst_w / src_w <= dst_h / src_h  <=>  dst_w * src_h <= dst_h * src_w
    let (w, h) = if dw * sh <= dh * sw {
        (dw, sh * dw / sw)
    } else {
        (sw * dh / sh, dh)
    };
    ((w as usize).max(1), (h as usize).max(1))
}

/// Truncates a coordinate toward zero, saturating at the `i32` range.
///
/// NaN maps to zero.
#[inline]
pub(crate) fn trunc_coord(value: f32) -> i32 {
    value as i32
}

#[cfg(test)]
mod tests {
    use super::{fit_extent, fit_scale, trunc_coord};

    #[test]
    fn fit_scale_picks_limiting_axis() {
        assert!((fit_scale(1280, 720, 640, 640) - 0.5).abs() < 1e-12);
        assert!((fit_scale(720, 1280, 640, 640) - 0.5).abs() < 1e-12);
        assert!((fit_scale(320, 320, 640, 640) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn fit_extent_is_exact_on_limiting_axis() {
        assert_eq!(fit_extent(1280, 720, 640, 640), (640, 360));
        assert_eq!(fit_extent(1000, 333, 640, 640), (640, 213));
        assert_eq!(fit_extent(333, 1000, 640, 640), (213, 640));
        assert_eq!(fit_extent(640, 640, 640, 640), (640, 640));
    }

    #[test]
    fn fit_extent_clamps_degenerate_axis() {
        assert_eq!(fit_extent(1, 1000, 640, 640), (1, 640));
        assert_eq!(fit_extent(5000, 2, 640, 640), (640, 1));
    }

    #[test]
    fn trunc_coord_rounds_toward_zero() {
        assert_eq!(trunc_coord(3.9), 3);
        assert_eq!(trunc_coord(-3.9), -3);
        assert_eq!(trunc_coord(f32::NAN), 0);
        assert_eq!(trunc_coord(1e20), i32::MAX);
    }
}

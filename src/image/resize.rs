//! Bilinear resampling for interleaved `u8` images.
//!
//! Destination pixel centers are mapped to source coordinates with
//! `sx = (dx + 0.5) * src_w / dst_w - 0.5` (same for `y`), clamped to the
//! valid range. The four neighbors are blended with bilinear weights and the
//! result is rounded to the nearest integer before clamping to `[0, 255]`.

use crate::image::{ImageView, OwnedImage, Size};
use crate::trace::trace_span;
use crate::util::YoloPostResult;

/// Source sample position along one axis: two neighbor indices and the
/// fractional weight of the second one.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tap {
    pub(crate) i0: usize,
    pub(crate) i1: usize,
    pub(crate) frac: f32,
}

/// Precomputes sample taps for every destination index along one axis.
pub(crate) fn axis_taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let ratio = src_len as f32 / dst_len as f32;
    let max = (src_len - 1) as f32;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * ratio - 0.5).clamp(0.0, max);
            let i0 = s.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            Tap {
                i0,
                i1,
                frac: s - i0 as f32,
            }
        })
        .collect()
}

/// Fills one destination row from the two source rows selected by `ty`.
pub(crate) fn resize_row(
    src: ImageView<'_, u8>,
    ty: Tap,
    x_taps: &[Tap],
    dst_row: &mut [u8],
) {
    let channels = src.channels();
    let (Some(row0), Some(row1)) = (src.row(ty.i0), src.row(ty.i1)) else {
        return;
    };
    let fy = ty.frac;
    for (dx, tx) in x_taps.iter().enumerate() {
        let fx = tx.frac;
        let w00 = (1.0 - fx) * (1.0 - fy);
        let w10 = fx * (1.0 - fy);
        let w01 = (1.0 - fx) * fy;
        let w11 = fx * fy;
        let a = tx.i0 * channels;
        let b = tx.i1 * channels;
        for c in 0..channels {
            let value = row0[a + c] as f32 * w00
                + row0[b + c] as f32 * w10
                + row1[a + c] as f32 * w01
                + row1[b + c] as f32 * w11;
            dst_row[dx * channels + c] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Resizes `src` to `dst` using bilinear interpolation.
///
/// Resizing to the source extent returns an exact copy.
pub fn resize_bilinear(src: ImageView<'_, u8>, dst: Size) -> YoloPostResult<OwnedImage> {
    dst.validate()?;
    let _span = trace_span!(
        "resize_bilinear",
        src_w = src.width(),
        src_h = src.height(),
        dst_w = dst.width,
        dst_h = dst.height
    )
    .entered();

    if src.size() == dst {
        return OwnedImage::from_view(src);
    }

    let channels = src.channels();
    let row_len = dst.width * channels;
    let mut out = vec![0u8; row_len * dst.height];
    let x_taps = axis_taps(src.width(), dst.width);
    let y_taps = axis_taps(src.height(), dst.height);

    for (dst_row, ty) in out.chunks_exact_mut(row_len).zip(y_taps.iter()) {
        resize_row(src, *ty, &x_taps, dst_row);
    }

    OwnedImage::new(out, dst.width, dst.height, channels)
}

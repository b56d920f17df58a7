//! Rayon-parallel variants of the row loops (feature-gated).
//!
//! Both functions split work by rows and collect in row order, so their
//! output is identical to the sequential paths.

use crate::candidate::Candidate;
use crate::image::resize::{axis_taps, resize_bilinear, resize_row};
use crate::image::{ImageView, OwnedImage, Size};
use crate::tensor::decode::decode_fields;
use crate::tensor::{DecodeOptions, DetectionTensor};
use crate::util::YoloPostResult;
use rayon::prelude::*;

/// Row-parallel bilinear resize.
pub fn resize_bilinear_par(src: ImageView<'_, u8>, dst: Size) -> YoloPostResult<OwnedImage> {
    dst.validate()?;
    if src.size() == dst {
        return resize_bilinear(src, dst);
    }

    let channels = src.channels();
    let row_len = dst.width * channels;
    let mut out = vec![0u8; row_len * dst.height];
    let x_taps = axis_taps(src.width(), dst.width);
    let y_taps = axis_taps(src.height(), dst.height);

    out.par_chunks_exact_mut(row_len)
        .zip(y_taps.par_iter())
        .for_each(|(dst_row, ty)| resize_row(src, *ty, &x_taps, dst_row));

    OwnedImage::new(out, dst.width, dst.height, channels)
}

/// Row-parallel tensor decode; the caller has already validated the layout.
pub(crate) fn decode_rows_par(tensor: DetectionTensor<'_>, options: DecodeOptions) -> Vec<Candidate> {
    let width = tensor.row_width().max(1);
    tensor
        .as_slice()
        .par_chunks_exact(width)
        .take(tensor.num_rows())
        .map(|row| decode_fields(row, options))
        .collect()
}

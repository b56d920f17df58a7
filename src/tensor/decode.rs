//! Row decoding: one candidate box per tensor row.

use crate::candidate::{BoxRect, Candidate};
use crate::tensor::{DetectionTensor, BOX_FIELDS};
use crate::trace::{trace_event, trace_span};
use crate::util::math::trunc_coord;
use crate::util::{YoloPostError, YoloPostResult};

/// Decoder options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Compute `ymin` as `cy - h / 2`.
    ///
    /// Off by default: `ymin` is `cy - w / 2`, which matches the detectors
    /// this decoder was first paired with. Square boxes are unaffected.
    pub ymin_from_height: bool,
    /// Decode rows on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

/// Returns `(class_id, confidence)` of the strictly largest confidence.
///
/// The scan starts from `(0, 0.0)`, so ties keep the lowest index and
/// non-positive or NaN confidences never replace the initial pick.
fn best_class(confs: &[f32]) -> (usize, f32) {
    let mut best_id = 0usize;
    let mut best_conf = 0.0f32;
    for (id, &conf) in confs.iter().enumerate() {
        if conf > best_conf {
            best_id = id;
            best_conf = conf;
        }
    }
    (best_id, best_conf)
}

/// Decodes a single `(cx, cy, w, h, objectness, classes..)` row.
///
/// Returns `None` for rows shorter than the box fields.
pub fn decode_row(row: &[f32], options: DecodeOptions) -> Option<Candidate> {
    (row.len() >= BOX_FIELDS).then(|| decode_fields(row, options))
}

/// Row decode for layouts already accepted by [`check_layout`].
pub(crate) fn decode_fields(row: &[f32], options: DecodeOptions) -> Candidate {
    let (cx, cy, w, h, objectness) = (row[0], row[1], row[2], row[3], row[4]);
    let (class_id, class_conf) = best_class(&row[BOX_FIELDS..]);
    let half_w = w / 2.0;
    let half_h = h / 2.0;
    let top_half = if options.ymin_from_height { half_h } else { half_w };

    Candidate {
        rect: BoxRect {
            xmin: trunc_coord(cx - half_w),
            ymin: trunc_coord(cy - top_half),
            xmax: trunc_coord(cx + half_w),
            ymax: trunc_coord(cy + half_h),
        },
        score: objectness * class_conf,
        class_id,
    }
}

pub(crate) fn check_layout(tensor: &DetectionTensor<'_>, num_classes: usize) -> YoloPostResult<()> {
    if num_classes == 0 {
        return Err(YoloPostError::InvalidInput("num_classes must be at least 1"));
    }
    let expected = BOX_FIELDS + num_classes;
    if tensor.row_width() != expected {
        return Err(YoloPostError::ShapeMismatch {
            what: "row width",
            expected,
            got: tensor.row_width(),
        });
    }
    Ok(())
}

/// Decodes every row of `tensor`, in row order, with default options.
pub fn decode(tensor: DetectionTensor<'_>, num_classes: usize) -> YoloPostResult<Vec<Candidate>> {
    decode_with_options(tensor, num_classes, DecodeOptions::default())
}

/// Decodes every row of `tensor`, in row order.
///
/// Exactly `tensor.num_rows()` candidates are returned; no thresholding is
/// applied here.
pub fn decode_with_options(
    tensor: DetectionTensor<'_>,
    num_classes: usize,
    options: DecodeOptions,
) -> YoloPostResult<Vec<Candidate>> {
    check_layout(&tensor, num_classes)?;
    let _span = trace_span!("decode", rows = tensor.num_rows(), classes = num_classes).entered();

    let candidates = decode_rows(tensor, options);

    trace_event!("decode_done", candidates = candidates.len());
    Ok(candidates)
}

#[cfg(feature = "rayon")]
fn decode_rows(tensor: DetectionTensor<'_>, options: DecodeOptions) -> Vec<Candidate> {
    if options.parallel {
        crate::parallel::decode_rows_par(tensor, options)
    } else {
        tensor.rows().map(|row| decode_fields(row, options)).collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn decode_rows(tensor: DetectionTensor<'_>, options: DecodeOptions) -> Vec<Candidate> {
    tensor.rows().map(|row| decode_fields(row, options)).collect()
}

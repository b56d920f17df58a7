//! Greedy non-maximum suppression over scored boxes.

use std::cmp::Ordering;

use crate::candidate::{BoxRect, Candidate};
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloPostError, YoloPostResult};

/// Suppression parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressParams {
    /// Candidates scoring below this value are never kept.
    pub score_threshold: f32,
    /// A remaining candidate is dropped when its IoU with a kept box exceeds this.
    pub iou_threshold: f32,
    /// Maximum number of kept boxes; `0` keeps all survivors.
    pub top_k: usize,
    /// Suppress across classes (`true`) or only within the same class.
    pub class_agnostic: bool,
}

impl Default for SuppressParams {
    fn default() -> Self {
        Self {
            score_threshold: 0.25,
            iou_threshold: 0.45,
            top_k: 0,
            class_agnostic: true,
        }
    }
}

impl SuppressParams {
    pub(crate) fn validate(&self) -> YoloPostResult<()> {
        check_threshold("score_threshold", self.score_threshold)?;
        check_threshold("iou_threshold", self.iou_threshold)
    }
}

fn check_threshold(name: &'static str, value: f32) -> YoloPostResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(YoloPostError::InvalidThreshold { name, value })
    }
}

/// Selection order: higher score first, then non-degenerate boxes, then
/// lower index.
fn selection_cmp(boxes: &[BoxRect], scores: &[f32], a: usize, b: usize) -> Ordering {
    scores[b]
        .total_cmp(&scores[a])
        .then_with(|| boxes[a].is_degenerate().cmp(&boxes[b].is_degenerate()))
        .then_with(|| a.cmp(&b))
}

/// Greedy NMS over parallel slices of boxes and scores.
///
/// Returns indices into the inputs in selection order. `class_ids` is only
/// consulted when `params.class_agnostic` is false and may otherwise be empty.
pub fn nms_boxes(
    boxes: &[BoxRect],
    scores: &[f32],
    class_ids: &[usize],
    params: SuppressParams,
) -> YoloPostResult<Vec<usize>> {
    params.validate()?;
    if scores.len() != boxes.len() {
        return Err(YoloPostError::ShapeMismatch {
            what: "scores length",
            expected: boxes.len(),
            got: scores.len(),
        });
    }
    if !params.class_agnostic && class_ids.len() != boxes.len() {
        return Err(YoloPostError::ShapeMismatch {
            what: "class ids length",
            expected: boxes.len(),
            got: class_ids.len(),
        });
    }

    let _span = trace_span!("suppress", candidates = boxes.len()).entered();

    // NaN never compares >= and stays ineligible.
    let mut order: Vec<usize> = (0..boxes.len())
        .filter(|&i| scores[i] >= params.score_threshold)
        .collect();
    order.sort_by(|&a, &b| selection_cmp(boxes, scores, a, b));

    let mut kept: Vec<usize> = Vec::new();
    'outer: for idx in order {
        if params.top_k > 0 && kept.len() >= params.top_k {
            break;
        }
        for &k in kept.iter() {
            if !params.class_agnostic && class_ids[k] != class_ids[idx] {
                continue;
            }
            if boxes[idx].iou(&boxes[k]) > params.iou_threshold {
                continue 'outer;
            }
        }
        kept.push(idx);
    }

    trace_event!("suppress_done", kept = kept.len());
    Ok(kept)
}

/// Greedy NMS over decoded candidates; returns kept indices in selection order.
pub fn suppress(candidates: &[Candidate], params: SuppressParams) -> YoloPostResult<Vec<usize>> {
    let boxes: Vec<BoxRect> = candidates.iter().map(|c| c.rect).collect();
    let scores: Vec<f32> = candidates.iter().map(|c| c.score).collect();
    let class_ids: Vec<usize> = candidates.iter().map(|c| c.class_id).collect();
    nms_boxes(&boxes, &scores, &class_ids, params)
}

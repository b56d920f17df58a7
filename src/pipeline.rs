//! End-to-end detection post-processing.
//!
//! A [`Pipeline`] letterboxes an input image, hands the canvas to an external
//! [`Detector`], then decodes and suppresses the raw tensor it returns.
//! Detections are reported in canvas pixel space; use
//! [`Letterboxed::to_source`] to map them onto the input image.

use crate::candidate::nms::{suppress, SuppressParams};
use crate::candidate::{BoxRect, Candidate};
use crate::image::{ImageView, Size};
use crate::letterbox::{letterbox_with_config, LetterboxConfig, Letterboxed};
use crate::tensor::{decode_with_options, DecodeOptions, DetectionTensor, RawOutput};
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloPostError, YoloPostResult};

/// Forward-inference collaborator.
///
/// Receives the letterboxed canvas and returns the raw detection tensor.
/// Model loading, backend and device selection all live behind this trait.
pub trait Detector {
    /// Runs inference on one letterboxed canvas.
    fn infer(&mut self, input: ImageView<'_, u8>) -> YoloPostResult<RawOutput>;
}

/// A kept detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Index of the candidate (tensor row) this detection came from.
    pub index: usize,
    /// Box in corner form.
    pub rect: BoxRect,
    /// `objectness * best class confidence`.
    pub score: f32,
    /// Index of the best class.
    pub class_id: usize,
}

/// Pipeline configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Canvas size, padding value and resize parallelism.
    pub letterbox: LetterboxConfig,
    /// Row decoding options.
    pub decode: DecodeOptions,
    /// Thresholds and selection mode for NMS.
    pub suppress: SuppressParams,
    /// Class count; derived from the tensor row width when `None`.
    pub num_classes: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            letterbox: LetterboxConfig::default(),
            decode: DecodeOptions::default(),
            suppress: SuppressParams::default(),
            num_classes: None,
        }
    }
}

/// Output of a full [`Pipeline::run`].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Canvas handed to the detector and its source mapping.
    pub letterboxed: Letterboxed,
    /// Kept detections in canvas space, in selection order.
    pub detections: Vec<Detection>,
}

impl Frame {
    /// Detections mapped back onto the source image.
    pub fn source_detections(&self) -> Vec<Detection> {
        self.detections
            .iter()
            .map(|det| Detection {
                rect: self.letterboxed.to_source(det.rect),
                ..*det
            })
            .collect()
    }
}

/// Stateless letterbox, decode and suppress pipeline.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with validated thresholds and target size.
    pub fn new(config: PipelineConfig) -> YoloPostResult<Self> {
        config.letterbox.target.validate()?;
        config.suppress.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Detector input size.
    pub fn input_size(&self) -> Size {
        self.config.letterbox.target
    }

    /// Letterboxes `image` to the detector input size.
    pub fn preprocess(&self, image: ImageView<'_, u8>) -> YoloPostResult<Letterboxed> {
        letterbox_with_config(image, self.config.letterbox)
    }

    /// Decodes every tensor row into a candidate.
    pub fn decode(&self, tensor: DetectionTensor<'_>) -> YoloPostResult<Vec<Candidate>> {
        let num_classes = match self.config.num_classes {
            Some(n) => n,
            None => tensor.num_classes().ok_or(YoloPostError::ShapeMismatch {
                what: "row width",
                expected: crate::tensor::BOX_FIELDS + 1,
                got: tensor.row_width(),
            })?,
        };
        decode_with_options(tensor, num_classes, self.config.decode)
    }

    /// Decodes and suppresses a raw tensor.
    pub fn postprocess(&self, tensor: DetectionTensor<'_>) -> YoloPostResult<Vec<Detection>> {
        let candidates = self.decode(tensor)?;
        let kept = suppress(&candidates, self.config.suppress)?;
        Ok(kept
            .into_iter()
            .map(|index| {
                let cand = candidates[index];
                Detection {
                    index,
                    rect: cand.rect,
                    score: cand.score,
                    class_id: cand.class_id,
                }
            })
            .collect())
    }

    /// Runs letterbox, inference and post-processing for one image.
    pub fn run<D: Detector + ?Sized>(
        &self,
        detector: &mut D,
        image: ImageView<'_, u8>,
    ) -> YoloPostResult<Frame> {
        let _span = trace_span!("pipeline_run").entered();
        let letterboxed = self.preprocess(image)?;
        let output = detector.infer(letterboxed.image().view())?;
        let detections = self.postprocess(output.view())?;
        trace_event!(
            "pipeline_done",
            rows = output.num_rows(),
            detections = detections.len()
        );
        Ok(Frame {
            letterboxed,
            detections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Pipeline, PipelineConfig};
    use crate::candidate::nms::SuppressParams;
    use crate::tensor::DetectionTensor;
    use crate::util::YoloPostError;

    #[test]
    fn new_rejects_bad_thresholds() {
        let cfg = PipelineConfig {
            suppress: SuppressParams {
                iou_threshold: 2.0,
                ..SuppressParams::default()
            },
            ..PipelineConfig::default()
        };
        assert!(matches!(
            Pipeline::new(cfg),
            Err(YoloPostError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn num_classes_is_derived_from_row_width() {
        let data = [50.0, 50.0, 20.0, 20.0, 0.9, 0.1, 0.8, 0.1];
        let tensor = DetectionTensor::new(&data, 1, 8).unwrap();
        let dets = Pipeline::default().postprocess(tensor).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 1);
        assert_eq!(dets[0].index, 0);
    }

    #[test]
    fn short_rows_are_a_shape_mismatch() {
        let data = [0.0f32; 4];
        let tensor = DetectionTensor::new(&data, 1, 4).unwrap();
        assert!(matches!(
            Pipeline::default().postprocess(tensor),
            Err(YoloPostError::ShapeMismatch { .. })
        ));
    }
}

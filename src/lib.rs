//! yolopost is a CPU-side pre- and post-processing library for YOLO-style
//! single-image object detectors.
//!
//! It letterboxes an input image into the detector's square input canvas,
//! decodes the dense `(cx, cy, w, h, objectness, classes..)` output tensor
//! into candidate boxes, and prunes them with greedy class-agnostic NMS.
//! Model loading and inference stay behind the [`Detector`] trait. Optional
//! features add row parallelism (`rayon`), `image` crate adapters
//! (`image-io`) and spans (`tracing`).

pub mod candidate;
pub mod image;
pub mod letterbox;
pub mod lowlevel;
#[cfg(feature = "rayon")]
pub mod parallel;
pub mod pipeline;
pub mod tensor;
pub(crate) mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage, Size};
pub use util::{YoloPostError, YoloPostResult};

pub use candidate::nms::{nms_boxes, suppress, SuppressParams};
pub use candidate::{BoxRect, Candidate};
pub use letterbox::{letterbox, letterbox_with_config, LetterboxConfig, Letterboxed};
pub use pipeline::{Detection, Detector, Frame, Pipeline, PipelineConfig};
pub use tensor::{decode, decode_with_options, DecodeOptions, DetectionTensor, RawOutput};

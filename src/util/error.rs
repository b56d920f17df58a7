//! Error types for yolopost.

use thiserror::Error;

/// Result alias for yolopost operations.
pub type YoloPostResult<T> = std::result::Result<T, YoloPostError>;

/// Errors that can occur while letterboxing, decoding or suppressing.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum YoloPostError {
    /// An image or target size has a zero width or height.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer is shorter than its declared geometry.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The row stride cannot hold a full row of pixels.
    #[error("invalid stride {stride} for row of {width} elements")]
    InvalidStride { width: usize, stride: usize },
    /// A tensor or slice length disagrees with its declared shape.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A threshold lies outside `[0, 1]` or is NaN.
    #[error("invalid threshold {name}={value}: must lie in [0, 1]")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image decoding or encoding failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
    /// The external detector failed to produce an output tensor.
    #[error("inference failed: {reason}")]
    Inference { reason: String },
}

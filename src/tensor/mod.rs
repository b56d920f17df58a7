//! Dense detection tensors.
//!
//! A detector emits a row-major `[num_rows, row_width]` table where each row
//! is `(cx, cy, w, h, objectness, class_0 .. class_{n-1})`. `DetectionTensor`
//! borrows such a buffer together with its shape; `RawOutput` owns one.

use crate::util::{YoloPostError, YoloPostResult};

pub(crate) mod decode;

pub use decode::{decode, decode_row, decode_with_options, DecodeOptions};

/// Number of leading fields before the class confidences.
pub const BOX_FIELDS: usize = 5;

/// Borrowed, shape-checked view into a flat detection tensor.
#[derive(Clone, Copy, Debug)]
pub struct DetectionTensor<'a> {
    data: &'a [f32],
    num_rows: usize,
    row_width: usize,
}

impl<'a> DetectionTensor<'a> {
    /// Wraps `data`, requiring `data.len() == num_rows * row_width`.
    pub fn new(data: &'a [f32], num_rows: usize, row_width: usize) -> YoloPostResult<Self> {
        let expected = num_rows
            .checked_mul(row_width)
            .ok_or(YoloPostError::InvalidInput("tensor shape overflows usize"))?;
        if data.len() != expected {
            return Err(YoloPostError::ShapeMismatch {
                what: "tensor length",
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            num_rows,
            row_width,
        })
    }

    /// Returns the number of candidate rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of values per row.
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Class count implied by the row width, if the row can hold a box at all.
    pub fn num_classes(&self) -> Option<usize> {
        self.row_width.checked_sub(BOX_FIELDS)
    }

    /// Returns the flat row-major buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns row `j`, or `None` past the last row.
    pub fn row(&self, j: usize) -> Option<&'a [f32]> {
        if j >= self.num_rows {
            return None;
        }
        let start = j * self.row_width;
        self.data.get(start..start + self.row_width)
    }

    /// Iterates rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        let width = self.row_width.max(1);
        let rows = self.num_rows;
        self.data.chunks_exact(width).take(rows)
    }
}

/// Owned detector output with its shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOutput {
    data: Vec<f32>,
    num_rows: usize,
    row_width: usize,
}

impl RawOutput {
    /// Takes ownership of `data`, validating the shape like [`DetectionTensor::new`].
    pub fn new(data: Vec<f32>, num_rows: usize, row_width: usize) -> YoloPostResult<Self> {
        DetectionTensor::new(&data, num_rows, row_width)?;
        Ok(Self {
            data,
            num_rows,
            row_width,
        })
    }

    /// Builds an output from a `[1, rows, width]` or `[rows, width]` shape.
    pub fn from_shape(data: Vec<f32>, shape: &[usize]) -> YoloPostResult<Self> {
        match shape {
            [1, rows, width] | [rows, width] => Self::new(data, *rows, *width),
            _ => Err(YoloPostError::InvalidInput(
                "detection tensor shape must be [1, rows, width] or [rows, width]",
            )),
        }
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> DetectionTensor<'_> {
        DetectionTensor {
            data: &self.data,
            num_rows: self.num_rows,
            row_width: self.row_width,
        }
    }

    /// Returns the number of candidate rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of values per row.
    pub fn row_width(&self) -> usize {
        self.row_width
    }
}

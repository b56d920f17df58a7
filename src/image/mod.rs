//! Image views and owned image buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer of interleaved pixels
//! with an explicit stride. The stride counts elements between the starts of
//! consecutive rows, so a stride larger than `width * channels` represents
//! padded rows. ROI slices are zero-copy views into the same backing slice and
//! keep the stride of the view they were cut from.

use crate::util::{YoloPostError, YoloPostResult};

pub mod blob;
#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

/// Integer image extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Size {
    /// Creates a size, rejecting zero extents.
    pub fn new(width: usize, height: usize) -> YoloPostResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Square size, as used by most detector inputs.
    pub fn square(side: usize) -> YoloPostResult<Self> {
        Self::new(side, side)
    }

    pub(crate) fn validate(&self) -> YoloPostResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(YoloPostError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
        }
    }
}

/// Borrowed 2D image view with interleaved channels and an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> YoloPostResult<Self> {
        let stride = width.saturating_mul(channels);
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a view with an explicit stride in elements.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> YoloPostResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(YoloPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the image extent.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the channel values of pixel `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [T]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * self.channels;
        row.get(start..start + self.channels)
    }

    /// Returns a contiguous slice for row `y` with length `width * channels`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> YoloPostResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(YoloPostError::InvalidDimensions { width, height });
        }
        let end_x = x.checked_add(width);
        let end_y = y.checked_add(height);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) if end_x <= self.width && end_y <= self.height => {}
            _ => return Err(YoloPostError::InvalidInput("roi exceeds image bounds")),
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels))
            .ok_or(YoloPostError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(YoloPostError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.channels, self.stride)
    }
}

fn required_len(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
) -> YoloPostResult<usize> {
    if width == 0 || height == 0 {
        return Err(YoloPostError::InvalidDimensions { width, height });
    }
    if channels == 0 {
        return Err(YoloPostError::InvalidInput("image must have at least one channel"));
    }
    let row_len = width
        .checked_mul(channels)
        .ok_or(YoloPostError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(YoloPostError::InvalidStride {
            width: row_len,
            stride,
        });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(YoloPostError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous `u8` image with interleaved channels.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl OwnedImage {
    /// Wraps a contiguous buffer of exactly `width * height * channels` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize, channels: usize) -> YoloPostResult<Self> {
        let needed = required_len(width, height, channels, width.saturating_mul(channels))?;
        if data.len() < needed {
            return Err(YoloPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(YoloPostError::ShapeMismatch {
                what: "image buffer length",
                expected: needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Allocates an image with every element set to `value`.
    pub fn filled(size: Size, channels: usize, value: u8) -> YoloPostResult<Self> {
        size.validate()?;
        let len = size
            .width
            .checked_mul(size.height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(YoloPostError::InvalidDimensions {
                width: size.width,
                height: size.height,
            })?;
        Self::new(vec![value; len], size.width, size.height, channels)
    }

    /// Copies a (possibly strided) view into a contiguous owned image.
    pub fn from_view(view: ImageView<'_, u8>) -> YoloPostResult<Self> {
        let row_len = view.width() * view.channels();
        let mut data = Vec::with_capacity(row_len * view.height());
        for y in 0..view.height() {
            let row = view.row(y).ok_or(YoloPostError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height(), view.channels())
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the image extent.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the contiguous pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Copies `src` into this image with its top-left corner at `(x, y)`.
    pub(crate) fn paste(&mut self, src: ImageView<'_, u8>, x: usize, y: usize) -> YoloPostResult<()> {
        if src.channels() != self.channels {
            return Err(YoloPostError::ShapeMismatch {
                what: "paste channel count",
                expected: self.channels,
                got: src.channels(),
            });
        }
        if x + src.width() > self.width || y + src.height() > self.height {
            return Err(YoloPostError::InvalidInput("pasted region exceeds canvas"));
        }
        let dst_stride = self.width * self.channels;
        let row_len = src.width() * src.channels();
        for sy in 0..src.height() {
            let row = src.row(sy).ok_or(YoloPostError::InvalidInput("source row out of range"))?;
            let start = (y + sy) * dst_stride + x * self.channels;
            self.data[start..start + row_len].copy_from_slice(row);
        }
        Ok(())
    }
}

//! Planar float blobs for detector input.

use crate::image::ImageView;
use crate::util::{YoloPostError, YoloPostResult};

/// Blob conversion options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlobParams {
    /// Multiplier applied to every `u8` sample.
    pub scale: f32,
    /// Swap the first and third channel (BGR <-> RGB).
    pub swap_rb: bool,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            scale: 1.0 / 255.0,
            swap_rb: false,
        }
    }
}

/// Float blob in NCHW layout with a batch dimension of one.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    data: Vec<f32>,
    shape: [usize; 4],
}

impl Blob {
    /// Returns the shape as `[1, channels, height, width]`.
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Returns the planar sample data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the blob and returns its sample buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Converts an interleaved image into a scaled NCHW blob.
pub fn blob_from_image(image: ImageView<'_, u8>, params: BlobParams) -> YoloPostResult<Blob> {
    let channels = image.channels();
    if params.swap_rb && channels < 3 {
        return Err(YoloPostError::InvalidInput(
            "swap_rb requires at least three channels",
        ));
    }
    let (width, height) = (image.width(), image.height());
    let plane = width * height;
    let mut data = vec![0.0f32; plane * channels];

    for y in 0..height {
        let Some(row) = image.row(y) else {
            return Err(YoloPostError::InvalidInput("image row out of range"));
        };
        for (x, px) in row.chunks_exact(channels).enumerate() {
            for (c, &value) in px.iter().enumerate() {
                let plane_idx = match c {
                    0 if params.swap_rb => 2,
                    2 if params.swap_rb => 0,
                    other => other,
                };
                data[plane_idx * plane + y * width + x] = value as f32 * params.scale;
            }
        }
    }

    Ok(Blob {
        data,
        shape: [1, channels, height, width],
    })
}

#[cfg(test)]
mod tests {
    use super::{blob_from_image, BlobParams};
    use crate::image::ImageView;

    #[test]
    fn blob_is_planar_and_scaled() {
        let data = [255u8, 0, 51, 0, 255, 102];
        let view = ImageView::from_slice(&data, 2, 1, 3).unwrap();
        let blob = blob_from_image(view, BlobParams::default()).unwrap();
        assert_eq!(blob.shape(), [1, 3, 1, 2]);
        let expected = [1.0, 0.0, 0.0, 1.0, 0.2, 0.4];
        for (got, want) in blob.data().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn swap_rb_exchanges_outer_planes() {
        let data = [10u8, 20, 30];
        let view = ImageView::from_slice(&data, 1, 1, 3).unwrap();
        let params = BlobParams {
            scale: 1.0,
            swap_rb: true,
        };
        let blob = blob_from_image(view, params).unwrap();
        assert_eq!(blob.data(), &[30.0, 20.0, 10.0]);
    }

    #[test]
    fn swap_rb_rejects_gray_input() {
        let data = [10u8];
        let view = ImageView::from_slice(&data, 1, 1, 1).unwrap();
        let params = BlobParams {
            swap_rb: true,
            ..BlobParams::default()
        };
        assert!(blob_from_image(view, params).is_err());
    }
}

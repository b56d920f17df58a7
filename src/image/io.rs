//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{YoloPostError, YoloPostResult};
use std::path::Path;

/// Creates a borrowed three-channel view from an RGB image buffer.
pub fn view_from_rgb_image(img: &image::RgbImage) -> YoloPostResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height, 3)
}

/// Creates an owned RGB image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> YoloPostResult<OwnedImage> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    OwnedImage::new(rgb.into_raw(), width, height, 3)
}

/// Loads an image from disk and converts it to an owned RGB image.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> YoloPostResult<OwnedImage> {
    let img = image::open(path).map_err(|err| YoloPostError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Saves a one- or three-channel owned image; the format follows the extension.
pub fn save_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> YoloPostResult<()> {
    let width = img.width() as u32;
    let height = img.height() as u32;
    let data = img.data().to_vec();
    let too_small = || YoloPostError::ImageIo {
        reason: "pixel buffer does not match image extent".to_string(),
    };
    let result = match img.channels() {
        1 => image::GrayImage::from_raw(width, height, data)
            .ok_or_else(too_small)?
            .save(path),
        3 => image::RgbImage::from_raw(width, height, data)
            .ok_or_else(too_small)?
            .save(path),
        _ => {
            return Err(YoloPostError::InvalidInput(
                "only gray and rgb images can be saved",
            ))
        }
    };
    result.map_err(|err| YoloPostError::ImageIo {
        reason: err.to_string(),
    })
}

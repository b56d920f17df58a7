//! Aspect-preserving resize into a fixed-size padded canvas.
//!
//! The scaled content is anchored at the top-left corner of the canvas and
//! the padding occupies only the right and bottom margins. Detection
//! coordinates produced on the canvas therefore need no offset correction,
//! only a division by the scale factor, to land in source pixel space.

use crate::candidate::BoxRect;
use crate::image::resize::resize_bilinear;
use crate::image::{ImageView, OwnedImage, Size};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{fit_extent, fit_scale};
use crate::util::YoloPostResult;

/// Letterbox configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterboxConfig {
    /// Canvas extent (detector input size).
    pub target: Size,
    /// Value written to every channel of the padding.
    pub fill_value: u8,
    /// Use the rayon row-parallel resize (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for LetterboxConfig {
    fn default() -> Self {
        Self {
            target: Size::default(),
            fill_value: 0,
            parallel: false,
        }
    }
}

/// A freshly allocated letterboxed canvas plus the mapping that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Letterboxed {
    canvas: OwnedImage,
    scale: f64,
    content: Size,
    source: Size,
}

impl Letterboxed {
    /// Returns the canvas image (exactly the target size).
    pub fn image(&self) -> &OwnedImage {
        &self.canvas
    }

    /// Consumes the result and returns the canvas.
    pub fn into_image(self) -> OwnedImage {
        self.canvas
    }

    /// Scale factor `k` applied to the source image.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Extent of the scaled content in the top-left corner of the canvas.
    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Extent of the source image.
    pub fn source_size(&self) -> Size {
        self.source
    }

    /// Zero-copy view of the scaled content region.
    pub fn content(&self) -> YoloPostResult<ImageView<'_, u8>> {
        self.canvas
            .view()
            .roi(0, 0, self.content.width, self.content.height)
    }

    /// Maps a canvas-space box back to source pixel coordinates.
    ///
    /// Coordinates are divided by the scale factor, truncated toward zero and
    /// clipped to the source extent.
    pub fn to_source(&self, rect: BoxRect) -> BoxRect {
        let max_x = self.source.width as f64;
        let max_y = self.source.height as f64;
        let map = |v: i32, max: f64| (v as f64 / self.scale).clamp(0.0, max) as i32;
        BoxRect {
            xmin: map(rect.xmin, max_x),
            ymin: map(rect.ymin, max_y),
            xmax: map(rect.xmax, max_x),
            ymax: map(rect.ymax, max_y),
        }
    }

    /// Maps a source-space box onto the canvas.
    pub fn to_canvas(&self, rect: BoxRect) -> BoxRect {
        let map = |v: i32| (v as f64 * self.scale) as i32;
        BoxRect {
            xmin: map(rect.xmin),
            ymin: map(rect.ymin),
            xmax: map(rect.xmax),
            ymax: map(rect.ymax),
        }
    }
}

/// Letterboxes `src` into a black canvas of size `target`.
pub fn letterbox(src: ImageView<'_, u8>, target: Size) -> YoloPostResult<Letterboxed> {
    letterbox_with_config(
        src,
        LetterboxConfig {
            target,
            ..LetterboxConfig::default()
        },
    )
}

/// Letterboxes `src` according to `config`.
///
/// The source is never mutated and the canvas is always a new allocation.
pub fn letterbox_with_config(
    src: ImageView<'_, u8>,
    config: LetterboxConfig,
) -> YoloPostResult<Letterboxed> {
    let target = config.target;
    target.validate()?;
    let source = src.size();
    source.validate()?;

    let _span = trace_span!(
        "letterbox",
        src_w = source.width,
        src_h = source.height,
        dst_w = target.width,
        dst_h = target.height
    )
    .entered();

    let scale = fit_scale(source.width, source.height, target.width, target.height);
    let (width, height) = fit_extent(source.width, source.height, target.width, target.height);
    let content = Size { width, height };

    let resized = resize(src, content, config.parallel)?;
    let mut canvas = OwnedImage::filled(target, src.channels(), config.fill_value)?;
    canvas.paste(resized.view(), 0, 0)?;

    trace_event!(
        "letterbox_done",
        scale = scale,
        content_w = content.width,
        content_h = content.height
    );

    Ok(Letterboxed {
        canvas,
        scale,
        content,
        source,
    })
}

#[cfg(feature = "rayon")]
fn resize(src: ImageView<'_, u8>, dst: Size, parallel: bool) -> YoloPostResult<OwnedImage> {
    if parallel {
        crate::parallel::resize_bilinear_par(src, dst)
    } else {
        resize_bilinear(src, dst)
    }
}

#[cfg(not(feature = "rayon"))]
fn resize(src: ImageView<'_, u8>, dst: Size, _parallel: bool) -> YoloPostResult<OwnedImage> {
    resize_bilinear(src, dst)
}

//! Low-level building blocks for custom pipelines.
//!
//! Most users should prefer [`crate::Pipeline`] or the top-level
//! `letterbox`, `decode` and `suppress` functions.

pub use crate::image::blob::{blob_from_image, Blob, BlobParams};
pub use crate::image::resize::resize_bilinear;
#[cfg(feature = "rayon")]
pub use crate::parallel::resize_bilinear_par;
pub use crate::tensor::{decode_row, BOX_FIELDS};

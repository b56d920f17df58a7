//! Candidate boxes and their pruning.
//!
//! Includes corner-form rectangles with IoU and greedy non-maximum
//! suppression over scored candidates.

pub(crate) mod nms;
pub(crate) mod rect;

pub use rect::BoxRect;

/// A decoded detection hypothesis: one per tensor row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Box in corner form, canvas pixel space.
    pub rect: BoxRect,
    /// `objectness * best class confidence`.
    pub score: f32,
    /// Index of the best class.
    pub class_id: usize,
}

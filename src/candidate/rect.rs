//! Axis-aligned integer rectangles in corner form.

/// Axis-aligned box `[xmin, xmax) x [ymin, ymax)` in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoxRect {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoxRect {
    /// Creates a box from its corners.
    pub const fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Signed horizontal extent.
    pub fn width(&self) -> i64 {
        self.xmax as i64 - self.xmin as i64
    }

    /// Signed vertical extent.
    pub fn height(&self) -> i64 {
        self.ymax as i64 - self.ymin as i64
    }

    /// True when the box has zero or negative extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Area in square pixels; zero for degenerate boxes.
    ///
    /// Extents of a full `i32` range box reach `2^32 - 1`, so the product
    /// is carried in `i128`.
    pub fn area(&self) -> i128 {
        if self.is_degenerate() {
            0
        } else {
            self.width() as i128 * self.height() as i128
        }
    }

    /// Area of the overlap with `other`.
    pub fn intersection_area(&self, other: &BoxRect) -> i128 {
        let w = self.xmax.min(other.xmax) as i64 - self.xmin.max(other.xmin) as i64;
        let h = self.ymax.min(other.ymax) as i64 - self.ymin.max(other.ymin) as i64;
        if w <= 0 || h <= 0 {
            0
        } else {
            w as i128 * h as i128
        }
    }

    /// Intersection over union; zero whenever either box is degenerate.
    pub fn iou(&self, other: &BoxRect) -> f32 {
        if self.is_degenerate() || other.is_degenerate() {
            return 0.0;
        }
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        if union <= 0 {
            return 0.0;
        }
        (inter as f64 / union as f64) as f32
    }
}

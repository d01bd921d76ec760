//! Region structure for raster bounds and iteration windows
//!
//! Coordinates are in pixels and may be negative: rasters carry an origin
//! that need not be (0,0).

/// Rectangular area of pixel space
///
/// Represents a rectangular area defined by its top-left corner coordinates
/// and dimensions. Used for raster bounds, tile bounds and the bounding
/// window of an iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// X-coordinate of the top-left corner
    pub x: i32,

    /// Y-coordinate of the top-left corner
    pub y: i32,

    /// Width of the region in pixels
    pub width: i32,

    /// Height of the region in pixels
    pub height: i32,
}

impl Region {
    /// Create a new region
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the top-left corner
    /// * `y` - Y-coordinate of the top-left corner
    /// * `width` - Width of the region in pixels
    /// * `height` - Height of the region in pixels
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Region { x, y, width, height }
    }

    /// Get the rightmost X coordinate (exclusive)
    pub fn end_x(&self) -> i32 {
        self.x + self.width
    }

    /// Get the bottommost Y coordinate (exclusive)
    pub fn end_y(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the pixel (x, y) lies inside the region
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.end_x() && y < self.end_y()
    }

    /// Whether `other` lies entirely inside this region
    pub fn contains_region(&self, other: &Region) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.end_x() <= self.end_x()
            && other.end_y() <= self.end_y()
    }

    /// Overlap of two regions; empty (zero sized) when they do not meet
    pub fn intersection(&self, other: &Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let end_x = self.end_x().min(other.end_x());
        let end_y = self.end_y().min(other.end_y());

        if end_x <= x || end_y <= y {
            Region::new(x, y, 0, 0)
        } else {
            Region::new(x, y, end_x - x, end_y - y)
        }
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }
}

//! Iterator capabilities
//!
//! Traversal and sample access are separate traits so that the iterator
//! families are plain compositions of them:
//!
//! | family               | traits                                        |
//! |----------------------|-----------------------------------------------|
//! | [`RectIter`]         | [`RectTraversal`] + [`SampleRead`]            |
//! | [`WritableRectIter`] | [`RectIter`] + [`SampleWrite`]                |
//! | [`RookIter`]         | [`RectIter`] + [`ReverseTraversal`]           |
//! | [`WritableRookIter`] | [`RookIter`] + [`SampleWrite`]                |
//!
//! Sample accessors do not check the position. Reading or writing after a
//! traversal has run past the window is a contract violation; check
//! `finished_*` or the `*_done` result first.

use crate::errors::TileResult;
use crate::raster::Region;

/// Forward traversal of a window: lines top to bottom, pixels left to right
pub trait RectTraversal {
    /// The window being traversed
    fn window(&self) -> Region;

    /// Current (x, y, band)
    fn position(&self) -> (i32, i32, i32);

    fn start_lines(&mut self);

    fn next_line(&mut self);

    /// Advance one line and report whether the traversal passed the bottom edge
    fn next_line_done(&mut self) -> bool;

    /// Move `num` lines; fails without moving if the target is outside the window
    fn jump_lines(&mut self, num: i32) -> TileResult<()>;

    fn finished_lines(&self) -> bool;

    fn start_pixels(&mut self);

    fn next_pixel(&mut self);

    /// Advance one pixel and report whether the traversal passed the right edge
    fn next_pixel_done(&mut self) -> bool;

    /// Move `num` pixels; fails without moving if the target is outside the window
    fn jump_pixels(&mut self, num: i32) -> TileResult<()>;

    fn finished_pixels(&self) -> bool;

    fn start_bands(&mut self);

    fn next_band(&mut self);

    fn next_band_done(&mut self) -> bool;

    fn finished_bands(&self) -> bool;
}

/// Backward traversal; with [`RectTraversal`] this makes a rook iterator
///
/// `end_*` moves one axis to its far edge and leaves the other two alone.
pub trait ReverseTraversal {
    fn end_lines(&mut self);

    fn prev_line(&mut self);

    /// Step back one line and report whether the traversal passed the top edge
    fn prev_line_done(&mut self) -> bool;

    /// Whether the traversal is above the first line of the window
    fn finished_lines_top(&self) -> bool;

    fn end_pixels(&mut self);

    fn prev_pixel(&mut self);

    /// Step back one pixel and report whether the traversal passed the left edge
    fn prev_pixel_done(&mut self) -> bool;

    /// Whether the traversal is left of the first pixel of the window
    fn finished_pixels_left(&self) -> bool;

    fn end_bands(&mut self);

    fn prev_band(&mut self);

    fn prev_band_done(&mut self) -> bool;
}

/// Reads at the current traversal position
pub trait SampleRead {
    fn num_bands(&self) -> usize;

    /// Sample of the current band
    fn get_sample(&self) -> i32;

    fn get_sample_at(&self, band: usize) -> i32;

    fn get_sample_float(&self) -> f32;

    fn get_sample_float_at(&self, band: usize) -> f32;

    fn get_sample_double(&self) -> f64;

    fn get_sample_double_at(&self, band: usize) -> f64;

    /// Every band of the current pixel into `out`
    fn get_pixel(&self, out: &mut [i32]);

    fn get_pixel_float(&self, out: &mut [f32]);

    fn get_pixel_double(&self, out: &mut [f64]);

    /// Every band of the current pixel in a new vector
    fn pixel(&self) -> Vec<i32> {
        let mut out = vec![0; self.num_bands()];
        self.get_pixel(&mut out);
        out
    }
}

/// Writes at the current traversal position
pub trait SampleWrite {
    fn set_sample(&mut self, value: i32);

    fn set_sample_at(&mut self, band: usize, value: i32);

    fn set_sample_float(&mut self, value: f32);

    fn set_sample_float_at(&mut self, band: usize, value: f32);

    fn set_sample_double(&mut self, value: f64);

    fn set_sample_double_at(&mut self, band: usize, value: f64);

    fn set_pixel(&mut self, values: &[i32]);

    fn set_pixel_float(&mut self, values: &[f32]);

    fn set_pixel_double(&mut self, values: &[f64]);
}

/// Sequential read-only iterator
pub trait RectIter: RectTraversal + SampleRead {}

impl<T: RectTraversal + SampleRead + ?Sized> RectIter for T {}

/// Sequential read/write iterator
pub trait WritableRectIter: RectIter + SampleWrite {}

impl<T: RectIter + SampleWrite + ?Sized> WritableRectIter for T {}

/// Bidirectional read-only iterator
pub trait RookIter: RectIter + ReverseTraversal {}

impl<T: RectIter + ReverseTraversal + ?Sized> RookIter for T {}

/// Bidirectional read/write iterator; adds nothing beyond its parts
pub trait WritableRookIter: RookIter + SampleWrite {}

impl<T: RookIter + SampleWrite + ?Sized> WritableRookIter for T {}

/// Reads anywhere inside the window, in any order
///
/// Coordinates are absolute pixel coordinates and must lie in [`RandomIter::window`].
pub trait RandomIter {
    fn window(&self) -> Region;

    fn num_bands(&self) -> usize;

    fn get_sample(&self, x: i32, y: i32, band: usize) -> i32;

    fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32;

    fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64;

    fn get_pixel(&self, x: i32, y: i32, out: &mut [i32]) {
        for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
            *value = self.get_sample(x, y, band);
        }
    }

    fn get_pixel_float(&self, x: i32, y: i32, out: &mut [f32]) {
        for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
            *value = self.get_sample_float(x, y, band);
        }
    }

    fn get_pixel_double(&self, x: i32, y: i32, out: &mut [f64]) {
        for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
            *value = self.get_sample_double(x, y, band);
        }
    }
}

/// Random access with writes
pub trait WritableRandomIter: RandomIter {
    fn set_sample(&mut self, x: i32, y: i32, band: usize, value: i32);

    fn set_sample_float(&mut self, x: i32, y: i32, band: usize, value: f32);

    fn set_sample_double(&mut self, x: i32, y: i32, band: usize, value: f64);

    fn set_pixel(&mut self, x: i32, y: i32, values: &[i32]) {
        for (band, &value) in values.iter().enumerate().take(self.num_bands()) {
            self.set_sample(x, y, band, value);
        }
    }

    fn set_pixel_float(&mut self, x: i32, y: i32, values: &[f32]) {
        for (band, &value) in values.iter().enumerate().take(self.num_bands()) {
            self.set_sample_float(x, y, band, value);
        }
    }

    fn set_pixel_double(&mut self, x: i32, y: i32, values: &[f64]) {
        for (band, &value) in values.iter().enumerate().take(self.num_bands()) {
            self.set_sample_double(x, y, band, value);
        }
    }
}

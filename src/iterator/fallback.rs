//! Layout-independent sequential and bidirectional iterators
//!
//! Every access looks the current tile up in the source and goes through the
//! raster's own per-sample accessors. Slow, but correct for any layout and
//! element type, and the reference behaviour the specialized iterators must
//! reproduce.

use crate::iterator::walker::{traversal_impls, Cursor};
use crate::iterator::{SampleRead, SampleWrite};
use crate::raster::{Raster, Region, TiledSource, TiledSourceMut};

pub(crate) fn missing_tile(tile_x: i32, tile_y: i32) -> ! {
    panic!("iterator moved to tile ({}, {}) which the source does not have", tile_x, tile_y)
}

/// Read-only rect and rook iterator over any tiled source
pub struct RectIterFallback<'a, S: ?Sized> {
    source: &'a S,
    cursor: Cursor,
}

impl<'a, S: TiledSource + ?Sized> RectIterFallback<'a, S> {
    /// Iterator positioned at the top-left corner of `window`
    ///
    /// `window` must be non-empty and lie inside the source bounds.
    pub fn new(source: &'a S, window: Region) -> Self {
        RectIterFallback {
            source,
            cursor: Cursor::new(source, window),
        }
    }

    #[inline]
    fn tile(&self) -> &'a Raster {
        let (tx, ty) = (self.cursor.x.tile(), self.cursor.y.tile());
        match self.source.tile(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(tx, ty),
        }
    }

    fn tile_changed(&mut self) {}

    fn moved(&mut self) {}
}

/// Read/write rect and rook iterator over any tiled source
pub struct WritableRectIterFallback<'a, S: ?Sized> {
    source: &'a mut S,
    cursor: Cursor,
}

impl<'a, S: TiledSourceMut + ?Sized> WritableRectIterFallback<'a, S> {
    pub fn new(source: &'a mut S, window: Region) -> Self {
        let cursor = Cursor::new(&*source, window);
        WritableRectIterFallback { source, cursor }
    }

    #[inline]
    fn tile(&self) -> &Raster {
        let (tx, ty) = (self.cursor.x.tile(), self.cursor.y.tile());
        match self.source.tile(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(tx, ty),
        }
    }

    #[inline]
    fn tile_mut(&mut self) -> &mut Raster {
        let (tx, ty) = (self.cursor.x.tile(), self.cursor.y.tile());
        match self.source.tile_mut(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(tx, ty),
        }
    }

    fn tile_changed(&mut self) {}

    fn moved(&mut self) {}
}

traversal_impls!(['a, S: TiledSource + ?Sized] RectIterFallback<'a, S>);
traversal_impls!(['a, S: TiledSourceMut + ?Sized] WritableRectIterFallback<'a, S>);

macro_rules! fallback_reads {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> SampleRead for $ty {
            fn num_bands(&self) -> usize {
                self.cursor.num_bands as usize
            }

            fn get_sample(&self) -> i32 {
                self.get_sample_at(self.cursor.band())
            }

            fn get_sample_at(&self, band: usize) -> i32 {
                self.tile().get_sample(self.cursor.x.pos(), self.cursor.y.pos(), band)
            }

            fn get_sample_float(&self) -> f32 {
                self.get_sample_float_at(self.cursor.band())
            }

            fn get_sample_float_at(&self, band: usize) -> f32 {
                self.tile().get_sample_float(self.cursor.x.pos(), self.cursor.y.pos(), band)
            }

            fn get_sample_double(&self) -> f64 {
                self.get_sample_double_at(self.cursor.band())
            }

            fn get_sample_double_at(&self, band: usize) -> f64 {
                self.tile().get_sample_double(self.cursor.x.pos(), self.cursor.y.pos(), band)
            }

            fn get_pixel(&self, out: &mut [i32]) {
                let tile = self.tile();
                let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = tile.get_sample(x, y, band);
                }
            }

            fn get_pixel_float(&self, out: &mut [f32]) {
                let tile = self.tile();
                let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = tile.get_sample_float(x, y, band);
                }
            }

            fn get_pixel_double(&self, out: &mut [f64]) {
                let tile = self.tile();
                let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = tile.get_sample_double(x, y, band);
                }
            }
        }
    };
}

fallback_reads!(['a, S: TiledSource + ?Sized] RectIterFallback<'a, S>);
fallback_reads!(['a, S: TiledSourceMut + ?Sized] WritableRectIterFallback<'a, S>);

impl<'a, S: TiledSourceMut + ?Sized> SampleWrite for WritableRectIterFallback<'a, S> {
    fn set_sample(&mut self, value: i32) {
        let band = self.cursor.band();
        self.set_sample_at(band, value);
    }

    fn set_sample_at(&mut self, band: usize, value: i32) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        self.tile_mut().set_sample(x, y, band, value);
    }

    fn set_sample_float(&mut self, value: f32) {
        let band = self.cursor.band();
        self.set_sample_float_at(band, value);
    }

    fn set_sample_float_at(&mut self, band: usize, value: f32) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        self.tile_mut().set_sample_float(x, y, band, value);
    }

    fn set_sample_double(&mut self, value: f64) {
        let band = self.cursor.band();
        self.set_sample_double_at(band, value);
    }

    fn set_sample_double_at(&mut self, band: usize, value: f64) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        self.tile_mut().set_sample_double(x, y, band, value);
    }

    fn set_pixel(&mut self, values: &[i32]) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        let bands = self.cursor.num_bands as usize;
        let tile = self.tile_mut();
        for (band, &value) in values.iter().enumerate().take(bands) {
            tile.set_sample(x, y, band, value);
        }
    }

    fn set_pixel_float(&mut self, values: &[f32]) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        let bands = self.cursor.num_bands as usize;
        let tile = self.tile_mut();
        for (band, &value) in values.iter().enumerate().take(bands) {
            tile.set_sample_float(x, y, band, value);
        }
    }

    fn set_pixel_double(&mut self, values: &[f64]) {
        let (x, y) = (self.cursor.x.pos(), self.cursor.y.pos());
        let bands = self.cursor.num_bands as usize;
        let tile = self.tile_mut();
        for (band, &value) in values.iter().enumerate().take(bands) {
            tile.set_sample_double(x, y, band, value);
        }
    }
}

//! Traversal state shared by every sequential and bidirectional iterator
//!
//! An [`AxisWalker`] tracks one coordinate (x or y) through a window that
//! spans several tiles. It knows the tile the position is in, the local
//! coordinate within that tile and the nearest tile or window boundary on
//! either side, so a step only needs one comparison to know whether the
//! tile changed.

use crate::errors::{TileError, TileResult};
use crate::raster::{pos_to_tile, Region, TiledSource};

/// Position along one axis of a tiled window
#[derive(Debug, Clone)]
pub(crate) struct AxisWalker {
    axis: &'static str,
    first: i32,
    last: i32,
    tile_size: i32,
    grid_offset: i32,
    start_tile: i32,
    end_tile: i32,
    tile: i32,
    tile_start: i32,
    tile_end: i32,
    prev_boundary: i32,
    next_boundary: i32,
    pos: i32,
    local: i32,
}

impl AxisWalker {
    /// Walker over `first..first + len`, positioned at `first`
    pub(crate) fn new(axis: &'static str, first: i32, len: i32, tile_size: i32, grid_offset: i32) -> Self {
        let last = first + len - 1;
        let start_tile = pos_to_tile(first, grid_offset, tile_size);
        let end_tile = pos_to_tile(last, grid_offset, tile_size);
        let mut walker = AxisWalker {
            axis,
            first,
            last,
            tile_size,
            grid_offset,
            start_tile,
            end_tile,
            tile: start_tile,
            tile_start: 0,
            tile_end: 0,
            prev_boundary: 0,
            next_boundary: 0,
            pos: first,
            local: 0,
        };
        walker.set_tile_bounds();
        walker
    }

    fn set_tile_bounds(&mut self) {
        self.tile_start = self.tile * self.tile_size + self.grid_offset;
        self.tile_end = self.tile_start + self.tile_size - 1;
        self.local = self.pos - self.tile_start;
        self.prev_boundary = self.tile_start.max(self.first);
        self.next_boundary = self.tile_end.min(self.last);
    }

    #[inline]
    pub(crate) fn pos(&self) -> i32 {
        self.pos
    }

    #[inline]
    pub(crate) fn local(&self) -> i32 {
        self.local
    }

    #[inline]
    pub(crate) fn tile(&self) -> i32 {
        self.tile
    }

    /// Move to the first position; returns whether the tile changed
    pub(crate) fn start(&mut self) -> bool {
        let changed = self.tile != self.start_tile;
        self.pos = self.first;
        self.tile = self.start_tile;
        self.set_tile_bounds();
        changed
    }

    /// Move to the last position; returns whether the tile changed
    pub(crate) fn end(&mut self) -> bool {
        let changed = self.tile != self.end_tile;
        self.pos = self.last;
        self.tile = self.end_tile;
        self.set_tile_bounds();
        changed
    }

    /// Step forward; returns whether the tile changed
    #[inline]
    pub(crate) fn next(&mut self) -> bool {
        self.pos += 1;
        self.local += 1;
        if self.pos > self.next_boundary && self.pos <= self.last {
            self.tile += 1;
            self.tile_start += self.tile_size;
            self.tile_end += self.tile_size;
            self.local -= self.tile_size;
            self.prev_boundary = self.tile_start.max(self.first);
            self.next_boundary = self.tile_end.min(self.last);
            return true;
        }
        false
    }

    /// Step backward; returns whether the tile changed
    #[inline]
    pub(crate) fn prev(&mut self) -> bool {
        self.pos -= 1;
        self.local -= 1;
        if self.pos < self.prev_boundary && self.pos >= self.first {
            self.tile -= 1;
            self.tile_start -= self.tile_size;
            self.tile_end -= self.tile_size;
            self.local += self.tile_size;
            self.prev_boundary = self.tile_start.max(self.first);
            self.next_boundary = self.tile_end.min(self.last);
            return true;
        }
        false
    }

    /// Relative seek that must land inside the window
    ///
    /// On failure the position is left untouched. Returns whether the tile
    /// changed.
    pub(crate) fn jump(&mut self, num: i32) -> TileResult<bool> {
        let target = self.pos as i64 + num as i64;
        if target < self.first as i64 || target > self.last as i64 {
            return Err(TileError::OutOfBounds {
                axis: self.axis,
                target,
                first: self.first,
                last: self.last,
            });
        }

        self.pos = target as i32;
        let tile = pos_to_tile(self.pos, self.grid_offset, self.tile_size);
        if tile != self.tile {
            self.tile = tile;
            self.set_tile_bounds();
            Ok(true)
        } else {
            self.local = self.pos - self.tile_start;
            Ok(false)
        }
    }

    #[inline]
    pub(crate) fn finished_forward(&self) -> bool {
        self.pos > self.last
    }

    #[inline]
    pub(crate) fn finished_backward(&self) -> bool {
        self.pos < self.first
    }
}

/// Line, pixel and band position of an iterator
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    pub(crate) window: Region,
    pub(crate) x: AxisWalker,
    pub(crate) y: AxisWalker,
    pub(crate) band: i32,
    pub(crate) num_bands: i32,
}

impl Cursor {
    pub(crate) fn new<S: TiledSource + ?Sized>(source: &S, window: Region) -> Self {
        Cursor {
            window,
            x: AxisWalker::new("pixels", window.x, window.width, source.tile_width(), source.tile_grid_x_offset()),
            y: AxisWalker::new("lines", window.y, window.height, source.tile_height(), source.tile_grid_y_offset()),
            band: 0,
            num_bands: source.num_bands() as i32,
        }
    }

    /// Local (x, y) inside the current tile
    #[inline]
    pub(crate) fn local(&self) -> (usize, usize) {
        (self.x.local() as usize, self.y.local() as usize)
    }

    #[inline]
    pub(crate) fn band(&self) -> usize {
        self.band as usize
    }
}

/// Implements `RectTraversal` and `ReverseTraversal` for an iterator type
///
/// The type needs a `cursor: Cursor` field and two inherent methods:
/// `tile_changed(&mut self)`, called after the position entered another
/// tile, and `moved(&mut self)`, called after every change of line or
/// pixel.
macro_rules! traversal_impls {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> $crate::iterator::RectTraversal for $ty {
            fn window(&self) -> $crate::raster::Region {
                self.cursor.window
            }

            fn position(&self) -> (i32, i32, i32) {
                (self.cursor.x.pos(), self.cursor.y.pos(), self.cursor.band)
            }

            fn start_lines(&mut self) {
                if self.cursor.y.start() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn next_line(&mut self) {
                if self.cursor.y.next() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn next_line_done(&mut self) -> bool {
                self.next_line();
                self.cursor.y.finished_forward()
            }

            fn jump_lines(&mut self, num: i32) -> $crate::errors::TileResult<()> {
                if self.cursor.y.jump(num)? {
                    self.tile_changed();
                }
                self.moved();
                Ok(())
            }

            #[inline]
            fn finished_lines(&self) -> bool {
                self.cursor.y.finished_forward()
            }

            fn start_pixels(&mut self) {
                if self.cursor.x.start() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn next_pixel(&mut self) {
                if self.cursor.x.next() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn next_pixel_done(&mut self) -> bool {
                self.next_pixel();
                self.cursor.x.finished_forward()
            }

            fn jump_pixels(&mut self, num: i32) -> $crate::errors::TileResult<()> {
                if self.cursor.x.jump(num)? {
                    self.tile_changed();
                }
                self.moved();
                Ok(())
            }

            #[inline]
            fn finished_pixels(&self) -> bool {
                self.cursor.x.finished_forward()
            }

            fn start_bands(&mut self) {
                self.cursor.band = 0;
            }

            #[inline]
            fn next_band(&mut self) {
                self.cursor.band += 1;
            }

            #[inline]
            fn next_band_done(&mut self) -> bool {
                self.cursor.band += 1;
                self.cursor.band >= self.cursor.num_bands
            }

            #[inline]
            fn finished_bands(&self) -> bool {
                self.cursor.band >= self.cursor.num_bands
            }
        }

        impl<$($gen)*> $crate::iterator::ReverseTraversal for $ty {
            fn end_lines(&mut self) {
                if self.cursor.y.end() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn prev_line(&mut self) {
                if self.cursor.y.prev() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn prev_line_done(&mut self) -> bool {
                self.prev_line();
                self.cursor.y.finished_backward()
            }

            #[inline]
            fn finished_lines_top(&self) -> bool {
                self.cursor.y.finished_backward()
            }

            fn end_pixels(&mut self) {
                if self.cursor.x.end() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn prev_pixel(&mut self) {
                if self.cursor.x.prev() {
                    self.tile_changed();
                }
                self.moved();
            }

            #[inline]
            fn prev_pixel_done(&mut self) -> bool {
                self.prev_pixel();
                self.cursor.x.finished_backward()
            }

            #[inline]
            fn finished_pixels_left(&self) -> bool {
                self.cursor.x.finished_backward()
            }

            fn end_bands(&mut self) {
                self.cursor.band = self.cursor.num_bands - 1;
            }

            #[inline]
            fn prev_band(&mut self) {
                self.cursor.band -= 1;
            }

            #[inline]
            fn prev_band_done(&mut self) -> bool {
                self.cursor.band -= 1;
                self.cursor.band < 0
            }
        }
    };
}

pub(crate) use traversal_impls;

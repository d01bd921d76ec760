//! Random-access iterators
//!
//! Construction builds per-column and per-row lookup tables (tile index and
//! position inside the tile) for the whole window, so an access costs two
//! table reads instead of two floor divisions. The tables are freed when the
//! iterator is released.

use crate::errors::{invalid, TileResult};
use crate::iterator::component::{all_tile_banks_mut, ComponentElement, ComponentStrides};
use crate::iterator::{RandomIter, WritableRandomIter};
use crate::raster::{Raster, Region, TiledSource, TiledSourceMut};

/// Column and row tables for one window
#[derive(Debug, Clone)]
struct TileLookup {
    window: Region,
    num_bands: usize,
    tile_x: Vec<i32>,
    tile_y: Vec<i32>,
    /// Tile grid column relative to the chosen base tile
    col_index: Vec<usize>,
    /// Tile grid row relative to the base tile, times tiles per row
    row_index: Vec<usize>,
    local_x: Vec<i32>,
    local_y: Vec<i32>,
}

impl TileLookup {
    fn new<S: TiledSource + ?Sized>(source: &S, window: Region, base: (i32, i32), tiles_across: i32) -> Self {
        let tile_x: Vec<i32> = (window.x..window.end_x()).map(|x| source.x_to_tile_x(x)).collect();
        let tile_y: Vec<i32> = (window.y..window.end_y()).map(|y| source.y_to_tile_y(y)).collect();
        let local_x = (window.x..window.end_x())
            .zip(&tile_x)
            .map(|(x, &tx)| x - (tx * source.tile_width() + source.tile_grid_x_offset()))
            .collect();
        let local_y = (window.y..window.end_y())
            .zip(&tile_y)
            .map(|(y, &ty)| y - (ty * source.tile_height() + source.tile_grid_y_offset()))
            .collect();
        let col_index = tile_x.iter().map(|&tx| (tx - base.0) as usize).collect();
        let row_index = tile_y.iter().map(|&ty| ((ty - base.1) * tiles_across) as usize).collect();

        TileLookup {
            window,
            num_bands: source.num_bands(),
            tile_x,
            tile_y,
            col_index,
            row_index,
            local_x,
            local_y,
        }
    }

    #[inline]
    fn column(&self, x: i32) -> usize {
        (x - self.window.x) as usize
    }

    #[inline]
    fn row(&self, y: i32) -> usize {
        (y - self.window.y) as usize
    }

    /// Tile index (tile_x, tile_y) of a pixel
    #[inline]
    fn tile_of(&self, x: i32, y: i32) -> (i32, i32) {
        (self.tile_x[self.column(x)], self.tile_y[self.row(y)])
    }

    /// Index of a pixel's tile relative to the base tile
    #[inline]
    fn slot_of(&self, x: i32, y: i32) -> usize {
        self.row_index[self.row(y)] + self.col_index[self.column(x)]
    }
}

fn missing_tile(x: i32, y: i32) -> ! {
    panic!("pixel ({}, {}) is not covered by any tile of the source", x, y)
}

/// Read-only random access over any tiled source
pub struct RandomIterFallback<'a, S: ?Sized> {
    source: &'a S,
    lookup: TileLookup,
}

impl<'a, S: TiledSource + ?Sized> RandomIterFallback<'a, S> {
    pub fn new(source: &'a S, window: Region) -> Self {
        let lookup = TileLookup::new(source, window, (0, 0), 0);
        RandomIterFallback { source, lookup }
    }

    #[inline]
    fn tile(&self, x: i32, y: i32) -> &'a Raster {
        let (tx, ty) = self.lookup.tile_of(x, y);
        match self.source.tile(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(x, y),
        }
    }
}

impl<'a, S: TiledSource + ?Sized> RandomIter for RandomIterFallback<'a, S> {
    fn window(&self) -> Region {
        self.lookup.window
    }

    fn num_bands(&self) -> usize {
        self.lookup.num_bands
    }

    fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        self.tile(x, y).get_sample(x, y, band)
    }

    fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32 {
        self.tile(x, y).get_sample_float(x, y, band)
    }

    fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        self.tile(x, y).get_sample_double(x, y, band)
    }
}

/// Read/write random access over any tiled source
pub struct WritableRandomIterFallback<'a, S: ?Sized> {
    source: &'a mut S,
    lookup: TileLookup,
}

impl<'a, S: TiledSourceMut + ?Sized> WritableRandomIterFallback<'a, S> {
    pub fn new(source: &'a mut S, window: Region) -> Self {
        let lookup = TileLookup::new(&*source, window, (0, 0), 0);
        WritableRandomIterFallback { source, lookup }
    }

    #[inline]
    fn tile(&self, x: i32, y: i32) -> &Raster {
        let (tx, ty) = self.lookup.tile_of(x, y);
        match self.source.tile(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(x, y),
        }
    }

    #[inline]
    fn tile_mut(&mut self, x: i32, y: i32) -> &mut Raster {
        let (tx, ty) = self.lookup.tile_of(x, y);
        match self.source.tile_mut(tx, ty) {
            Some(tile) => tile,
            None => missing_tile(x, y),
        }
    }
}

impl<'a, S: TiledSourceMut + ?Sized> RandomIter for WritableRandomIterFallback<'a, S> {
    fn window(&self) -> Region {
        self.lookup.window
    }

    fn num_bands(&self) -> usize {
        self.lookup.num_bands
    }

    fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        self.tile(x, y).get_sample(x, y, band)
    }

    fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32 {
        self.tile(x, y).get_sample_float(x, y, band)
    }

    fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        self.tile(x, y).get_sample_double(x, y, band)
    }
}

impl<'a, S: TiledSourceMut + ?Sized> WritableRandomIter for WritableRandomIterFallback<'a, S> {
    fn set_sample(&mut self, x: i32, y: i32, band: usize, value: i32) {
        self.tile_mut(x, y).set_sample(x, y, band, value);
    }

    fn set_sample_float(&mut self, x: i32, y: i32, band: usize, value: f32) {
        self.tile_mut(x, y).set_sample_float(x, y, band, value);
    }

    fn set_sample_double(&mut self, x: i32, y: i32, band: usize, value: f64) {
        self.tile_mut(x, y).set_sample_double(x, y, band, value);
    }
}

/// Read-only random access over a component layout of `T` elements
pub struct RandomIterCsm<'a, T: ComponentElement> {
    lookup: TileLookup,
    strides: ComponentStrides,
    x_offsets: Vec<isize>,
    y_offsets: Vec<isize>,
    /// Bank slices of every tile the window touches, indexed by `TileLookup::slot_of`
    tiles: Vec<Vec<&'a [T]>>,
}

impl<'a, T: ComponentElement> RandomIterCsm<'a, T> {
    pub fn new<S: TiledSource + ?Sized>(source: &'a S, window: Region) -> TileResult<Self> {
        let strides = ComponentStrides::of::<T, S>(source)?;
        let first = (source.x_to_tile_x(window.x), source.y_to_tile_y(window.y));
        let last = (source.x_to_tile_x(window.end_x() - 1), source.y_to_tile_y(window.end_y() - 1));
        let across = last.0 - first.0 + 1;

        let mut tiles = Vec::with_capacity((across * (last.1 - first.1 + 1)) as usize);
        for ty in first.1..=last.1 {
            for tx in first.0..=last.0 {
                let tile = match source.tile(tx, ty) {
                    Some(tile) => tile,
                    None => return invalid(format!("source has no tile ({}, {})", tx, ty)),
                };
                match T::banks(tile.buffer()) {
                    Some(banks) => tiles.push(banks.iter().map(|bank| bank.as_slice()).collect()),
                    None => return invalid(format!("tile ({}, {}) does not hold {} samples", tx, ty, T::DATA_TYPE)),
                }
            }
        }

        let lookup = TileLookup::new(source, window, first, across);
        let x_offsets = lookup.local_x.iter().map(|&lx| lx as isize * strides.pixel_stride).collect();
        let y_offsets = lookup.local_y.iter().map(|&ly| ly as isize * strides.scanline_stride).collect();
        Ok(RandomIterCsm { lookup, strides, x_offsets, y_offsets, tiles })
    }

    #[inline]
    fn element(&self, x: i32, y: i32, band: usize) -> T {
        let bank = self.tiles[self.lookup.slot_of(x, y)][self.strides.bank_indices[band]];
        let offset = self.y_offsets[self.lookup.row(y)] + self.x_offsets[self.lookup.column(x)];
        bank[(offset + self.strides.band_offsets[band]) as usize]
    }
}

impl<'a, T: ComponentElement> RandomIter for RandomIterCsm<'a, T> {
    fn window(&self) -> Region {
        self.lookup.window
    }

    fn num_bands(&self) -> usize {
        self.lookup.num_bands
    }

    #[inline]
    fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        self.element(x, y, band).to_i32()
    }

    #[inline]
    fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32 {
        self.element(x, y, band).to_f32()
    }

    #[inline]
    fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        self.element(x, y, band).to_f64()
    }
}

/// Read/write random access over a component layout of `T` elements
pub struct WritableRandomIterCsm<'a, T: ComponentElement> {
    lookup: TileLookup,
    strides: ComponentStrides,
    x_offsets: Vec<isize>,
    y_offsets: Vec<isize>,
    /// Bank slices of every tile of the source, row-major
    tiles: Vec<Vec<&'a mut [T]>>,
}

impl<'a, T: ComponentElement> WritableRandomIterCsm<'a, T> {
    pub fn new<S: TiledSourceMut + ?Sized>(source: &'a mut S, window: Region) -> TileResult<Self> {
        let strides = ComponentStrides::of::<T, S>(&*source)?;
        let base = (source.min_tile_x(), source.min_tile_y());
        let lookup = TileLookup::new(&*source, window, base, source.num_tiles_x());
        let x_offsets = lookup.local_x.iter().map(|&lx| lx as isize * strides.pixel_stride).collect();
        let y_offsets = lookup.local_y.iter().map(|&ly| ly as isize * strides.scanline_stride).collect();
        let tiles = all_tile_banks_mut(source)?;
        Ok(WritableRandomIterCsm { lookup, strides, x_offsets, y_offsets, tiles })
    }

    #[inline]
    fn index(&self, x: i32, y: i32, band: usize) -> (usize, usize, usize) {
        let offset = self.y_offsets[self.lookup.row(y)] + self.x_offsets[self.lookup.column(x)];
        (
            self.lookup.slot_of(x, y),
            self.strides.bank_indices[band],
            (offset + self.strides.band_offsets[band]) as usize,
        )
    }

    #[inline]
    fn element(&self, x: i32, y: i32, band: usize) -> T {
        let (slot, bank, i) = self.index(x, y, band);
        self.tiles[slot][bank][i]
    }

    #[inline]
    fn store(&mut self, x: i32, y: i32, band: usize, value: T) {
        let (slot, bank, i) = self.index(x, y, band);
        self.tiles[slot][bank][i] = value;
    }
}

impl<'a, T: ComponentElement> RandomIter for WritableRandomIterCsm<'a, T> {
    fn window(&self) -> Region {
        self.lookup.window
    }

    fn num_bands(&self) -> usize {
        self.lookup.num_bands
    }

    #[inline]
    fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        self.element(x, y, band).to_i32()
    }

    #[inline]
    fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32 {
        self.element(x, y, band).to_f32()
    }

    #[inline]
    fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        self.element(x, y, band).to_f64()
    }
}

impl<'a, T: ComponentElement> WritableRandomIter for WritableRandomIterCsm<'a, T> {
    #[inline]
    fn set_sample(&mut self, x: i32, y: i32, band: usize, value: i32) {
        self.store(x, y, band, T::from_i32(value));
    }

    #[inline]
    fn set_sample_float(&mut self, x: i32, y: i32, band: usize, value: f32) {
        self.store(x, y, band, T::from_f32(value));
    }

    #[inline]
    fn set_sample_double(&mut self, x: i32, y: i32, band: usize, value: f64) {
        self.store(x, y, band, T::from_f64(value));
    }
}

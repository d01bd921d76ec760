//! Sequential iterators specialized for component layouts
//!
//! These borrow the element slices of the current tile directly and keep the
//! element offset of the current pixel, so a sample read is one slice index.
//! Element conversions match [`DataBuffer`] exactly, which keeps them
//! interchangeable with the fallback iterators.

use crate::errors::{invalid, TileResult};
use crate::iterator::fallback::missing_tile;
use crate::iterator::walker::{traversal_impls, Cursor};
use crate::iterator::{SampleRead, SampleWrite};
use crate::raster::{ComponentLayout, DataBuffer, DataType, Raster, Region, TiledSource, TiledSourceMut};

/// Element types with a specialized component-layout iterator
pub trait ComponentElement: Copy + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    fn banks(buffer: &DataBuffer) -> Option<&[Vec<Self>]>;

    fn banks_mut(buffer: &mut DataBuffer) -> Option<&mut [Vec<Self>]>;

    fn to_i32(self) -> i32;

    fn to_f32(self) -> f32;

    fn to_f64(self) -> f64;

    fn from_i32(value: i32) -> Self;

    fn from_f32(value: f32) -> Self;

    fn from_f64(value: f64) -> Self;
}

impl ComponentElement for u8 {
    const DATA_TYPE: DataType = DataType::Byte;

    fn banks(buffer: &DataBuffer) -> Option<&[Vec<u8>]> {
        match buffer {
            DataBuffer::Byte(banks) => Some(banks),
            _ => None,
        }
    }

    fn banks_mut(buffer: &mut DataBuffer) -> Option<&mut [Vec<u8>]> {
        match buffer {
            DataBuffer::Byte(banks) => Some(banks),
            _ => None,
        }
    }

    #[inline]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_i32(value: i32) -> Self {
        value as u8
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value as i32 as u8
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as i32 as u8
    }
}

impl ComponentElement for f32 {
    const DATA_TYPE: DataType = DataType::Float;

    fn banks(buffer: &DataBuffer) -> Option<&[Vec<f32>]> {
        match buffer {
            DataBuffer::Float(banks) => Some(banks),
            _ => None,
        }
    }

    fn banks_mut(buffer: &mut DataBuffer) -> Option<&mut [Vec<f32>]> {
        match buffer {
            DataBuffer::Float(banks) => Some(banks),
            _ => None,
        }
    }

    #[inline]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_i32(value: i32) -> Self {
        value as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

/// Strides and band placement shared by every tile of a source
#[derive(Debug, Clone)]
pub(crate) struct ComponentStrides {
    pub(crate) pixel_stride: isize,
    pub(crate) scanline_stride: isize,
    pub(crate) bank_indices: Vec<usize>,
    pub(crate) band_offsets: Vec<isize>,
}

impl ComponentStrides {
    /// Strides of a source whose layout is a component layout of element type `T`
    pub(crate) fn of<T: ComponentElement, S: TiledSource + ?Sized>(source: &S) -> TileResult<Self> {
        let layout: &ComponentLayout = match source.sample_layout().as_component() {
            Some(layout) => layout,
            None => return invalid("specialized iterators need a component sample layout"),
        };
        if layout.data_type() != T::DATA_TYPE {
            return invalid(format!(
                "a {} iterator cannot walk {} samples",
                T::DATA_TYPE,
                layout.data_type()
            ));
        }
        Ok(ComponentStrides {
            pixel_stride: layout.pixel_stride() as isize,
            scanline_stride: layout.scanline_stride() as isize,
            bank_indices: layout.bank_indices().to_vec(),
            band_offsets: layout.band_offsets().iter().map(|&o| o as isize).collect(),
        })
    }

    /// Element offset of local pixel (x, y) before the band offset is added
    #[inline]
    pub(crate) fn pixel_offset(&self, x: i32, y: i32) -> isize {
        y as isize * self.scanline_stride + x as isize * self.pixel_stride
    }
}

/// Element slices of one tile, one per bank
fn tile_banks<T: ComponentElement>(tile: &Raster) -> TileResult<Vec<&[T]>> {
    match T::banks(tile.buffer()) {
        Some(banks) => Ok(banks.iter().map(|bank| bank.as_slice()).collect()),
        None => invalid(format!("tile at {:?} does not hold {} samples", tile.bounds(), T::DATA_TYPE)),
    }
}

/// Mutable element slices of every tile, row-major from the first tile
///
/// The source must list its whole grid; slots are found by position.
pub(crate) fn all_tile_banks_mut<'a, T: ComponentElement, S: TiledSourceMut + ?Sized>(
    source: &'a mut S,
) -> TileResult<Vec<Vec<&'a mut [T]>>> {
    let grid = (source.num_tiles_x() * source.num_tiles_y()) as usize;
    let tiles = source.tiles_mut();
    if tiles.len() != grid {
        return invalid(format!("source lists {} tiles, its grid has {}", tiles.len(), grid));
    }
    let mut out = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let bounds = tile.bounds();
        match T::banks_mut(tile.buffer_mut()) {
            Some(banks) => out.push(banks.iter_mut().map(|bank| bank.as_mut_slice()).collect()),
            None => return invalid(format!("tile at {:?} does not hold {} samples", bounds, T::DATA_TYPE)),
        }
    }
    Ok(out)
}

/// Read-only rect and rook iterator over a component layout of `T` elements
pub struct RectIterCsm<'a, S: ?Sized, T: ComponentElement> {
    source: &'a S,
    cursor: Cursor,
    strides: ComponentStrides,
    banks: Vec<&'a [T]>,
    offset: isize,
}

impl<'a, S: TiledSource + ?Sized, T: ComponentElement> RectIterCsm<'a, S, T> {
    /// Iterator positioned at the top-left corner of `window`
    ///
    /// Fails if the source layout is not a component layout of `T`.
    pub fn new(source: &'a S, window: Region) -> TileResult<Self> {
        let strides = ComponentStrides::of::<T, S>(source)?;
        let mut iter = RectIterCsm {
            source,
            cursor: Cursor::new(source, window),
            strides,
            banks: Vec::new(),
            offset: 0,
        };
        iter.load_tile()?;
        iter.moved();
        Ok(iter)
    }

    fn load_tile(&mut self) -> TileResult<()> {
        let (tx, ty) = (self.cursor.x.tile(), self.cursor.y.tile());
        match self.source.tile(tx, ty) {
            Some(tile) => {
                self.banks = tile_banks(tile)?;
                Ok(())
            }
            None => invalid(format!("source has no tile ({}, {})", tx, ty)),
        }
    }

    fn tile_changed(&mut self) {
        let (tx, ty) = (self.cursor.x.tile(), self.cursor.y.tile());
        match self.source.tile(tx, ty).map(tile_banks::<T>) {
            Some(Ok(banks)) => self.banks = banks,
            Some(Err(e)) => panic!("iterator moved to tile ({}, {}) it cannot read: {}", tx, ty, e),
            None => missing_tile(tx, ty),
        }
    }

    #[inline]
    fn moved(&mut self) {
        self.offset = self.strides.pixel_offset(self.cursor.x.local(), self.cursor.y.local());
    }

    #[inline]
    fn element(&self, band: usize) -> T {
        let bank = self.banks[self.strides.bank_indices[band]];
        bank[(self.offset + self.strides.band_offsets[band]) as usize]
    }
}

/// Read/write rect and rook iterator over a component layout of `T` elements
pub struct WritableRectIterCsm<'a, T: ComponentElement> {
    cursor: Cursor,
    strides: ComponentStrides,
    tiles: Vec<Vec<&'a mut [T]>>,
    min_tile_x: i32,
    min_tile_y: i32,
    tiles_across: i32,
    current: usize,
    offset: isize,
}

impl<'a, T: ComponentElement> WritableRectIterCsm<'a, T> {
    pub fn new<S: TiledSourceMut + ?Sized>(source: &'a mut S, window: Region) -> TileResult<Self> {
        let strides = ComponentStrides::of::<T, S>(&*source)?;
        let cursor = Cursor::new(&*source, window);
        let (min_tile_x, min_tile_y, tiles_across) = (source.min_tile_x(), source.min_tile_y(), source.num_tiles_x());
        let tiles = all_tile_banks_mut(source)?;

        let mut iter = WritableRectIterCsm {
            cursor,
            strides,
            tiles,
            min_tile_x,
            min_tile_y,
            tiles_across,
            current: 0,
            offset: 0,
        };
        iter.tile_changed();
        iter.moved();
        Ok(iter)
    }

    #[inline]
    fn tile_changed(&mut self) {
        let col = self.cursor.x.tile() - self.min_tile_x;
        let row = self.cursor.y.tile() - self.min_tile_y;
        self.current = (row * self.tiles_across + col) as usize;
    }

    #[inline]
    fn moved(&mut self) {
        self.offset = self.strides.pixel_offset(self.cursor.x.local(), self.cursor.y.local());
    }

    #[inline]
    fn index(&self, band: usize) -> (usize, usize) {
        (self.strides.bank_indices[band], (self.offset + self.strides.band_offsets[band]) as usize)
    }

    #[inline]
    fn element(&self, band: usize) -> T {
        let (bank, i) = self.index(band);
        self.tiles[self.current][bank][i]
    }

    #[inline]
    fn store(&mut self, band: usize, value: T) {
        let (bank, i) = self.index(band);
        self.tiles[self.current][bank][i] = value;
    }
}

traversal_impls!(['a, S: TiledSource + ?Sized, T: ComponentElement] RectIterCsm<'a, S, T>);
traversal_impls!(['a, T: ComponentElement] WritableRectIterCsm<'a, T>);

macro_rules! component_reads {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> SampleRead for $ty {
            fn num_bands(&self) -> usize {
                self.cursor.num_bands as usize
            }

            #[inline]
            fn get_sample(&self) -> i32 {
                self.element(self.cursor.band()).to_i32()
            }

            #[inline]
            fn get_sample_at(&self, band: usize) -> i32 {
                self.element(band).to_i32()
            }

            #[inline]
            fn get_sample_float(&self) -> f32 {
                self.element(self.cursor.band()).to_f32()
            }

            #[inline]
            fn get_sample_float_at(&self, band: usize) -> f32 {
                self.element(band).to_f32()
            }

            #[inline]
            fn get_sample_double(&self) -> f64 {
                self.element(self.cursor.band()).to_f64()
            }

            #[inline]
            fn get_sample_double_at(&self, band: usize) -> f64 {
                self.element(band).to_f64()
            }

            fn get_pixel(&self, out: &mut [i32]) {
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = self.element(band).to_i32();
                }
            }

            fn get_pixel_float(&self, out: &mut [f32]) {
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = self.element(band).to_f32();
                }
            }

            fn get_pixel_double(&self, out: &mut [f64]) {
                for (band, value) in out.iter_mut().enumerate().take(self.num_bands()) {
                    *value = self.element(band).to_f64();
                }
            }
        }
    };
}

component_reads!(['a, S: TiledSource + ?Sized, T: ComponentElement] RectIterCsm<'a, S, T>);
component_reads!(['a, T: ComponentElement] WritableRectIterCsm<'a, T>);

impl<'a, T: ComponentElement> SampleWrite for WritableRectIterCsm<'a, T> {
    #[inline]
    fn set_sample(&mut self, value: i32) {
        self.store(self.cursor.band(), T::from_i32(value));
    }

    #[inline]
    fn set_sample_at(&mut self, band: usize, value: i32) {
        self.store(band, T::from_i32(value));
    }

    #[inline]
    fn set_sample_float(&mut self, value: f32) {
        self.store(self.cursor.band(), T::from_f32(value));
    }

    #[inline]
    fn set_sample_float_at(&mut self, band: usize, value: f32) {
        self.store(band, T::from_f32(value));
    }

    #[inline]
    fn set_sample_double(&mut self, value: f64) {
        self.store(self.cursor.band(), T::from_f64(value));
    }

    #[inline]
    fn set_sample_double_at(&mut self, band: usize, value: f64) {
        self.store(band, T::from_f64(value));
    }

    fn set_pixel(&mut self, values: &[i32]) {
        let bands = self.cursor.num_bands as usize;
        for (band, &value) in values.iter().enumerate().take(bands) {
            self.store(band, T::from_i32(value));
        }
    }

    fn set_pixel_float(&mut self, values: &[f32]) {
        let bands = self.cursor.num_bands as usize;
        for (band, &value) in values.iter().enumerate().take(bands) {
            self.store(band, T::from_f32(value));
        }
    }

    fn set_pixel_double(&mut self, values: &[f64]) {
        let bands = self.cursor.num_bands as usize;
        for (band, &value) in values.iter().enumerate().take(bands) {
            self.store(band, T::from_f64(value));
        }
    }
}

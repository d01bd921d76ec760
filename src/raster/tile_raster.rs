//! Rasters: a sample layout, its buffer and a pixel origin

use crate::errors::{invalid, TileResult};
use super::data_buffer::DataBuffer;
use super::data_type::DataType;
use super::region::Region;
use super::sample_layout::{ComponentLayout, SampleLayout};

/// A rectangular grid of multi-band samples placed at an origin
///
/// The shape is fixed at construction. Per-sample accessors take absolute
/// pixel coordinates and panic when the pixel lies outside [`Raster::bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    min_x: i32,
    min_y: i32,
    layout: SampleLayout,
    buffer: DataBuffer,
}

impl Raster {
    /// Create a zero-filled raster for `layout` with its top-left pixel at (min_x, min_y)
    pub fn new(layout: SampleLayout, min_x: i32, min_y: i32) -> TileResult<Self> {
        let buffer = layout.create_buffer();
        Raster::from_parts(layout, buffer, min_x, min_y)
    }

    /// Pixel-interleaved raster covering `bounds`
    pub fn interleaved(data_type: DataType, bounds: Region, bands: usize) -> TileResult<Self> {
        if bounds.is_empty() {
            return invalid(format!("raster bounds {:?} are empty", bounds));
        }
        let layout = ComponentLayout::interleaved(
            data_type,
            bounds.width as usize,
            bounds.height as usize,
            bands,
        )?;
        Raster::new(layout.into(), bounds.x, bounds.y)
    }

    /// Assemble a raster from an existing buffer
    ///
    /// Fails if the buffer's element type or size does not fit the layout.
    pub fn from_parts(layout: SampleLayout, buffer: DataBuffer, min_x: i32, min_y: i32) -> TileResult<Self> {
        let too_wide = i32::try_from(layout.width()).map_or(true, |w| min_x.checked_add(w).is_none());
        let too_tall = i32::try_from(layout.height()).map_or(true, |h| min_y.checked_add(h).is_none());
        if too_wide || too_tall {
            return invalid(format!(
                "a {}x{} raster at ({}, {}) overflows pixel space",
                layout.width(),
                layout.height(),
                min_x,
                min_y
            ));
        }
        layout.check_buffer(&buffer)?;

        Ok(Raster { min_x, min_y, layout, buffer })
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn width(&self) -> i32 {
        self.layout.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.layout.height() as i32
    }

    pub fn bounds(&self) -> Region {
        Region::new(self.min_x, self.min_y, self.width(), self.height())
    }

    pub fn num_bands(&self) -> usize {
        self.layout.num_bands()
    }

    pub fn data_type(&self) -> DataType {
        self.layout.data_type()
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &DataBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut DataBuffer {
        &mut self.buffer
    }

    pub fn into_parts(self) -> (SampleLayout, DataBuffer) {
        (self.layout, self.buffer)
    }

    /// Same samples, moved to a new origin
    pub fn translated(self, min_x: i32, min_y: i32) -> TileResult<Self> {
        let Raster { layout, buffer, .. } = self;
        Raster::from_parts(layout, buffer, min_x, min_y)
    }

    #[inline]
    fn local(&self, x: i32, y: i32) -> (usize, usize) {
        debug_assert!(self.bounds().contains(x, y), "({}, {}) outside {:?}", x, y, self.bounds());
        ((x - self.min_x) as usize, (y - self.min_y) as usize)
    }

    pub fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        let (lx, ly) = self.local(x, y);
        self.layout.get_sample(lx, ly, band, &self.buffer)
    }

    pub fn get_sample_float(&self, x: i32, y: i32, band: usize) -> f32 {
        let (lx, ly) = self.local(x, y);
        self.layout.get_sample_float(lx, ly, band, &self.buffer)
    }

    pub fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        let (lx, ly) = self.local(x, y);
        self.layout.get_sample_double(lx, ly, band, &self.buffer)
    }

    pub fn set_sample(&mut self, x: i32, y: i32, band: usize, value: i32) {
        let (lx, ly) = self.local(x, y);
        self.layout.set_sample(lx, ly, band, value, &mut self.buffer);
    }

    pub fn set_sample_float(&mut self, x: i32, y: i32, band: usize, value: f32) {
        let (lx, ly) = self.local(x, y);
        self.layout.set_sample_float(lx, ly, band, value, &mut self.buffer);
    }

    pub fn set_sample_double(&mut self, x: i32, y: i32, band: usize, value: f64) {
        let (lx, ly) = self.local(x, y);
        self.layout.set_sample_double(lx, ly, band, value, &mut self.buffer);
    }

    /// All bands of one pixel
    pub fn get_pixel(&self, x: i32, y: i32) -> Vec<i32> {
        let (lx, ly) = self.local(x, y);
        let mut out = vec![0; self.num_bands()];
        self.layout.get_pixel(lx, ly, &mut out, &self.buffer);
        out
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, values: &[i32]) {
        let (lx, ly) = self.local(x, y);
        self.layout.set_pixel(lx, ly, values, &mut self.buffer);
    }

    /// Whether another raster has the same bounds, bands, type and sample values
    ///
    /// Layouts may differ; samples are compared as doubles.
    pub fn same_samples(&self, other: &Raster) -> bool {
        if self.bounds() != other.bounds()
            || self.num_bands() != other.num_bands()
            || self.data_type() != other.data_type()
        {
            return false;
        }
        let bounds = self.bounds();
        (bounds.y..bounds.end_y()).all(|y| {
            (bounds.x..bounds.end_x()).all(|x| {
                (0..self.num_bands()).all(|b| {
                    let (a, c) = (self.get_sample_double(x, y, b), other.get_sample_double(x, y, b));
                    a == c || (a.is_nan() && c.is_nan())
                })
            })
        })
    }
}

//! Sample layouts
//!
//! A sample layout describes how the bands of each pixel are placed in a
//! [`DataBuffer`]. Two families exist:
//!
//! - component layouts, where every band sample is its own element addressed
//!   through a pixel stride, a scanline stride and a per-band bank and offset
//!   (pixel-interleaved and banded storage are both component layouts), and
//! - packed layouts, where all bands of a pixel share one integer element and
//!   are separated by bit masks.
//!
//! All coordinates here are local to the layout, starting at (0, 0).

use std::fmt;

use crate::errors::{invalid, TileResult};
use super::data_buffer::DataBuffer;
use super::data_type::DataType;

/// Family a layout belongs to, used as the first half of a dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Component,
    Packed,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Component => f.write_str("component"),
            LayoutKind::Packed => f.write_str("packed"),
        }
    }
}

/// One element per band sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLayout {
    data_type: DataType,
    width: usize,
    height: usize,
    pixel_stride: usize,
    scanline_stride: usize,
    bank_indices: Vec<usize>,
    band_offsets: Vec<usize>,
}

impl ComponentLayout {
    /// Create a component layout
    ///
    /// # Arguments
    /// * `data_type` - Element type of every sample
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `pixel_stride` - Elements between two horizontally adjacent samples of a band
    /// * `scanline_stride` - Elements between two vertically adjacent samples of a band
    /// * `bank_indices` - Bank holding each band
    /// * `band_offsets` - Offset of each band's first sample within its bank
    pub fn new(
        data_type: DataType,
        width: usize,
        height: usize,
        pixel_stride: usize,
        scanline_stride: usize,
        bank_indices: Vec<usize>,
        band_offsets: Vec<usize>,
    ) -> TileResult<Self> {
        if width == 0 || height == 0 {
            return invalid(format!("layout size must be positive, got {}x{}", width, height));
        }
        if bank_indices.is_empty() {
            return invalid("a component layout needs at least one band");
        }
        if bank_indices.len() != band_offsets.len() {
            return invalid(format!(
                "{} bank indices but {} band offsets",
                bank_indices.len(),
                band_offsets.len()
            ));
        }
        if pixel_stride == 0 {
            return invalid("pixel stride must be positive");
        }
        let row = match width.checked_mul(pixel_stride) {
            Some(row) => row,
            None => return invalid(format!("a row of {} pixels with stride {} overflows", width, pixel_stride)),
        };
        if height > 1 && scanline_stride < row {
            return invalid(format!(
                "scanline stride {} is shorter than a row of {} pixels with stride {}",
                scanline_stride, width, pixel_stride
            ));
        }
        let last_pixel = (height - 1)
            .checked_mul(scanline_stride)
            .and_then(|y| (width - 1).checked_mul(pixel_stride).and_then(|x| x.checked_add(y)));
        let addressable = band_offsets
            .iter()
            .all(|&o| last_pixel.and_then(|p| p.checked_add(o)).and_then(|e| e.checked_add(1)).is_some());
        if !addressable {
            return invalid("layout addresses samples beyond the index range");
        }

        Ok(ComponentLayout {
            data_type,
            width,
            height,
            pixel_stride,
            scanline_stride,
            bank_indices,
            band_offsets,
        })
    }

    /// Pixel-interleaved layout in a single bank (band samples adjacent)
    pub fn interleaved(data_type: DataType, width: usize, height: usize, bands: usize) -> TileResult<Self> {
        ComponentLayout::new(
            data_type,
            width,
            height,
            bands,
            width * bands,
            vec![0; bands],
            (0..bands).collect(),
        )
    }

    /// Banded layout, one bank per band
    pub fn banded(data_type: DataType, width: usize, height: usize, bands: usize) -> TileResult<Self> {
        ComponentLayout::new(
            data_type,
            width,
            height,
            1,
            width,
            (0..bands).collect(),
            vec![0; bands],
        )
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_bands(&self) -> usize {
        self.bank_indices.len()
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    pub fn bank_indices(&self) -> &[usize] {
        &self.bank_indices
    }

    pub fn band_offsets(&self) -> &[usize] {
        &self.band_offsets
    }

    /// Whether this is the single-bank interleaved layout `interleaved` builds
    pub fn is_pixel_interleaved(&self) -> bool {
        let bands = self.num_bands();
        self.pixel_stride == bands
            && self.scanline_stride == self.width * bands
            && self.bank_indices.iter().all(|&b| b == 0)
            && self.band_offsets.iter().enumerate().all(|(i, &o)| o == i)
    }

    /// Element index of a sample inside its bank
    #[inline]
    pub fn offset(&self, x: usize, y: usize, band: usize) -> usize {
        y * self.scanline_stride + x * self.pixel_stride + self.band_offsets[band]
    }

    pub fn num_banks(&self) -> usize {
        self.bank_indices.iter().max().map_or(0, |&m| m + 1)
    }

    /// Elements a bank needs to hold every sample mapped to it
    pub fn bank_size(&self, bank: usize) -> usize {
        (0..self.num_bands())
            .filter(|&b| self.bank_indices[b] == bank)
            .map(|b| self.offset(self.width - 1, self.height - 1, b) + 1)
            .max()
            .unwrap_or(0)
    }

    fn resized(&self, width: usize, height: usize) -> TileResult<Self> {
        if self.band_offsets.iter().all(|&o| o < self.pixel_stride) {
            ComponentLayout::new(
                self.data_type,
                width,
                height,
                self.pixel_stride,
                width * self.pixel_stride,
                self.bank_indices.clone(),
                self.band_offsets.clone(),
            )
        } else {
            ComponentLayout::banded(self.data_type, width, height, self.num_bands())
        }
    }
}

/// All bands of a pixel packed into one integer element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLayout {
    data_type: DataType,
    width: usize,
    height: usize,
    scanline_stride: usize,
    bit_masks: Vec<u32>,
    bit_offsets: Vec<u32>,
}

impl PackedLayout {
    /// Create a packed layout
    ///
    /// Each mask must be a single contiguous run of bits that fits in the
    /// element type, which must be `Byte`, `UShort` or `Int`.
    pub fn new(
        data_type: DataType,
        width: usize,
        height: usize,
        scanline_stride: usize,
        bit_masks: Vec<u32>,
    ) -> TileResult<Self> {
        let element_bits = match data_type {
            DataType::Byte => 8,
            DataType::UShort => 16,
            DataType::Int => 32,
            other => return invalid(format!("packed layouts cannot hold {} samples", other)),
        };
        if width == 0 || height == 0 {
            return invalid(format!("layout size must be positive, got {}x{}", width, height));
        }
        if bit_masks.is_empty() {
            return invalid("a packed layout needs at least one band");
        }
        if height > 1 && scanline_stride < width {
            return invalid(format!("scanline stride {} is shorter than width {}", scanline_stride, width));
        }

        let mut bit_offsets = Vec::with_capacity(bit_masks.len());
        for &mask in &bit_masks {
            if mask == 0 {
                return invalid("packed band masks must be non-zero");
            }
            let shift = mask.trailing_zeros();
            let run = mask >> shift;
            if run & (run.wrapping_add(1)) != 0 {
                return invalid(format!("mask {:#x} is not a contiguous run of bits", mask));
            }
            if 32 - mask.leading_zeros() > element_bits {
                return invalid(format!("mask {:#x} does not fit a {}-bit element", mask, element_bits));
            }
            bit_offsets.push(shift);
        }

        Ok(PackedLayout {
            data_type,
            width,
            height,
            scanline_stride,
            bit_masks,
            bit_offsets,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_bands(&self) -> usize {
        self.bit_masks.len()
    }

    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    pub fn bit_masks(&self) -> &[u32] {
        &self.bit_masks
    }

    fn bank_size(&self) -> usize {
        (self.height - 1) * self.scanline_stride + self.width
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, band: usize, buffer: &DataBuffer) -> i32 {
        let word = buffer.get_elem(0, y * self.scanline_stride + x) as u32;
        ((word & self.bit_masks[band]) >> self.bit_offsets[band]) as i32
    }

    #[inline]
    fn set(&self, x: usize, y: usize, band: usize, value: i32, buffer: &mut DataBuffer) {
        let i = y * self.scanline_stride + x;
        let mask = self.bit_masks[band];
        let word = buffer.get_elem(0, i) as u32;
        let bits = ((value as u32) << self.bit_offsets[band]) & mask;
        buffer.set_elem(0, i, ((word & !mask) | bits) as i32);
    }
}

/// Layout of the samples of one raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleLayout {
    Component(ComponentLayout),
    Packed(PackedLayout),
}

impl SampleLayout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            SampleLayout::Component(_) => LayoutKind::Component,
            SampleLayout::Packed(_) => LayoutKind::Packed,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            SampleLayout::Component(c) => c.data_type(),
            SampleLayout::Packed(p) => p.data_type(),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            SampleLayout::Component(c) => c.width(),
            SampleLayout::Packed(p) => p.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            SampleLayout::Component(c) => c.height(),
            SampleLayout::Packed(p) => p.height(),
        }
    }

    pub fn num_bands(&self) -> usize {
        match self {
            SampleLayout::Component(c) => c.num_bands(),
            SampleLayout::Packed(p) => p.num_bands(),
        }
    }

    pub fn as_component(&self) -> Option<&ComponentLayout> {
        match self {
            SampleLayout::Component(c) => Some(c),
            SampleLayout::Packed(_) => None,
        }
    }

    /// Same layout family and band mapping at a different size
    pub fn with_size(&self, width: usize, height: usize) -> TileResult<SampleLayout> {
        match self {
            SampleLayout::Component(c) => Ok(SampleLayout::Component(c.resized(width, height)?)),
            SampleLayout::Packed(p) => Ok(SampleLayout::Packed(PackedLayout::new(
                p.data_type,
                width,
                height,
                width,
                p.bit_masks.clone(),
            )?)),
        }
    }

    /// Bank sizes a buffer needs for this layout
    pub fn bank_sizes(&self) -> Vec<usize> {
        match self {
            SampleLayout::Component(c) => (0..c.num_banks()).map(|b| c.bank_size(b)).collect(),
            SampleLayout::Packed(p) => vec![p.bank_size()],
        }
    }

    /// Allocate a zero-filled buffer that fits this layout
    pub fn create_buffer(&self) -> DataBuffer {
        let sizes = self.bank_sizes();
        let largest = sizes.iter().copied().max().unwrap_or(0);
        let mut buffer = DataBuffer::new(self.data_type(), largest, sizes.len());
        trim_banks(&mut buffer, &sizes);
        buffer
    }

    /// Check that a buffer has the right element type and enough elements
    pub fn check_buffer(&self, buffer: &DataBuffer) -> TileResult<()> {
        if buffer.data_type() != self.data_type() {
            return invalid(format!(
                "buffer holds {} elements but the layout expects {}",
                buffer.data_type(),
                self.data_type()
            ));
        }
        let sizes = self.bank_sizes();
        if buffer.num_banks() < sizes.len() {
            return invalid(format!(
                "buffer has {} banks but the layout needs {}",
                buffer.num_banks(),
                sizes.len()
            ));
        }
        for (bank, &needed) in sizes.iter().enumerate() {
            if buffer.bank_len(bank) < needed {
                return invalid(format!(
                    "bank {} holds {} elements but the layout needs {}",
                    bank,
                    buffer.bank_len(bank),
                    needed
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn get_sample(&self, x: usize, y: usize, band: usize, buffer: &DataBuffer) -> i32 {
        match self {
            SampleLayout::Component(c) => buffer.get_elem(c.bank_indices[band], c.offset(x, y, band)),
            SampleLayout::Packed(p) => p.sample(x, y, band, buffer),
        }
    }

    #[inline]
    pub fn get_sample_float(&self, x: usize, y: usize, band: usize, buffer: &DataBuffer) -> f32 {
        match self {
            SampleLayout::Component(c) => buffer.get_elem_float(c.bank_indices[band], c.offset(x, y, band)),
            SampleLayout::Packed(p) => p.sample(x, y, band, buffer) as f32,
        }
    }

    #[inline]
    pub fn get_sample_double(&self, x: usize, y: usize, band: usize, buffer: &DataBuffer) -> f64 {
        match self {
            SampleLayout::Component(c) => buffer.get_elem_double(c.bank_indices[band], c.offset(x, y, band)),
            SampleLayout::Packed(p) => p.sample(x, y, band, buffer) as f64,
        }
    }

    #[inline]
    pub fn set_sample(&self, x: usize, y: usize, band: usize, value: i32, buffer: &mut DataBuffer) {
        match self {
            SampleLayout::Component(c) => buffer.set_elem(c.bank_indices[band], c.offset(x, y, band), value),
            SampleLayout::Packed(p) => p.set(x, y, band, value, buffer),
        }
    }

    #[inline]
    pub fn set_sample_float(&self, x: usize, y: usize, band: usize, value: f32, buffer: &mut DataBuffer) {
        match self {
            SampleLayout::Component(c) => buffer.set_elem_float(c.bank_indices[band], c.offset(x, y, band), value),
            SampleLayout::Packed(p) => p.set(x, y, band, value as i32, buffer),
        }
    }

    #[inline]
    pub fn set_sample_double(&self, x: usize, y: usize, band: usize, value: f64, buffer: &mut DataBuffer) {
        match self {
            SampleLayout::Component(c) => buffer.set_elem_double(c.bank_indices[band], c.offset(x, y, band), value),
            SampleLayout::Packed(p) => p.set(x, y, band, value as i32, buffer),
        }
    }

    /// Read every band of one pixel; `out` must hold at least `num_bands` values
    pub fn get_pixel(&self, x: usize, y: usize, out: &mut [i32], buffer: &DataBuffer) {
        for (band, slot) in out.iter_mut().take(self.num_bands()).enumerate() {
            *slot = self.get_sample(x, y, band, buffer);
        }
    }

    pub fn get_pixel_float(&self, x: usize, y: usize, out: &mut [f32], buffer: &DataBuffer) {
        for (band, slot) in out.iter_mut().take(self.num_bands()).enumerate() {
            *slot = self.get_sample_float(x, y, band, buffer);
        }
    }

    pub fn get_pixel_double(&self, x: usize, y: usize, out: &mut [f64], buffer: &DataBuffer) {
        for (band, slot) in out.iter_mut().take(self.num_bands()).enumerate() {
            *slot = self.get_sample_double(x, y, band, buffer);
        }
    }

    pub fn set_pixel(&self, x: usize, y: usize, values: &[i32], buffer: &mut DataBuffer) {
        for (band, &value) in values.iter().take(self.num_bands()).enumerate() {
            self.set_sample(x, y, band, value, buffer);
        }
    }

    pub fn set_pixel_float(&self, x: usize, y: usize, values: &[f32], buffer: &mut DataBuffer) {
        for (band, &value) in values.iter().take(self.num_bands()).enumerate() {
            self.set_sample_float(x, y, band, value, buffer);
        }
    }

    pub fn set_pixel_double(&self, x: usize, y: usize, values: &[f64], buffer: &mut DataBuffer) {
        for (band, &value) in values.iter().take(self.num_bands()).enumerate() {
            self.set_sample_double(x, y, band, value, buffer);
        }
    }
}

impl From<ComponentLayout> for SampleLayout {
    fn from(layout: ComponentLayout) -> Self {
        SampleLayout::Component(layout)
    }
}

impl From<PackedLayout> for SampleLayout {
    fn from(layout: PackedLayout) -> Self {
        SampleLayout::Packed(layout)
    }
}

fn trim_banks(buffer: &mut DataBuffer, sizes: &[usize]) {
    macro_rules! trim {
        ($banks:expr) => {
            for (bank, &size) in $banks.iter_mut().zip(sizes) {
                bank.truncate(size);
            }
        };
    }
    match buffer {
        DataBuffer::Byte(banks) => trim!(banks),
        DataBuffer::UShort(banks) => trim!(banks),
        DataBuffer::Short(banks) => trim!(banks),
        DataBuffer::Int(banks) => trim!(banks),
        DataBuffer::Float(banks) => trim!(banks),
        DataBuffer::Double(banks) => trim!(banks),
    }
}

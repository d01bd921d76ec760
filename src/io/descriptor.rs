//! Sample layout descriptors
//!
//! Every tile stream carries a descriptor of the layout its samples were
//! stored in, so a decoder can rebuild a raster with exactly that layout.
//! All fields are big-endian:
//!
//! ```text
//! magic     4 bytes  "SLD1"
//! kind      u8       0 = component, 1 = packed
//! type      u8       DataType::code
//! width     u32
//! height    u32
//! component: pixel_stride u32, scanline_stride u32, bands u16,
//!            then per band: bank u32, offset u32
//! packed:    scanline_stride u32, bands u16, then per band: mask u32
//! ```

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::errors::{TileError, TileResult};
use crate::io::unrecognized;
use crate::raster::{ComponentLayout, DataType, PackedLayout, SampleLayout};

pub const DESCRIPTOR_MAGIC: &[u8; 4] = b"SLD1";

const KIND_COMPONENT: u8 = 0;
const KIND_PACKED: u8 = 1;

/// Upper bound on bands a descriptor may declare
const MAX_BANDS: u16 = 1024;

/// Upper bound on the elements of one bank a descriptor may describe
pub const MAX_BANK_ELEMENTS: usize = 1 << 28;

fn checked_u32(value: usize, what: &str) -> TileResult<u32> {
    u32::try_from(value).map_err(|_| TileError::InvalidArgument(format!("{} {} does not fit a descriptor", what, value)))
}

fn band_count(bands: usize) -> TileResult<u16> {
    if bands > MAX_BANDS as usize {
        return Err(TileError::InvalidArgument(format!("{} bands exceed the descriptor limit of {}", bands, MAX_BANDS)));
    }
    Ok(bands as u16)
}

/// Size of the first bank of `layout` over [`MAX_BANK_ELEMENTS`]
fn oversized_bank(layout: &SampleLayout) -> Option<usize> {
    layout.bank_sizes().into_iter().find(|&size| size > MAX_BANK_ELEMENTS)
}

/// Write the descriptor of `layout`
pub fn write_layout(writer: &mut dyn Write, layout: &SampleLayout) -> TileResult<()> {
    if let Some(size) = oversized_bank(layout) {
        return Err(TileError::InvalidArgument(format!(
            "bank of {} elements exceeds the descriptor limit of {}",
            size, MAX_BANK_ELEMENTS
        )));
    }
    writer.write_all(DESCRIPTOR_MAGIC)?;
    match layout {
        SampleLayout::Component(c) => {
            writer.write_u8(KIND_COMPONENT)?;
            writer.write_u8(c.data_type().code())?;
            writer.write_u32::<BigEndian>(checked_u32(c.width(), "width")?)?;
            writer.write_u32::<BigEndian>(checked_u32(c.height(), "height")?)?;
            writer.write_u32::<BigEndian>(checked_u32(c.pixel_stride(), "pixel stride")?)?;
            writer.write_u32::<BigEndian>(checked_u32(c.scanline_stride(), "scanline stride")?)?;
            writer.write_u16::<BigEndian>(band_count(c.num_bands())?)?;
            for (&bank, &offset) in c.bank_indices().iter().zip(c.band_offsets()) {
                writer.write_u32::<BigEndian>(checked_u32(bank, "bank index")?)?;
                writer.write_u32::<BigEndian>(checked_u32(offset, "band offset")?)?;
            }
        }
        SampleLayout::Packed(p) => {
            writer.write_u8(KIND_PACKED)?;
            writer.write_u8(p.data_type().code())?;
            writer.write_u32::<BigEndian>(checked_u32(p.width(), "width")?)?;
            writer.write_u32::<BigEndian>(checked_u32(p.height(), "height")?)?;
            writer.write_u32::<BigEndian>(checked_u32(p.scanline_stride(), "scanline stride")?)?;
            writer.write_u16::<BigEndian>(band_count(p.num_bands())?)?;
            for &mask in p.bit_masks() {
                writer.write_u32::<BigEndian>(mask)?;
            }
        }
    }
    Ok(())
}

/// Read a descriptor written by [`write_layout`]
///
/// A wrong magic, unknown codes, truncated input, a layout that fails
/// validation or one needing a bank over [`MAX_BANK_ELEMENTS`] are reported
/// as [`TileError::Deserialization`].
pub fn read_layout(reader: &mut dyn Read) -> TileResult<SampleLayout> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(unrecognized)?;
    if &magic != DESCRIPTOR_MAGIC {
        return Err(TileError::Deserialization(format!(
            "expected a layout descriptor, found bytes {:02X?}",
            magic
        )));
    }

    let kind = reader.read_u8().map_err(unrecognized)?;
    let code = reader.read_u8().map_err(unrecognized)?;
    let data_type = DataType::from_code(code)
        .ok_or_else(|| TileError::Deserialization(format!("unknown data type code {}", code)))?;
    let width = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;
    let height = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;

    let layout = match kind {
        KIND_COMPONENT => {
            let pixel_stride = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;
            let scanline_stride = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;
            let bands = read_band_count(reader)?;
            let mut bank_indices = Vec::with_capacity(bands);
            let mut band_offsets = Vec::with_capacity(bands);
            for _ in 0..bands {
                bank_indices.push(reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize);
                band_offsets.push(reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize);
            }
            ComponentLayout::new(data_type, width, height, pixel_stride, scanline_stride, bank_indices, band_offsets)
                .map(SampleLayout::from)
        }
        KIND_PACKED => {
            let scanline_stride = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;
            let bands = read_band_count(reader)?;
            let mut masks = Vec::with_capacity(bands);
            for _ in 0..bands {
                masks.push(reader.read_u32::<BigEndian>().map_err(unrecognized)?);
            }
            PackedLayout::new(data_type, width, height, scanline_stride, masks).map(SampleLayout::from)
        }
        other => return Err(TileError::Deserialization(format!("unknown layout kind {}", other))),
    };

    let layout = layout.map_err(|e| TileError::Deserialization(format!("descriptor holds an invalid layout: {}", e)))?;
    if let Some(size) = oversized_bank(&layout) {
        return Err(TileError::Deserialization(format!(
            "descriptor needs a bank of {} elements, over the limit of {}",
            size, MAX_BANK_ELEMENTS
        )));
    }
    Ok(layout)
}

fn read_band_count(reader: &mut dyn Read) -> TileResult<usize> {
    let bands = reader.read_u16::<BigEndian>().map_err(unrecognized)?;
    if bands == 0 || bands > MAX_BANDS {
        return Err(TileError::Deserialization(format!("implausible band count {}", bands)));
    }
    Ok(bands as usize)
}

/// Write a raster origin as two big-endian i32 values
pub fn write_origin(writer: &mut dyn Write, min_x: i32, min_y: i32) -> TileResult<()> {
    writer.write_i32::<BigEndian>(min_x)?;
    writer.write_i32::<BigEndian>(min_y)?;
    Ok(())
}

pub fn read_origin(reader: &mut dyn Read) -> TileResult<(i32, i32)> {
    let min_x = reader.read_i32::<BigEndian>().map_err(unrecognized)?;
    let min_y = reader.read_i32::<BigEndian>().map_err(unrecognized)?;
    Ok((min_x, min_y))
}

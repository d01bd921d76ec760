//! Sample buffer serialization
//!
//! ```text
//! type   u8    DataType::code
//! banks  u16
//! per bank: length u32, then `length` big-endian elements
//! ```

use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::errors::{TileError, TileResult};
use crate::io::unrecognized;
use crate::raster::{DataBuffer, DataType, SampleLayout};

fn write_bank_header(writer: &mut dyn Write, len: usize) -> TileResult<()> {
    let len = u32::try_from(len)
        .map_err(|_| TileError::InvalidArgument(format!("bank of {} elements is too large to serialize", len)))?;
    writer.write_u32::<BigEndian>(len)?;
    Ok(())
}

/// Write every bank of `buffer`
pub fn write_buffer(writer: &mut dyn Write, buffer: &DataBuffer) -> TileResult<()> {
    writer.write_u8(buffer.data_type().code())?;
    writer.write_u16::<BigEndian>(buffer.num_banks() as u16)?;

    match buffer {
        DataBuffer::Byte(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                writer.write_all(bank)?;
            }
        }
        DataBuffer::UShort(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                let mut bytes = vec![0u8; bank.len() * 2];
                BigEndian::write_u16_into(bank, &mut bytes);
                writer.write_all(&bytes)?;
            }
        }
        DataBuffer::Short(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                let mut bytes = vec![0u8; bank.len() * 2];
                BigEndian::write_i16_into(bank, &mut bytes);
                writer.write_all(&bytes)?;
            }
        }
        DataBuffer::Int(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                let mut bytes = vec![0u8; bank.len() * 4];
                BigEndian::write_i32_into(bank, &mut bytes);
                writer.write_all(&bytes)?;
            }
        }
        DataBuffer::Float(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                let mut bytes = vec![0u8; bank.len() * 4];
                BigEndian::write_f32_into(bank, &mut bytes);
                writer.write_all(&bytes)?;
            }
        }
        DataBuffer::Double(banks) => {
            for bank in banks {
                write_bank_header(writer, bank.len())?;
                let mut bytes = vec![0u8; bank.len() * 8];
                BigEndian::write_f64_into(bank, &mut bytes);
                writer.write_all(&bytes)?;
            }
        }
    }
    Ok(())
}

/// Read a buffer for `layout`
///
/// The element type and bank sizes must be exactly what `layout` needs;
/// anything else, including a bank the stream ends inside, is a
/// [`TileError::Deserialization`].
pub fn read_buffer(reader: &mut dyn Read, layout: &SampleLayout) -> TileResult<DataBuffer> {
    let code = reader.read_u8().map_err(unrecognized)?;
    let data_type = DataType::from_code(code)
        .ok_or_else(|| TileError::Deserialization(format!("unknown buffer type code {}", code)))?;
    if data_type != layout.data_type() {
        return Err(TileError::Deserialization(format!(
            "buffer holds {} elements but the layout needs {}",
            data_type,
            layout.data_type()
        )));
    }

    let expected = layout.bank_sizes();
    let banks = reader.read_u16::<BigEndian>().map_err(unrecognized)? as usize;
    if banks != expected.len() {
        return Err(TileError::Deserialization(format!(
            "buffer has {} banks but the layout needs {}",
            banks,
            expected.len()
        )));
    }

    let mut buffer = DataBuffer::new(data_type, 0, 0);
    for (bank, &size) in expected.iter().enumerate() {
        let len = reader.read_u32::<BigEndian>().map_err(unrecognized)? as usize;
        if len != size {
            return Err(TileError::Deserialization(format!(
                "bank {} holds {} elements, expected {}",
                bank, len, size
            )));
        }
        read_bank(reader, &mut buffer, len)?;
    }
    Ok(buffer)
}

/// Read exactly `count` elements of `size` bytes
///
/// The bytes are pulled through a bounded reader, so a declared length the
/// stream cannot back never turns into an allocation of that size.
fn read_elements(reader: &mut dyn Read, count: usize, size: usize) -> TileResult<Vec<u8>> {
    let wanted = count
        .checked_mul(size)
        .ok_or_else(|| TileError::Deserialization(format!("bank of {} elements is implausibly large", count)))?;
    let mut bytes = Vec::new();
    reader.take(wanted as u64).read_to_end(&mut bytes).map_err(unrecognized)?;
    if bytes.len() != wanted {
        return Err(TileError::Deserialization(format!(
            "bank ends after {} of {} bytes",
            bytes.len(),
            wanted
        )));
    }
    Ok(bytes)
}

fn read_bank(reader: &mut dyn Read, buffer: &mut DataBuffer, len: usize) -> TileResult<()> {
    let bytes = read_elements(reader, len, buffer.data_type().size())?;
    match buffer {
        DataBuffer::Byte(banks) => banks.push(bytes),
        DataBuffer::UShort(banks) => {
            let mut bank = vec![0u16; len];
            BigEndian::read_u16_into(&bytes, &mut bank);
            banks.push(bank);
        }
        DataBuffer::Short(banks) => {
            let mut bank = vec![0i16; len];
            BigEndian::read_i16_into(&bytes, &mut bank);
            banks.push(bank);
        }
        DataBuffer::Int(banks) => {
            let mut bank = vec![0i32; len];
            BigEndian::read_i32_into(&bytes, &mut bank);
            banks.push(bank);
        }
        DataBuffer::Float(banks) => {
            let mut bank = vec![0f32; len];
            BigEndian::read_f32_into(&bytes, &mut bank);
            banks.push(bank);
        }
        DataBuffer::Double(banks) => {
            let mut bank = vec![0f64; len];
            BigEndian::read_f64_into(&bytes, &mut bank);
            banks.push(bank);
        }
    }
    Ok(())
}

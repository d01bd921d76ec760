//! Stream primitives for tile serialization
//!
//! Layout descriptors, pixel origins and sample buffers, all big-endian
//! through `byteorder`. Codecs compose these into their stream formats.

pub mod descriptor;
pub mod samples;
#[cfg(test)]
mod tests;

use std::io;

use crate::errors::TileError;

pub use descriptor::{read_layout, read_origin, write_layout, write_origin, DESCRIPTOR_MAGIC, MAX_BANK_ELEMENTS};
pub use samples::{read_buffer, write_buffer};

/// Map a read failure inside a serialized object
///
/// Running out of input means the object was not a complete serialized
/// object, which is a deserialization failure rather than an I/O one.
pub(crate) fn unrecognized(error: io::Error) -> TileError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        TileError::Deserialization("stream ended inside a serialized object".to_string())
    } else {
        TileError::IoError(error)
    }
}

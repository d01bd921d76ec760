//! Tile codecs
//!
//! A codec turns one [`Raster`](crate::raster::Raster) into a
//! self-contained byte stream and back. `raw`, `gzip` and `zstd` are
//! lossless and bit-exact; `jpeg` is lossy and also recovers the
//! parameters a tile was encoded with.
//!
//! ```no_run
//! use tilekit::codec::{create_decoder, create_encoder};
//! use tilekit::raster::{DataType, Raster, Region};
//!
//! let tile = Raster::interleaved(DataType::Byte, Region::new(0, 0, 64, 64), 3).unwrap();
//! let bytes = create_encoder("gzip", Vec::new(), None).unwrap().encode(&tile).unwrap();
//! let decoded = create_decoder("gzip", &bytes[..]).unwrap().decode().unwrap();
//! assert_eq!(decoded.unwrap().raster, tile);
//! ```

mod gzip;
mod handler;
pub mod jpeg;
pub mod params;
mod raw;
mod registry;
mod zstd;
#[cfg(test)]
mod tests;

pub use self::gzip::GzipCodec;
pub use self::handler::{DecodedTile, TileCodec};
pub use self::jpeg::JpegCodec;
pub use self::params::{CodecParams, JpegParams, JPEG_MAX_BANDS, SUBSAMPLING_FACTORS};
pub use self::raw::RawCodec;
pub use self::registry::{
    create_decoder, create_encoder, default_registry, get_capability, CodecRegistry, TileDecoder, TileEncoder,
};
pub use self::zstd::ZstdCodec;

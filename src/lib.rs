//! Pixel iteration over tiled rasters and self-describing tile codecs
//!
//! - [`raster`]: element types, sample layouts, rasters and tiled images
//! - [`iterator`]: sequential, bidirectional and random-access pixel iterators
//! - [`codec`]: raw, gzip, zstd and jpeg tile streams
//! - [`capability`]: codec parameter domains and negotiation

pub mod errors;
pub mod io;
pub mod raster;
pub mod iterator;
pub mod codec;
pub mod capability;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::TileKit;
pub use crate::errors::{TileError, TileResult};

pub use raster::{DataType, Raster, Region, SampleLayout, TiledImage, TiledSource, TiledSourceMut};
pub use codec::{create_decoder, create_encoder, get_capability, CodecParams, DecodedTile};
pub use iterator::{random_iter, rect_iter, rook_iter, writable_random_iter, writable_rect_iter, writable_rook_iter};

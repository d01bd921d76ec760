//! Raster model
//!
//! Element types, typed sample buffers, sample layouts, rasters and tiled
//! images. This is the data the iterators walk and the codecs serialize.

mod data_buffer;
mod data_type;
mod region;
mod sample_layout;
mod tile_raster;
mod tiled;
#[cfg(test)]
mod tests;

pub use data_buffer::DataBuffer;
pub use data_type::DataType;
pub use region::Region;
pub use sample_layout::{ComponentLayout, LayoutKind, PackedLayout, SampleLayout};
pub use tile_raster::Raster;
pub use tiled::{pos_to_tile, TiledImage, TiledSource, TiledSourceMut};

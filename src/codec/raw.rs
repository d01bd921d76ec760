//! Uncompressed tile streams
//!
//! A tile is its layout descriptor, its origin and its sample buffer, in
//! that order. The compressed formats wrap exactly these bytes.

use std::io::{Read, Write};

use log::debug;

use crate::capability::{CapabilityDescriptor, CodecRole};
use crate::codec::handler::{DecodedTile, TileCodec};
use crate::codec::params::CodecParams;
use crate::errors::{invalid, TileError, TileResult};
use crate::io::{read_buffer, read_layout, read_origin, write_buffer, write_layout, write_origin};
use crate::raster::Raster;

/// Serialize a raster as descriptor, origin and buffer
pub(crate) fn write_raster(sink: &mut dyn Write, raster: &Raster) -> TileResult<()> {
    write_layout(sink, raster.layout())?;
    write_origin(sink, raster.min_x(), raster.min_y())?;
    write_buffer(sink, raster.buffer())
}

/// Read a raster written by [`write_raster`]
pub(crate) fn read_raster(source: &mut dyn Read) -> TileResult<Raster> {
    let layout = read_layout(source)?;
    let (min_x, min_y) = read_origin(source)?;
    let buffer = read_buffer(source, &layout)?;
    Raster::from_parts(layout, buffer, min_x, min_y)
        .map_err(|e| TileError::Deserialization(format!("stream holds an invalid raster: {}", e)))
}

/// Check that `params` belong to `codec` and lie inside its encoder capability
pub(crate) fn check_params(codec: &dyn TileCodec, params: &CodecParams) -> TileResult<()> {
    if params.format() != codec.name() {
        return invalid(format!("{} parameters given to the {} codec", params.format(), codec.name()));
    }
    codec.capability(CodecRole::Encoder).check_values(&params.to_values())
}

/// Uncompressed codec
pub struct RawCodec;

impl TileCodec for RawCodec {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn encode(&self, tile: &Raster, params: &CodecParams, sink: &mut dyn Write) -> TileResult<()> {
        check_params(self, params)?;
        debug!("Writing raw {}x{} tile at ({}, {})", tile.width(), tile.height(), tile.min_x(), tile.min_y());
        write_raster(sink, tile)
    }

    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile> {
        let raster = read_raster(source)?;
        debug!("Read raw {}x{} tile at ({}, {})", raster.width(), raster.height(), raster.min_x(), raster.min_y());
        Ok(DecodedTile {
            raster,
            params: CodecParams::Raw,
        })
    }

    fn capability(&self, role: CodecRole) -> CapabilityDescriptor {
        CapabilityDescriptor::builtin(self.name(), role, Vec::new())
    }

    fn default_params(&self) -> CodecParams {
        CodecParams::Raw
    }
}

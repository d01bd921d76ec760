//! Tile codec trait definition

use std::io::{Read, Write};

use crate::capability::{CapabilityDescriptor, CodecRole};
use crate::codec::params::CodecParams;
use crate::errors::TileResult;
use crate::raster::Raster;

/// A decoded tile and the parameters it was encoded with
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTile {
    pub raster: Raster,
    pub params: CodecParams,
}

/// Strategy trait for one tile stream format
pub trait TileCodec: Send + Sync {
    /// Registry name, lower case
    fn name(&self) -> &'static str;

    /// Serialize `tile` to `sink`
    ///
    /// Parameters and tile shape are checked before anything is written.
    fn encode(&self, tile: &Raster, params: &CodecParams, sink: &mut dyn Write) -> TileResult<()>;

    /// Read one tile back
    ///
    /// Content that is not a stream of this format is reported as
    /// [`TileError::Deserialization`](crate::errors::TileError::Deserialization).
    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile>;

    /// Parameters this codec understands in `role`
    fn capability(&self, role: CodecRole) -> CapabilityDescriptor;

    fn default_params(&self) -> CodecParams;
}

//! DEFLATE-compressed tile streams

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;

use crate::capability::{CapabilityDescriptor, CodecRole, ParamDomain, ParamSpec, ParamValue};
use crate::codec::handler::{DecodedTile, TileCodec};
use crate::codec::params::{CodecParams, LEVEL};
use crate::codec::raw::{check_params, read_raster, write_raster};
use crate::config::codec_defaults;
use crate::errors::{TileError, TileResult};
use crate::raster::Raster;

/// Raw tile bytes inside a gzip member
pub struct GzipCodec;

impl TileCodec for GzipCodec {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn encode(&self, tile: &Raster, params: &CodecParams, sink: &mut dyn Write) -> TileResult<()> {
        check_params(self, params)?;
        let level = match params {
            CodecParams::Gzip { level } => *level,
            _ => codec_defaults().gzip_level,
        };

        debug!("Deflating {}x{} tile at level {}", tile.width(), tile.height(), level);
        let mut encoder = GzEncoder::new(sink, Compression::new(level));
        write_raster(&mut encoder, tile)?;
        encoder.finish()?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile> {
        let mut compressed = Vec::new();
        source.read_to_end(&mut compressed)?;

        let mut inflated = Vec::new();
        GzDecoder::new(&compressed[..])
            .read_to_end(&mut inflated)
            .map_err(|e| TileError::Deserialization(format!("not a gzip tile stream: {}", e)))?;
        debug!("Inflated {} bytes to {}", compressed.len(), inflated.len());

        // The stream does not record the level it was written with
        Ok(DecodedTile {
            raster: read_raster(&mut &inflated[..])?,
            params: self.default_params(),
        })
    }

    fn capability(&self, role: CodecRole) -> CapabilityDescriptor {
        if role == CodecRole::Decoder {
            return CapabilityDescriptor::builtin(self.name(), role, Vec::new());
        }
        CapabilityDescriptor::builtin(
            self.name(),
            role,
            vec![ParamSpec::new(
                LEVEL,
                ParamDomain::IntRange { min: 0, max: 9 },
                ParamValue::Int(codec_defaults().gzip_level as i64),
            )],
        )
    }

    fn default_params(&self) -> CodecParams {
        CodecParams::Gzip {
            level: codec_defaults().gzip_level,
        }
    }
}

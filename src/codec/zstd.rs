//! zstd-compressed tile streams

use std::io::{Read, Write};

use log::{debug, warn};

use crate::capability::{CapabilityDescriptor, CodecRole, ParamDomain, ParamSpec, ParamValue};
use crate::codec::handler::{DecodedTile, TileCodec};
use crate::codec::params::{CodecParams, LEVEL};
use crate::codec::raw::{check_params, read_raster, write_raster};
use crate::config::codec_defaults;
use crate::errors::{TileError, TileResult};
use crate::raster::Raster;

/// Raw tile bytes inside a zstd frame
pub struct ZstdCodec;

impl TileCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn encode(&self, tile: &Raster, params: &CodecParams, sink: &mut dyn Write) -> TileResult<()> {
        check_params(self, params)?;
        let level = match params {
            CodecParams::Zstd { level } => *level,
            _ => codec_defaults().zstd_level,
        };

        debug!("ZSTD compressing {}x{} tile with level {}", tile.width(), tile.height(), level);
        let mut encoder = zstd::stream::write::Encoder::new(sink, level)?;
        write_raster(&mut encoder, tile)?;
        encoder.finish()?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile> {
        let mut compressed = Vec::new();
        source.read_to_end(&mut compressed)?;

        let decompressed = match zstd::decode_all(&compressed[..]) {
            Ok(data) => data,
            Err(e) => {
                warn!("ZSTD decompression error: {}", e);
                return Err(TileError::Deserialization(format!("not a zstd tile stream: {}", e)));
            }
        };
        debug!("ZSTD decompressed {} bytes to {}", compressed.len(), decompressed.len());

        Ok(DecodedTile {
            raster: read_raster(&mut &decompressed[..])?,
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
                ParamDomain::IntRange { min: 1, max: 22 },
                ParamValue::Int(codec_defaults().zstd_level as i64),
            )],
        )
    }

    fn default_params(&self) -> CodecParams {
        CodecParams::Zstd {
            level: codec_defaults().zstd_level,
        }
    }
}

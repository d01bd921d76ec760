//! Codec lookup by format name

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{info, warn};

use crate::capability::{CapabilityDescriptor, CodecRole};
use crate::codec::gzip::GzipCodec;
use crate::codec::handler::{DecodedTile, TileCodec};
use crate::codec::jpeg::JpegCodec;
use crate::codec::params::CodecParams;
use crate::codec::raw::{check_params, RawCodec};
use crate::codec::zstd::ZstdCodec;
use crate::errors::{TileError, TileResult};
use crate::raster::Raster;

lazy_static! {
    static ref DEFAULT_REGISTRY: CodecRegistry = CodecRegistry::with_defaults();
}

/// The registry holding the built-in codecs
pub fn default_registry() -> &'static CodecRegistry {
    &DEFAULT_REGISTRY
}

/// Codecs keyed by lower-case format name
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn TileCodec>>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry").field("formats", &self.names()).finish()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        CodecRegistry::with_defaults()
    }
}

impl CodecRegistry {
    /// A registry without any codecs
    pub fn new() -> Self {
        CodecRegistry { codecs: HashMap::new() }
    }

    /// raw, gzip, zstd and jpeg
    pub fn with_defaults() -> Self {
        let mut registry = CodecRegistry::new();
        registry.register(Arc::new(RawCodec));
        registry.register(Arc::new(GzipCodec));
        registry.register(Arc::new(ZstdCodec));
        registry.register(Arc::new(JpegCodec));
        registry
    }

    /// Add a codec under its name, returning the one it replaces
    pub fn register(&mut self, codec: Arc<dyn TileCodec>) -> Option<Arc<dyn TileCodec>> {
        info!("Registering {} tile codec", codec.name());
        self.codecs.insert(codec.name().to_ascii_lowercase(), codec)
    }

    pub fn unregister(&mut self, format: &str) -> Option<Arc<dyn TileCodec>> {
        self.codecs.remove(&format.to_ascii_lowercase())
    }

    /// Look a codec up, ignoring case
    pub fn get(&self, format: &str) -> TileResult<Arc<dyn TileCodec>> {
        self.codecs
            .get(&format.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| TileError::UnsupportedFormat(format.to_string()))
    }

    /// Registered format names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Encoder writing to `sink`; parameters default to the codec's own
    pub fn encoder<W: Write>(&self, format: &str, sink: W, params: Option<CodecParams>) -> TileResult<TileEncoder<W>> {
        let codec = self.get(format)?;
        let params = params.unwrap_or_else(|| codec.default_params());
        check_params(codec.as_ref(), &params)?;
        Ok(TileEncoder { codec, sink, params })
    }

    pub fn decoder<R: Read>(&self, format: &str, source: R) -> TileResult<TileDecoder<R>> {
        Ok(TileDecoder {
            codec: self.get(format)?,
            source,
        })
    }

    pub fn capability(&self, format: &str, role: CodecRole) -> TileResult<CapabilityDescriptor> {
        Ok(self.get(format)?.capability(role))
    }
}

/// Writes one tile to a stream it owns
pub struct TileEncoder<W: Write> {
    codec: Arc<dyn TileCodec>,
    sink: W,
    params: CodecParams,
}

impl<W: Write> TileEncoder<W> {
    pub fn format(&self) -> &'static str {
        self.codec.name()
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    /// Encode `tile` and hand the flushed stream back
    ///
    /// The encoder is consumed either way; on failure the stream is dropped
    /// before the error is returned.
    pub fn encode(mut self, tile: &Raster) -> TileResult<W> {
        self.codec.encode(tile, &self.params, &mut self.sink)?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Reads one tile from a stream it owns
pub struct TileDecoder<R: Read> {
    codec: Arc<dyn TileCodec>,
    source: R,
}

impl<R: Read> TileDecoder<R> {
    pub fn format(&self) -> &'static str {
        self.codec.name()
    }

    /// Decode one tile
    ///
    /// Content that is not a tile stream of this format is logged and
    /// yields `None`; I/O and codec failures are errors.
    pub fn decode(mut self) -> TileResult<Option<DecodedTile>> {
        match self.codec.decode(&mut self.source) {
            Ok(tile) => Ok(Some(tile)),
            Err(TileError::Deserialization(msg)) => {
                warn!("Could not decode {} tile: {}", self.codec.name(), msg);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Encoder for `format` from the default registry
pub fn create_encoder<W: Write>(format: &str, sink: W, params: Option<CodecParams>) -> TileResult<TileEncoder<W>> {
    default_registry().encoder(format, sink, params)
}

/// Decoder for `format` from the default registry
pub fn create_decoder<R: Read>(format: &str, source: R) -> TileResult<TileDecoder<R>> {
    default_registry().decoder(format, source)
}

/// Capability of `format` in `role` from the default registry
pub fn get_capability(format: &str, role: CodecRole) -> TileResult<CapabilityDescriptor> {
    default_registry().capability(format, role)
}

//! Main interface to the tilekit library
//!
//! [`TileKit`] bundles an iterator factory and a codec registry so callers
//! can swap either without touching the process-wide defaults, and adds the
//! file-level operations the binary is built on.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::capability::{CapabilityDescriptor, CodecRole};
use crate::codec::{CodecParams, CodecRegistry, TileDecoder, TileEncoder};
use crate::errors::{TileError, TileResult};
use crate::iterator::{
    IteratorFactory, RandomIter, RectIter, RookIter, ScopedIter, WritableRandomIter, WritableRectIter,
    WritableRookIter,
};
use crate::raster::{Region, TiledImage, TiledSource, TiledSourceMut};
use crate::utils::image_utils::{load_image, save_image};
use crate::utils::progress::ProgressTracker;
use crate::utils::statistics::{band_statistics, BandStats};
use crate::utils::tile_pack::{read_pack, write_pack, PackHeader};

/// Tile size used when the caller does not choose one
pub const DEFAULT_TILE_SIZE: usize = 256;

/// Main interface to the tilekit library
#[derive(Clone, Default)]
pub struct TileKit {
    iterators: IteratorFactory,
    codecs: CodecRegistry,
}

/// Result of analyzing an image file
#[derive(Debug, Clone)]
pub struct Analysis {
    pub width: i32,
    pub height: i32,
    pub tiles_across: i32,
    pub tiles_down: i32,
    pub tile_size: usize,
    pub layout: String,
    pub specialized: bool,
    pub bands: Vec<BandStats>,
}

impl TileKit {
    /// A kit with the default iterator specializations and codecs
    pub fn new() -> Self {
        TileKit::default()
    }

    pub fn with_parts(iterators: IteratorFactory, codecs: CodecRegistry) -> Self {
        TileKit { iterators, codecs }
    }

    pub fn iterators(&self) -> &IteratorFactory {
        &self.iterators
    }

    pub fn iterators_mut(&mut self) -> &mut IteratorFactory {
        &mut self.iterators
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    pub fn codecs_mut(&mut self) -> &mut CodecRegistry {
        &mut self.codecs
    }

    pub fn rect_iter<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RectIter + 'a>> {
        self.iterators.rect(source, window)
    }

    pub fn writable_rect_iter<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRectIter + 'a>> {
        self.iterators.rect_writable(source, window)
    }

    pub fn rook_iter<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RookIter + 'a>> {
        self.iterators.rook(source, window)
    }

    pub fn writable_rook_iter<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRookIter + 'a>> {
        self.iterators.rook_writable(source, window)
    }

    pub fn random_iter<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RandomIter + 'a>> {
        self.iterators.random(source, window)
    }

    pub fn writable_random_iter<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRandomIter + 'a>> {
        self.iterators.random_writable(source, window)
    }

    pub fn encoder<W: Write>(&self, format: &str, sink: W, params: Option<CodecParams>) -> TileResult<TileEncoder<W>> {
        self.codecs.encoder(format, sink, params)
    }

    pub fn decoder<R: Read>(&self, format: &str, source: R) -> TileResult<TileDecoder<R>> {
        self.codecs.decoder(format, source)
    }

    pub fn capability(&self, format: &str, role: CodecRole) -> TileResult<CapabilityDescriptor> {
        self.codecs.capability(format, role)
    }

    /// Encoder capability narrowed to what the decoder side accepts
    pub fn negotiated_capability(&self, format: &str) -> TileResult<CapabilityDescriptor> {
        let encoder = self.capability(format, CodecRole::Encoder)?;
        let decoder = self.capability(format, CodecRole::Decoder)?;
        encoder.negotiate(&decoder)
    }

    /// Load an image, tile it and summarize every band
    ///
    /// # Arguments
    /// * `input_path` - Any image the `image` crate can open
    /// * `tile_size` - Edge length of the square tiles
    pub fn analyze<P: AsRef<Path>>(&self, input_path: P, tile_size: usize) -> TileResult<Analysis> {
        let raster = load_image(input_path.as_ref())?;
        let image = TiledImage::from_raster(&raster, tile_size, tile_size)?;
        let layout = image.sample_layout();
        let bands = band_statistics(&self.iterators, &image, None)?;

        Ok(Analysis {
            width: image.bounds().width,
            height: image.bounds().height,
            tiles_across: image.num_tiles_x(),
            tiles_down: image.num_tiles_y(),
            tile_size,
            layout: format!("{} {} x{}", layout.kind(), layout.data_type(), layout.num_bands()),
            specialized: self.iterators.registry().is_specialized(layout.kind(), layout.data_type()),
            bands,
        })
    }

    /// Tile an image file and store it as a tile pack
    pub fn encode_image<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        format: &str,
        params: Option<CodecParams>,
        tile_size: usize,
        progress: Option<&ProgressTracker>,
    ) -> TileResult<PackHeader> {
        let raster = load_image(input_path.as_ref())?;
        let image = TiledImage::from_raster(&raster, tile_size, tile_size)?;
        self.write_pack_file(&image, output_path, format, params, progress)
    }

    /// Store an already tiled image as a tile pack
    pub fn write_pack_file<Q: AsRef<Path>>(
        &self,
        image: &TiledImage,
        output_path: Q,
        format: &str,
        params: Option<CodecParams>,
        progress: Option<&ProgressTracker>,
    ) -> TileResult<PackHeader> {
        let file = File::create(output_path.as_ref())?;
        let mut writer = write_pack(&self.codecs, image, format, params, BufWriter::new(file), progress)?;
        writer.flush()?;

        info!("Tile pack written to {}", output_path.as_ref().display());
        Ok(PackHeader {
            format: self.codecs.get(format)?.name().to_string(),
            bounds: image.bounds(),
            tile_width: image.sample_layout().width(),
            tile_height: image.sample_layout().height(),
            tile_count: image.tiles().len() as u32,
        })
    }

    /// Read a tile pack file
    pub fn read_pack_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        progress: Option<&ProgressTracker>,
    ) -> TileResult<TiledImage> {
        let file = File::open(input_path.as_ref())
            .map_err(|e| TileError::GenericError(format!("Failed to open {}: {}", input_path.as_ref().display(), e)))?;
        read_pack(&self.codecs, BufReader::new(file), progress)
    }

    /// Decode a tile pack into an image file
    pub fn decode_pack<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        progress: Option<&ProgressTracker>,
    ) -> TileResult<TiledImage> {
        let image = self.read_pack_file(input_path, progress)?;
        save_image(&image, output_path.as_ref())?;
        info!("Decoded image written to {}", output_path.as_ref().display());
        Ok(image)
    }
}

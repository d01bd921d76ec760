//! Lossy (JPEG) tile streams
//!
//! ```text
//! quality      f32      0.0..=1.0
//! quality_set  u8       0 or 1
//! descriptor            layout of the encoded tile
//! origin       2 x i32
//! length       u32
//! payload               baseline JPEG, optionally without its JFIF segment
//! ```
//!
//! The payload always holds pixel-interleaved bytes. Decoding copies them
//! back into the layout named by the descriptor when that differs, and
//! reads the encode parameters back out of the payload's marker segments.

pub mod markers;

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use jpeg_decoder::PixelFormat;
use jpeg_encoder::{ColorType, Encoder, QuantizationTableType, SamplingFactor};
use log::{debug, warn};

use crate::capability::{CapabilityDescriptor, CodecRole, ParamDomain, ParamSpec, ParamValue};
use crate::codec::handler::{DecodedTile, TileCodec};
use crate::codec::params::*;
use crate::codec::raw::check_params;
use crate::config::codec_defaults;
use crate::errors::{invalid, TileError, TileResult};
use crate::io::{read_layout, read_origin, unrecognized, write_layout, write_origin};
use crate::iterator::{rect_iter, writable_rect_iter, RectTraversal, SampleRead, SampleWrite};
use crate::raster::{ComponentLayout, DataBuffer, DataType, Raster, SampleLayout};

use markers::JpegMarkers;

/// Baseline JPEG codec
pub struct JpegCodec;

/// Color type for a tile's band count
fn color_type(bands: usize) -> Option<ColorType> {
    match bands {
        1 => Some(ColorType::Luma),
        3 => Some(ColorType::Rgb),
        4 => Some(ColorType::Cmyk),
        _ => None,
    }
}

fn sampling_factor(horizontal: u8, vertical: u8) -> Option<SamplingFactor> {
    match (horizontal, vertical) {
        (1, 1) => Some(SamplingFactor::F_1_1),
        (2, 1) => Some(SamplingFactor::F_2_1),
        (1, 2) => Some(SamplingFactor::F_1_2),
        (2, 2) => Some(SamplingFactor::F_2_2),
        (4, 1) => Some(SamplingFactor::F_4_1),
        (4, 2) => Some(SamplingFactor::F_4_2),
        (1, 4) => Some(SamplingFactor::F_1_4),
        (2, 4) => Some(SamplingFactor::F_2_4),
        _ => None,
    }
}

/// Reject tiles and parameter combinations the encoder cannot represent
fn check_tile(tile: &Raster, params: &JpegParams) -> TileResult<(ColorType, SamplingFactor, u16, u16)> {
    if tile.data_type() != DataType::Byte {
        return invalid(format!("jpeg tiles hold 8-bit samples, this one holds {}", tile.data_type()));
    }
    let bands = tile.num_bands();
    let color = match color_type(bands) {
        Some(color) => color,
        None => return invalid(format!("jpeg tiles have 1, 3 or 4 bands, this one has {}", bands)),
    };
    let width = u16::try_from(tile.width()).map_err(|_| TileError::InvalidArgument(format!("tile width {} is too large for jpeg", tile.width())))?;
    let height = u16::try_from(tile.height()).map_err(|_| TileError::InvalidArgument(format!("tile height {} is too large for jpeg", tile.height())))?;

    let sampling = if bands == 3 {
        if (params.horizontal_subsampling(0), params.vertical_subsampling(0)) != (1, 1) {
            return invalid("band 0 of a 3-band jpeg tile cannot be subsampled");
        }
        let chroma = (params.horizontal_subsampling(1), params.vertical_subsampling(1));
        if chroma != (params.horizontal_subsampling(2), params.vertical_subsampling(2)) {
            return invalid("bands 1 and 2 of a 3-band jpeg tile must share their subsampling");
        }
        if [params.table_mapping(0), params.table_mapping(1), params.table_mapping(2)] != [0, 1, 1] {
            return invalid("3-band jpeg tiles quantize band 0 with table 0 and bands 1 and 2 with table 1");
        }
        match sampling_factor(chroma.0, chroma.1) {
            Some(factor) => factor,
            None => return invalid(format!("chroma subsampling {}x{} is not supported", chroma.0, chroma.1)),
        }
    } else {
        if bands == 1 && params.table_mapping(0) != 0 {
            return invalid("1-band jpeg tiles quantize with table 0");
        }
        SamplingFactor::F_1_1
    };

    Ok((color, sampling, width, height))
}

/// Pixel-interleaved bytes of a tile
fn interleaved_bytes(tile: &Raster) -> TileResult<Vec<u8>> {
    if let (Some(layout), Some(banks)) = (tile.layout().as_component(), tile.buffer().as_bytes()) {
        if layout.is_pixel_interleaved() {
            return Ok(banks[0][..layout.bank_size(0)].to_vec());
        }
    }

    let bands = tile.num_bands();
    let mut bytes = Vec::with_capacity(tile.bounds().area() * bands);
    let mut pixel = vec![0i32; bands];
    let mut iter = rect_iter(tile, None)?;
    iter.start_lines();
    while !iter.finished_lines() {
        iter.start_pixels();
        while !iter.finished_pixels() {
            iter.get_pixel(&mut pixel);
            bytes.extend(pixel.iter().map(|&v| v as u8));
            iter.next_pixel();
        }
        iter.next_line();
    }
    iter.done();
    Ok(bytes)
}

/// Place decoded interleaved bytes into `layout`
fn repack(layout: SampleLayout, pixels: Vec<u8>, bands: usize, min_x: i32, min_y: i32) -> TileResult<Raster> {
    let native = SampleLayout::from(ComponentLayout::interleaved(DataType::Byte, layout.width(), layout.height(), bands)?);
    let decoded = Raster::from_parts(native.clone(), DataBuffer::Byte(vec![pixels]), min_x, min_y)?;
    if layout == native {
        return Ok(decoded);
    }

    debug!("Repacking decoded jpeg tile into a {} layout", layout.kind());
    let mut target = Raster::new(layout, min_x, min_y)?;
    let mut pixel = vec![0i32; bands];
    let mut from = rect_iter(&decoded, None)?;
    let mut to = writable_rect_iter(&mut target, None)?;
    from.start_lines();
    to.start_lines();
    while !from.finished_lines() {
        from.start_pixels();
        to.start_pixels();
        while !from.finished_pixels() {
            from.get_pixel(&mut pixel);
            to.set_pixel(&pixel);
            from.next_pixel();
            to.next_pixel();
        }
        from.next_line();
        to.next_line();
    }
    from.done();
    to.done();
    Ok(target)
}

/// Encode parameters recovered from a stream's header and markers
fn recover_params(quality: f32, quality_set: bool, markers: &JpegMarkers) -> JpegParams {
    let mut params = JpegParams::default();
    params.restore_quality(quality, quality_set);

    if let Some(frame) = &markers.frame {
        for (band, component) in frame.components.iter().enumerate().take(JPEG_MAX_BANDS) {
            let (h, v) = frame.subsampling(band);
            if let Err(e) = params.set_subsampling(band, h, v) {
                debug!("Keeping default subsampling for band {}: {}", band, e);
            }
            if let Err(e) = params.set_table_mapping(band, component.table) {
                debug!("Keeping default table mapping for band {}: {}", band, e);
            }
        }
    }

    // An explicit quality means the stream's tables came from it
    if !quality_set {
        let defaults = codec_defaults();
        let luma = markers.tables[0].unwrap_or(defaults.luma_table);
        let chroma = markers.tables[1].unwrap_or(defaults.chroma_table);
        if let Err(e) = params.set_tables(luma, chroma) {
            warn!("Ignoring quantization tables outside the baseline range: {}", e);
        }
    }

    params.set_restart_interval(markers.restart_interval);
    params.set_write_jfif_header(markers.jfif);
    params
}

impl TileCodec for JpegCodec {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn encode(&self, tile: &Raster, params: &CodecParams, sink: &mut dyn Write) -> TileResult<()> {
        check_params(self, params)?;
        let params = match params {
            CodecParams::Jpeg(params) => params,
            other => return invalid(format!("{} parameters given to the jpeg codec", other.format())),
        };
        let (color, sampling, width, height) = check_tile(tile, params)?;
        let pixels = interleaved_bytes(tile)?;

        let mut payload = Vec::new();
        let mut encoder = Encoder::new(&mut payload, params.encoder_quality());
        encoder.set_sampling_factor(sampling);
        if let (false, Some([luma, chroma])) = (params.quality_set(), params.tables()) {
            encoder.set_quantization_tables(
                QuantizationTableType::Custom(Box::new(*luma)),
                QuantizationTableType::Custom(Box::new(*chroma)),
            );
        }
        encoder.set_restart_interval(params.restart_interval());
        encoder
            .encode(&pixels, width, height, color)
            .map_err(|e| TileError::CodecError(format!("jpeg encoding failed: {}", e)))?;

        if !params.write_jfif_header() {
            payload = markers::strip_jfif(&payload)?;
        }
        let length = u32::try_from(payload.len())
            .map_err(|_| TileError::CodecError(format!("jpeg payload of {} bytes is too large", payload.len())))?;
        debug!(
            "Encoded {}x{} jpeg tile at quality {} into {} bytes",
            width,
            height,
            params.encoder_quality(),
            length
        );

        sink.write_f32::<BigEndian>(params.quality())?;
        sink.write_u8(params.quality_set() as u8)?;
        write_layout(sink, tile.layout())?;
        write_origin(sink, tile.min_x(), tile.min_y())?;
        sink.write_u32::<BigEndian>(length)?;
        sink.write_all(&payload)?;
        Ok(())
    }

    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile> {
        let quality = source.read_f32::<BigEndian>().map_err(unrecognized)?;
        let quality_set = match source.read_u8().map_err(unrecognized)? {
            0 => false,
            1 => true,
            other => return Err(TileError::Deserialization(format!("quality flag {} is not 0 or 1", other))),
        };
        if !(0.0..=1.0).contains(&quality) {
            return Err(TileError::Deserialization(format!("quality {} is outside 0.0..=1.0", quality)));
        }
        let layout = read_layout(source)?;
        let (min_x, min_y) = read_origin(source)?;
        let length = source.read_u32::<BigEndian>().map_err(unrecognized)? as u64;

        let mut payload = Vec::new();
        source.take(length).read_to_end(&mut payload)?;
        if payload.len() as u64 != length {
            return Err(TileError::Deserialization(format!(
                "jpeg payload ends after {} of {} bytes",
                payload.len(),
                length
            )));
        }
        if layout.data_type() != DataType::Byte || color_type(layout.num_bands()).is_none() {
            return Err(TileError::Deserialization(format!(
                "a jpeg stream cannot hold {} bands of {}",
                layout.num_bands(),
                layout.data_type()
            )));
        }

        let mut decoder = jpeg_decoder::Decoder::new(&payload[..]);
        let pixels = decoder
            .decode()
            .map_err(|e| TileError::CodecError(format!("jpeg decoding failed: {}", e)))?;
        let info = decoder
            .info()
            .ok_or_else(|| TileError::CodecError("jpeg decoder reported no image info".to_string()))?;
        let bands = match info.pixel_format {
            PixelFormat::L8 => 1,
            PixelFormat::RGB24 => 3,
            PixelFormat::CMYK32 => 4,
            other => return Err(TileError::CodecError(format!("unsupported jpeg pixel format {:?}", other))),
        };
        if (info.width as usize, info.height as usize, bands) != (layout.width(), layout.height(), layout.num_bands()) {
            return Err(TileError::Deserialization(format!(
                "jpeg payload is {}x{}x{}, the descriptor says {}x{}x{}",
                info.width,
                info.height,
                bands,
                layout.width(),
                layout.height(),
                layout.num_bands()
            )));
        }
        debug!("Decoded {}x{} jpeg tile from {} bytes", info.width, info.height, length);

        let markers = markers::scan(&payload)?;
        let raster = repack(layout, pixels, bands, min_x, min_y)?;
        Ok(DecodedTile {
            raster,
            params: CodecParams::Jpeg(recover_params(quality, quality_set, &markers)),
        })
    }

    /// Decoding reads everything it needs from the stream
    fn capability(&self, role: CodecRole) -> CapabilityDescriptor {
        if role == CodecRole::Decoder {
            return CapabilityDescriptor::builtin(self.name(), role, Vec::new());
        }
        let defaults = codec_defaults();
        let factors = ParamDomain::Values(SUBSAMPLING_FACTORS.iter().map(|&f| ParamValue::Int(f as i64)).collect());
        let flag = ParamDomain::Values(vec![ParamValue::Bool(true), ParamValue::Bool(false)]);
        let table = |t: &[u16; 64]| ParamValue::IntList(t.iter().map(|&v| v as i64).collect());
        let fallback = JpegParams::default();
        let per_band = |f: &dyn Fn(usize) -> u8| ParamValue::IntList((0..JPEG_MAX_BANDS).map(|b| f(b) as i64).collect());

        CapabilityDescriptor::builtin(
            self.name(),
            role,
            vec![
                ParamSpec::new(QUALITY, ParamDomain::FloatRange { min: 0.0, max: 1.0 }, ParamValue::Float(defaults.jpeg_quality as f64)),
                ParamSpec::new(QUALITY_SET, flag.clone(), ParamValue::Bool(false)),
                ParamSpec::new(HORIZONTAL_SUBSAMPLING, factors.clone(), per_band(&|b| fallback.horizontal_subsampling(b))),
                ParamSpec::new(VERTICAL_SUBSAMPLING, factors, per_band(&|b| fallback.vertical_subsampling(b))),
                ParamSpec::new(
                    TABLE_MAPPING,
                    ParamDomain::Values(vec![ParamValue::Int(0), ParamValue::Int(1)]),
                    per_band(&|b| fallback.table_mapping(b)),
                ),
                ParamSpec::new(LUMA_TABLE, ParamDomain::IntRange { min: 1, max: 255 }, table(&defaults.luma_table)),
                ParamSpec::new(CHROMA_TABLE, ParamDomain::IntRange { min: 1, max: 255 }, table(&defaults.chroma_table)),
                ParamSpec::new(
                    RESTART_INTERVAL,
                    ParamDomain::IntRange { min: 0, max: u16::MAX as i64 },
                    ParamValue::Int(defaults.jpeg_restart_interval as i64),
                ),
                ParamSpec::new(WRITE_JFIF_HEADER, flag, ParamValue::Bool(true)),
            ],
        )
    }

    fn default_params(&self) -> CodecParams {
        CodecParams::Jpeg(JpegParams::default())
    }
}

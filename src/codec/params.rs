//! Typed codec parameters
//!
//! Every parameter a codec reads has a name in its capability descriptor;
//! [`CodecParams::to_values`] and [`CodecParams::from_values`] convert
//! between the typed form and those names.

use std::collections::BTreeMap;

use crate::capability::ParamValue;
use crate::config::codec_defaults;
use crate::errors::{invalid, TileError, TileResult};

pub const QUALITY: &str = "quality";
pub const QUALITY_SET: &str = "quality_set";
pub const HORIZONTAL_SUBSAMPLING: &str = "horizontal_subsampling";
pub const VERTICAL_SUBSAMPLING: &str = "vertical_subsampling";
pub const TABLE_MAPPING: &str = "table_mapping";
pub const LUMA_TABLE: &str = "luma_table";
pub const CHROMA_TABLE: &str = "chroma_table";
pub const RESTART_INTERVAL: &str = "restart_interval";
pub const WRITE_JFIF_HEADER: &str = "write_jfif_header";
pub const LEVEL: &str = "level";

/// Bands the lossy codec can carry
pub const JPEG_MAX_BANDS: usize = 4;

/// Subsampling factors the lossy codec accepts
pub const SUBSAMPLING_FACTORS: [u8; 3] = [1, 2, 4];

/// Parameters for one codec
#[derive(Debug, Clone, PartialEq)]
pub enum CodecParams {
    Raw,
    /// DEFLATE level, 0 (store) to 9 (best)
    Gzip { level: u32 },
    /// zstd level, 1 to 22
    Zstd { level: i32 },
    Jpeg(JpegParams),
}

impl CodecParams {
    /// Default parameters for a format name
    pub fn defaults_for(format: &str) -> TileResult<Self> {
        let defaults = codec_defaults();
        match format.to_ascii_lowercase().as_str() {
            "raw" => Ok(CodecParams::Raw),
            "gzip" => Ok(CodecParams::Gzip { level: defaults.gzip_level }),
            "zstd" => Ok(CodecParams::Zstd { level: defaults.zstd_level }),
            "jpeg" => Ok(CodecParams::Jpeg(JpegParams::default())),
            _ => Err(TileError::UnsupportedFormat(format.to_string())),
        }
    }

    /// Name of the format these parameters belong to
    pub fn format(&self) -> &'static str {
        match self {
            CodecParams::Raw => "raw",
            CodecParams::Gzip { .. } => "gzip",
            CodecParams::Zstd { .. } => "zstd",
            CodecParams::Jpeg(_) => "jpeg",
        }
    }

    /// Named values, keyed the way the capability descriptors name them
    pub fn to_values(&self) -> BTreeMap<String, ParamValue> {
        let mut values = BTreeMap::new();
        match self {
            CodecParams::Raw => {}
            CodecParams::Gzip { level } => {
                values.insert(LEVEL.to_string(), ParamValue::Int(*level as i64));
            }
            CodecParams::Zstd { level } => {
                values.insert(LEVEL.to_string(), ParamValue::Int(*level as i64));
            }
            CodecParams::Jpeg(jpeg) => jpeg.write_values(&mut values),
        }
        values
    }

    /// Typed parameters from named values
    ///
    /// Values not given keep their defaults. Unknown names and values
    /// outside a parameter's range are rejected.
    pub fn from_values(format: &str, values: &BTreeMap<String, ParamValue>) -> TileResult<Self> {
        let mut params = CodecParams::defaults_for(format)?;
        match &mut params {
            CodecParams::Raw => {
                if let Some(name) = values.keys().next() {
                    return invalid(format!("raw tiles take no parameters, got {}", name));
                }
            }
            CodecParams::Gzip { level } => {
                for (name, value) in values {
                    match (name.as_str(), value) {
                        (LEVEL, ParamValue::Int(v @ 0..=9)) => *level = *v as u32,
                        _ => return invalid(format!("gzip does not accept {} = {}", name, value)),
                    }
                }
            }
            CodecParams::Zstd { level } => {
                for (name, value) in values {
                    match (name.as_str(), value) {
                        (LEVEL, ParamValue::Int(v @ 1..=22)) => *level = *v as i32,
                        _ => return invalid(format!("zstd does not accept {} = {}", name, value)),
                    }
                }
            }
            CodecParams::Jpeg(jpeg) => *jpeg = JpegParams::from_values(values)?,
        }
        Ok(params)
    }
}

/// Parameters of the lossy codec
///
/// Every setter validates its input, so a `JpegParams` always holds values
/// the codec accepts for some band count. Quality and tables are two ways of
/// picking quantization: an explicitly set quality wins, otherwise explicit
/// tables, otherwise the default tables scaled by quality.
#[derive(Debug, Clone, PartialEq)]
pub struct JpegParams {
    quality: f32,
    quality_set: bool,
    horizontal_subsampling: [u8; JPEG_MAX_BANDS],
    vertical_subsampling: [u8; JPEG_MAX_BANDS],
    table_mapping: [u8; JPEG_MAX_BANDS],
    tables: Option<[[u16; 64]; 2]>,
    restart_interval: u16,
    write_jfif_header: bool,
}

impl Default for JpegParams {
    fn default() -> Self {
        let defaults = codec_defaults();
        JpegParams {
            quality: defaults.jpeg_quality,
            quality_set: false,
            horizontal_subsampling: [1, 2, 2, 1],
            vertical_subsampling: [1, 2, 2, 1],
            table_mapping: [0, 1, 1, 0],
            tables: None,
            restart_interval: defaults.jpeg_restart_interval,
            write_jfif_header: true,
        }
    }
}

fn check_band(band: usize) -> TileResult<()> {
    if band >= JPEG_MAX_BANDS {
        return invalid(format!("band {} is outside 0..{}", band, JPEG_MAX_BANDS));
    }
    Ok(())
}

fn check_table(table: &[u16; 64], which: &str) -> TileResult<()> {
    match table.iter().position(|&v| v == 0 || v > 255) {
        Some(i) => invalid(format!("{} entry {} is {}, expected 1..=255", which, i, table[i])),
        None => Ok(()),
    }
}

impl JpegParams {
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Whether quality was chosen explicitly over any tables
    pub fn quality_set(&self) -> bool {
        self.quality_set
    }

    /// Quality on the 1..=100 scale the encoder uses
    pub fn encoder_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    pub fn horizontal_subsampling(&self, band: usize) -> u8 {
        self.horizontal_subsampling[band]
    }

    pub fn vertical_subsampling(&self, band: usize) -> u8 {
        self.vertical_subsampling[band]
    }

    pub fn table_mapping(&self, band: usize) -> u8 {
        self.table_mapping[band]
    }

    /// Luma and chroma tables in natural order, when set
    pub fn tables(&self) -> Option<&[[u16; 64]; 2]> {
        self.tables.as_ref()
    }

    pub fn restart_interval(&self) -> u16 {
        self.restart_interval
    }

    pub fn write_jfif_header(&self) -> bool {
        self.write_jfif_header
    }

    /// Pick quantization by quality from now on
    pub fn set_quality(&mut self, quality: f32) -> TileResult<()> {
        if !(0.0..=1.0).contains(&quality) {
            return invalid(format!("quality {} is outside 0.0..=1.0", quality));
        }
        self.quality = quality;
        self.quality_set = true;
        self.tables = None;
        Ok(())
    }

    pub fn set_subsampling(&mut self, band: usize, horizontal: u8, vertical: u8) -> TileResult<()> {
        check_band(band)?;
        for factor in [horizontal, vertical] {
            if !SUBSAMPLING_FACTORS.contains(&factor) {
                return invalid(format!("subsampling factor {} is not one of {:?}", factor, SUBSAMPLING_FACTORS));
            }
        }
        self.horizontal_subsampling[band] = horizontal;
        self.vertical_subsampling[band] = vertical;
        Ok(())
    }

    /// Assign band `band` to quantization table slot 0 (luma) or 1 (chroma)
    pub fn set_table_mapping(&mut self, band: usize, slot: u8) -> TileResult<()> {
        check_band(band)?;
        if slot > 1 {
            return invalid(format!("table slot {} is not 0 or 1", slot));
        }
        self.table_mapping[band] = slot;
        Ok(())
    }

    /// Quantize with explicit tables from now on
    pub fn set_tables(&mut self, luma: [u16; 64], chroma: [u16; 64]) -> TileResult<()> {
        check_table(&luma, LUMA_TABLE)?;
        check_table(&chroma, CHROMA_TABLE)?;
        self.tables = Some([luma, chroma]);
        self.quality_set = false;
        Ok(())
    }

    pub fn set_restart_interval(&mut self, interval: u16) {
        self.restart_interval = interval;
    }

    pub fn set_write_jfif_header(&mut self, write: bool) {
        self.write_jfif_header = write;
    }

    /// Restore a decoded quality without touching tables
    pub(crate) fn restore_quality(&mut self, quality: f32, quality_set: bool) {
        self.quality = quality;
        self.quality_set = quality_set;
    }

    fn write_values(&self, values: &mut BTreeMap<String, ParamValue>) {
        let list = |items: &[u8]| ParamValue::IntList(items.iter().map(|&v| v as i64).collect());

        values.insert(QUALITY.to_string(), ParamValue::Float(self.quality as f64));
        values.insert(QUALITY_SET.to_string(), ParamValue::Bool(self.quality_set));
        values.insert(HORIZONTAL_SUBSAMPLING.to_string(), list(&self.horizontal_subsampling));
        values.insert(VERTICAL_SUBSAMPLING.to_string(), list(&self.vertical_subsampling));
        values.insert(TABLE_MAPPING.to_string(), list(&self.table_mapping));
        if let Some([luma, chroma]) = &self.tables {
            let table = |t: &[u16; 64]| ParamValue::IntList(t.iter().map(|&v| v as i64).collect());
            values.insert(LUMA_TABLE.to_string(), table(luma));
            values.insert(CHROMA_TABLE.to_string(), table(chroma));
        }
        values.insert(RESTART_INTERVAL.to_string(), ParamValue::Int(self.restart_interval as i64));
        values.insert(WRITE_JFIF_HEADER.to_string(), ParamValue::Bool(self.write_jfif_header));
    }

    fn from_values(values: &BTreeMap<String, ParamValue>) -> TileResult<Self> {
        let mut params = JpegParams::default();
        let mut luma = None;
        let mut chroma = None;
        let mut quality_set = None;

        for (name, value) in values {
            match (name.as_str(), value) {
                (QUALITY, ParamValue::Float(q)) => params.set_quality(*q as f32)?,
                (QUALITY_SET, ParamValue::Bool(set)) => quality_set = Some(*set),
                (HORIZONTAL_SUBSAMPLING, ParamValue::IntList(_)) | (VERTICAL_SUBSAMPLING, ParamValue::IntList(_)) => {}
                (TABLE_MAPPING, ParamValue::IntList(slots)) => {
                    for (band, &slot) in per_band(name, slots)?.iter().enumerate() {
                        params.set_table_mapping(band, to_u8(name, slot)?)?;
                    }
                }
                (LUMA_TABLE, ParamValue::IntList(entries)) => luma = Some(to_table(name, entries)?),
                (CHROMA_TABLE, ParamValue::IntList(entries)) => chroma = Some(to_table(name, entries)?),
                (RESTART_INTERVAL, ParamValue::Int(v)) => params.set_restart_interval(
                    u16::try_from(*v).map_err(|_| TileError::InvalidArgument(format!("{} {} is out of range", name, v)))?,
                ),
                (WRITE_JFIF_HEADER, ParamValue::Bool(v)) => params.set_write_jfif_header(*v),
                _ => return invalid(format!("jpeg does not accept {} = {}", name, value)),
            }
        }

        // Subsampling comes in two lists that are only valid as pairs
        if let (Some(h), Some(v)) = (values.get(HORIZONTAL_SUBSAMPLING), values.get(VERTICAL_SUBSAMPLING)) {
            if let (ParamValue::IntList(h), ParamValue::IntList(v)) = (h, v) {
                let h = per_band(HORIZONTAL_SUBSAMPLING, h)?;
                let v = per_band(VERTICAL_SUBSAMPLING, v)?;
                for band in 0..JPEG_MAX_BANDS {
                    params.set_subsampling(
                        band,
                        to_u8(HORIZONTAL_SUBSAMPLING, h[band])?,
                        to_u8(VERTICAL_SUBSAMPLING, v[band])?,
                    )?;
                }
            }
        } else if values.contains_key(HORIZONTAL_SUBSAMPLING) || values.contains_key(VERTICAL_SUBSAMPLING) {
            return invalid("horizontal and vertical subsampling must be given together");
        }

        // A quality given without tables or a flag counts as explicitly set
        let quality_set = quality_set.unwrap_or(values.contains_key(QUALITY) && luma.is_none());
        match (luma, chroma) {
            (Some(luma), Some(chroma)) if !quality_set => params.set_tables(luma, chroma)?,
            (Some(_), None) | (None, Some(_)) => return invalid("luma and chroma tables must be given together"),
            _ => {}
        }
        let quality = params.quality;
        params.restore_quality(quality, quality_set);
        Ok(params)
    }
}

fn per_band<'v>(name: &str, items: &'v [i64]) -> TileResult<&'v [i64]> {
    if items.len() != JPEG_MAX_BANDS {
        return invalid(format!("{} needs {} entries, got {}", name, JPEG_MAX_BANDS, items.len()));
    }
    Ok(items)
}

fn to_u8(name: &str, value: i64) -> TileResult<u8> {
    u8::try_from(value).map_err(|_| TileError::InvalidArgument(format!("{} entry {} is out of range", name, value)))
}

fn to_table(name: &str, entries: &[i64]) -> TileResult<[u16; 64]> {
    if entries.len() != 64 {
        return invalid(format!("{} needs 64 entries, got {}", name, entries.len()));
    }
    let mut table = [0u16; 64];
    for (slot, &entry) in table.iter_mut().zip(entries) {
        *slot = u16::try_from(entry)
            .map_err(|_| TileError::InvalidArgument(format!("{} entry {} is out of range", name, entry)))?;
    }
    check_table(&table, name)?;
    Ok(table)
}

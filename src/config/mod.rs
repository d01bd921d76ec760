//! Codec defaults embedded from `codec_defaults.toml`

use lazy_static::lazy_static;

use crate::errors::{TileError, TileResult};

lazy_static! {
    static ref CODEC_DEFAULTS: CodecDefaults = {
        let content = include_str!("../../codec_defaults.toml");
        CodecDefaults::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse codec defaults: {}", e);
            CodecDefaults::default()
        })
    };
}

/// Process-wide codec defaults
pub fn codec_defaults() -> &'static CodecDefaults {
    &CODEC_DEFAULTS
}

const ANNEX_K_LUMA: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

const ANNEX_K_CHROMA: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, //
    18, 21, 26, 66, 99, 99, 99, 99, //
    24, 26, 56, 99, 99, 99, 99, 99, //
    47, 66, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Defaults for codec parameters the caller leaves unset
#[derive(Debug, Clone, PartialEq)]
pub struct CodecDefaults {
    pub jpeg_quality: f32,
    pub jpeg_restart_interval: u16,
    /// Natural order
    pub luma_table: [u16; 64],
    pub chroma_table: [u16; 64],
    pub gzip_level: u32,
    pub zstd_level: i32,
}

impl Default for CodecDefaults {
    fn default() -> Self {
        CodecDefaults {
            jpeg_quality: 0.75,
            jpeg_restart_interval: 0,
            luma_table: ANNEX_K_LUMA,
            chroma_table: ANNEX_K_CHROMA,
            gzip_level: 6,
            zstd_level: 3,
        }
    }
}

impl CodecDefaults {
    /// Parse defaults from a TOML string; missing keys keep built-in values
    pub fn from_str(content: &str) -> TileResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(TileError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut defaults = CodecDefaults::default();

        if let Some(jpeg) = toml_value.get("jpeg") {
            if let Some(quality) = jpeg.get("quality").and_then(|v| v.as_float()) {
                if !(0.0..=1.0).contains(&quality) {
                    return Err(TileError::GenericError(format!("jpeg.quality {} is outside 0..1", quality)));
                }
                defaults.jpeg_quality = quality as f32;
            }
            if let Some(interval) = jpeg.get("restart_interval").and_then(|v| v.as_integer()) {
                defaults.jpeg_restart_interval = u16::try_from(interval)
                    .map_err(|_| TileError::GenericError(format!("jpeg.restart_interval {} is out of range", interval)))?;
            }
            if let Some(table) = Self::parse_table(jpeg, "luma_table")? {
                defaults.luma_table = table;
            }
            if let Some(table) = Self::parse_table(jpeg, "chroma_table")? {
                defaults.chroma_table = table;
            }
        }

        if let Some(level) = toml_value.get("gzip").and_then(|v| v.get("level")).and_then(|v| v.as_integer()) {
            if !(0..=9).contains(&level) {
                return Err(TileError::GenericError(format!("gzip.level {} is outside 0..9", level)));
            }
            defaults.gzip_level = level as u32;
        }

        if let Some(level) = toml_value.get("zstd").and_then(|v| v.get("level")).and_then(|v| v.as_integer()) {
            if !(1..=22).contains(&level) {
                return Err(TileError::GenericError(format!("zstd.level {} is outside 1..22", level)));
            }
            defaults.zstd_level = level as i32;
        }

        Ok(defaults)
    }

    /// A 64-entry quantization table with entries in 1..=255
    fn parse_table(section: &toml::Value, key: &str) -> TileResult<Option<[u16; 64]>> {
        let entries = match section.get(key).and_then(|v| v.as_array()) {
            Some(entries) => entries,
            None => return Ok(None),
        };
        if entries.len() != 64 {
            return Err(TileError::GenericError(format!("{} has {} entries, expected 64", key, entries.len())));
        }

        let mut table = [0u16; 64];
        for (slot, entry) in table.iter_mut().zip(entries) {
            match entry.as_integer() {
                Some(v @ 1..=255) => *slot = v as u16,
                _ => return Err(TileError::GenericError(format!("{} holds an invalid entry {}", key, entry))),
            }
        }
        Ok(Some(table))
    }
}

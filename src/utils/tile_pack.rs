//! Tile pack files
//!
//! A tile pack stores every tile of a [`TiledImage`] as an independent
//! codec stream:
//!
//! ```text
//! "TKPK" | u8 name length | format name | bounds (4 x i32)
//!        | tile layout descriptor | u32 tile count
//!        | per tile: u32 length | codec stream
//! ```
//!
//! All integers are big-endian. Tiles are stored in grid order, row by row.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info, warn};

use crate::codec::{CodecParams, CodecRegistry};
use crate::errors::{invalid, TileError, TileResult};
use crate::io::{read_layout, unrecognized, write_layout};
use crate::raster::{Region, SampleLayout, TiledImage, TiledSource};
use crate::utils::progress::ProgressTracker;

pub const PACK_MAGIC: &[u8; 4] = b"TKPK";

/// Header of a tile pack
#[derive(Debug, Clone, PartialEq)]
pub struct PackHeader {
    pub format: String,
    pub bounds: Region,
    pub tile_width: usize,
    pub tile_height: usize,
    pub tile_count: u32,
}

/// Encode every tile of `image` with `format` and write the pack to `sink`
///
/// # Arguments
/// * `registry` - Codecs to encode with
/// * `image` - Image to store
/// * `format` - Codec name
/// * `params` - Encode parameters, or the codec defaults
/// * `sink` - Destination, handed back once the pack is written
/// * `progress` - Advanced by one per tile
pub fn write_pack<W: Write>(
    registry: &CodecRegistry,
    image: &TiledImage,
    format: &str,
    params: Option<CodecParams>,
    mut sink: W,
    progress: Option<&ProgressTracker>,
) -> TileResult<W> {
    let name = registry.get(format)?.name();
    if name.len() > u8::MAX as usize {
        return invalid(format!("format name {} is too long", name));
    }
    let bounds = image.bounds();
    let tiles = image.tiles();
    if (image.tile_grid_x_offset() - bounds.x).rem_euclid(image.tile_width()) != 0
        || (image.tile_grid_y_offset() - bounds.y).rem_euclid(image.tile_height()) != 0
    {
        return invalid("tile packs need the tile grid anchored at the image origin");
    }

    sink.write_all(PACK_MAGIC)?;
    sink.write_u8(name.len() as u8)?;
    sink.write_all(name.as_bytes())?;
    for v in [bounds.x, bounds.y, bounds.width, bounds.height] {
        sink.write_i32::<BigEndian>(v)?;
    }
    write_layout(&mut sink, image.sample_layout())?;
    sink.write_u32::<BigEndian>(tiles.len() as u32)?;

    let mut total = 0usize;
    for tile in tiles {
        let bytes = registry.encoder(name, Vec::new(), params.clone())?.encode(tile)?;
        debug!("Packed tile at {:?} into {} bytes", tile.bounds(), bytes.len());
        sink.write_u32::<BigEndian>(bytes.len() as u32)?;
        sink.write_all(&bytes)?;
        total += bytes.len();
        if let Some(progress) = progress {
            progress.increment(1);
        }
    }
    sink.flush()?;

    info!("Wrote {} {} tiles ({} bytes of tile data)", tiles.len(), name, total);
    Ok(sink)
}

/// Read a pack header
pub fn read_header<R: Read>(source: &mut R) -> TileResult<(PackHeader, SampleLayout)> {
    let mut magic = [0u8; 4];
    source.read_exact(&mut magic).map_err(unrecognized)?;
    if &magic != PACK_MAGIC {
        return Err(TileError::Deserialization("not a tile pack".to_string()));
    }

    let name_len = source.read_u8().map_err(unrecognized)? as usize;
    let mut name = vec![0u8; name_len];
    source.read_exact(&mut name).map_err(unrecognized)?;
    let format = String::from_utf8(name)
        .map_err(|_| TileError::Deserialization("format name is not UTF-8".to_string()))?;

    let mut coords = [0i32; 4];
    for v in coords.iter_mut() {
        *v = source.read_i32::<BigEndian>().map_err(unrecognized)?;
    }
    let bounds = Region::new(coords[0], coords[1], coords[2], coords[3]);
    let layout = read_layout(source)?;
    let tile_count = source.read_u32::<BigEndian>().map_err(unrecognized)?;

    let header = PackHeader {
        format,
        bounds,
        tile_width: layout.width(),
        tile_height: layout.height(),
        tile_count,
    };
    Ok((header, layout))
}

/// Tiles of the grid anchored at the bounds origin, `None` for bounds no image can have
fn grid_tile_count(header: &PackHeader) -> Option<u64> {
    let bounds = header.bounds;
    if bounds.width <= 0 || bounds.height <= 0 {
        return None;
    }
    i32::try_from(bounds.x as i64 + bounds.width as i64).ok()?;
    i32::try_from(bounds.y as i64 + bounds.height as i64).ok()?;
    let across = (bounds.width as u64).div_ceil(header.tile_width as u64);
    let down = (bounds.height as u64).div_ceil(header.tile_height as u64);
    across.checked_mul(down)
}

/// Read a pack back into a tiled image
///
/// Tiles whose stream is not recognized by the codec are logged and left
/// zero-filled.
pub fn read_pack<R: Read>(
    registry: &CodecRegistry,
    mut source: R,
    progress: Option<&ProgressTracker>,
) -> TileResult<TiledImage> {
    let (header, layout) = read_header(&mut source)?;
    let grid = grid_tile_count(&header);
    if grid != Some(header.tile_count as u64) {
        return Err(TileError::Deserialization(format!(
            "pack holds {} tiles, its bounds {:?} need {:?}",
            header.tile_count, header.bounds, grid
        )));
    }
    let mut image = TiledImage::new(header.bounds, layout)
        .map_err(|e| TileError::Deserialization(format!("pack describes an invalid image: {}", e)))?;

    let mut skipped = 0;
    for index in 0..header.tile_count {
        let length = source.read_u32::<BigEndian>().map_err(unrecognized)? as u64;
        let mut bytes = Vec::new();
        (&mut source).take(length).read_to_end(&mut bytes).map_err(unrecognized)?;
        if (bytes.len() as u64) < length {
            return Err(TileError::Deserialization(format!(
                "tile {} ends after {} of {} bytes",
                index,
                bytes.len(),
                length
            )));
        }

        match registry.decoder(&header.format, &bytes[..])?.decode()? {
            Some(decoded) => image
                .put_tile(decoded.raster)
                .map_err(|e| TileError::Deserialization(format!("tile {} does not fit the grid: {}", index, e)))?,
            None => {
                warn!("Tile {} of the pack could not be decoded, leaving it empty", index);
                skipped += 1;
            }
        }
        if let Some(progress) = progress {
            progress.increment(1);
        }
    }

    info!(
        "Read {} {} tiles from pack ({} skipped)",
        header.tile_count, header.format, skipped
    );
    Ok(image)
}

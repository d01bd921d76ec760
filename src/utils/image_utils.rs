//! Conversions between rasters and `image` crate buffers
//!
//! Images become pixel-interleaved `Byte` rasters anchored at (0, 0):
//! grayscale gives one band, color three, anything with alpha four.
//! Going back, any tiled source with 1, 3 or 4 bands can be written, with
//! samples clamped to 0..=255.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use log::debug;

use crate::errors::{invalid, TileError, TileResult};
use crate::iterator::{rect_iter, RectTraversal, SampleRead};
use crate::raster::{ComponentLayout, DataBuffer, DataType, Raster, TiledSource};

/// Build a raster from a decoded image
pub fn raster_from_image(image: &DynamicImage) -> TileResult<Raster> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let color = image.color();
    let (bands, bytes) = if color.has_alpha() {
        (4, image.to_rgba8().into_raw())
    } else if color.has_color() {
        (3, image.to_rgb8().into_raw())
    } else {
        (1, image.to_luma8().into_raw())
    };

    debug!("Converted {:?} image of {}x{} into {} bands", color, width, height, bands);
    let layout = ComponentLayout::interleaved(DataType::Byte, width, height, bands)?;
    Raster::from_parts(layout.into(), DataBuffer::Byte(vec![bytes]), 0, 0)
}

/// Gather every pixel of `source` into an image
pub fn image_from_source(source: &dyn TiledSource) -> TileResult<DynamicImage> {
    let bounds = source.bounds();
    let bands = source.num_bands();
    if !matches!(bands, 1 | 3 | 4) {
        return invalid(format!("cannot write a {}-band raster as an image", bands));
    }

    let mut bytes = Vec::with_capacity(bounds.area() * bands);
    let mut pixel = vec![0f64; bands];
    let mut iter = rect_iter(source, None)?;
    iter.start_lines();
    while !iter.finished_lines() {
        iter.start_pixels();
        while !iter.finished_pixels() {
            iter.get_pixel_double(&mut pixel);
            bytes.extend(pixel.iter().map(|&v| v.round().clamp(0.0, 255.0) as u8));
            iter.next_pixel();
        }
        iter.next_line();
    }
    iter.done();

    let (width, height) = (bounds.width as u32, bounds.height as u32);
    let image = match bands {
        1 => GrayImage::from_raw(width, height, bytes).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgba8),
    };
    image.ok_or_else(|| TileError::GenericError("image buffer does not match its dimensions".to_string()))
}

/// Load an image file as a raster
pub fn load_image<P: AsRef<Path>>(path: P) -> TileResult<Raster> {
    let image = image::open(path.as_ref())
        .map_err(|e| TileError::GenericError(format!("Failed to open {}: {}", path.as_ref().display(), e)))?;
    raster_from_image(&image)
}

/// Write a tiled source as an image file; the format follows the extension
pub fn save_image<P: AsRef<Path>>(source: &dyn TiledSource, path: P) -> TileResult<()> {
    image_from_source(source)?
        .save(path.as_ref())
        .map_err(|e| TileError::GenericError(format!("Failed to save {}: {}", path.as_ref().display(), e)))
}

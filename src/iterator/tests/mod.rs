mod dispatch_tests;
mod random_tests;
mod rook_tests;
mod traversal_tests;

use crate::iterator::{IterRegistry, IteratorFactory, RectIter};
use crate::raster::{ComponentLayout, DataType, Region, TiledImage};

/// Deterministic sample value for a pixel and band
pub(super) fn sample_value(x: i32, y: i32, band: usize) -> i32 {
    (x * 3 + y * 5 + band as i32 * 11).rem_euclid(251)
}

/// Interleaved tiled image filled with `sample_value`, tile grid anchored at (0, 0)
pub(super) fn gradient_image(
    bounds: Region,
    tile_width: usize,
    tile_height: usize,
    bands: usize,
    data_type: DataType,
) -> TiledImage {
    let layout = ComponentLayout::interleaved(data_type, tile_width, tile_height, bands).unwrap();
    let mut image = TiledImage::with_grid_offset(bounds, layout.into(), 0, 0).unwrap();
    for y in bounds.y..bounds.end_y() {
        for x in bounds.x..bounds.end_x() {
            for b in 0..bands {
                image.set_sample(x, y, b, sample_value(x, y, b));
            }
        }
    }
    image
}

/// The default factory, or one that only knows the fallback
pub(super) fn factory(specialized: bool) -> IteratorFactory {
    if specialized {
        IteratorFactory::default()
    } else {
        IteratorFactory::new(IterRegistry::new())
    }
}

/// Every (x, y, band, sample) in forward traversal order
pub(super) fn collect_forward(iter: &mut dyn RectIter) -> Vec<(i32, i32, i32, f64)> {
    let mut out = Vec::new();
    iter.start_lines();
    while !iter.finished_lines() {
        iter.start_pixels();
        while !iter.finished_pixels() {
            iter.start_bands();
            while !iter.finished_bands() {
                let (x, y, b) = iter.position();
                out.push((x, y, b, iter.get_sample_double()));
                iter.next_band();
            }
            iter.next_pixel();
        }
        iter.next_line();
    }
    out
}

/// What `collect_forward` should produce for a gradient image
pub(super) fn expected_forward(window: Region, bands: usize) -> Vec<(i32, i32, i32, f64)> {
    let mut out = Vec::new();
    for y in window.y..window.end_y() {
        for x in window.x..window.end_x() {
            for b in 0..bands {
                out.push((x, y, b as i32, sample_value(x, y, b) as f64));
            }
        }
    }
    out
}

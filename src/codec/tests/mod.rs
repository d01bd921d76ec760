mod lossless_tests;
mod registry_tests;

use crate::raster::{DataType, Raster, Region, SampleLayout};

/// Raster over `bounds` filled with smooth per-band ramps
pub(super) fn ramp_raster(bounds: Region, bands: usize) -> Raster {
    let mut raster = Raster::interleaved(DataType::Byte, bounds, bands).unwrap();
    fill_ramp(&mut raster);
    raster
}

/// Raster with `layout` at (min_x, min_y) filled with smooth per-band ramps
pub(super) fn ramp_with_layout(layout: SampleLayout, min_x: i32, min_y: i32) -> Raster {
    let mut raster = Raster::new(layout, min_x, min_y).unwrap();
    fill_ramp(&mut raster);
    raster
}

fn fill_ramp(raster: &mut Raster) {
    let bounds = raster.bounds();
    for y in bounds.y..bounds.end_y() {
        for x in bounds.x..bounds.end_x() {
            let (dx, dy) = (x - bounds.x, y - bounds.y);
            for b in 0..raster.num_bands() {
                raster.set_sample(x, y, b, (40 + dx * 4 + dy * 2 + b as i32 * 30).min(255));
            }
        }
    }
}

/// Largest absolute per-sample difference between two same-shaped rasters
pub(super) fn max_error(a: &Raster, b: &Raster) -> i32 {
    let bounds = a.bounds();
    let mut worst = 0;
    for y in bounds.y..bounds.end_y() {
        for x in bounds.x..bounds.end_x() {
            for band in 0..a.num_bands() {
                worst = worst.max((a.get_sample(x, y, band) - b.get_sample(x, y, band)).abs());
            }
        }
    }
    worst
}

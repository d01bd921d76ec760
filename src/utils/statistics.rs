//! Per-band sample statistics gathered with the pixel iterators

use std::fmt;

use crate::errors::TileResult;
use crate::iterator::{IteratorFactory, RectTraversal, SampleRead};
use crate::raster::{Region, TiledSource};

/// Summary of one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    pub band: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl fmt::Display for BandStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band {}: min {}, max {}, mean {:.3} over {} samples",
            self.band, self.min, self.max, self.mean, self.count
        )
    }
}

/// Walk `window` of `source` once and summarize every band
pub fn band_statistics(
    factory: &IteratorFactory,
    source: &dyn TiledSource,
    window: Option<Region>,
) -> TileResult<Vec<BandStats>> {
    let bands = source.num_bands();
    let mut min = vec![f64::INFINITY; bands];
    let mut max = vec![f64::NEG_INFINITY; bands];
    let mut sum = vec![0f64; bands];
    let mut count = 0usize;

    let mut iter = factory.rect(source, window)?;
    iter.start_lines();
    while !iter.finished_lines() {
        iter.start_pixels();
        while !iter.finished_pixels() {
            for b in 0..bands {
                let v = iter.get_sample_double_at(b);
                min[b] = min[b].min(v);
                max[b] = max[b].max(v);
                sum[b] += v;
            }
            count += 1;
            iter.next_pixel();
        }
        iter.next_line();
    }
    iter.done();

    Ok((0..bands)
        .map(|b| BandStats {
            band: b,
            min: min[b],
            max: max[b],
            mean: sum[b] / count as f64,
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::default_factory;
    use crate::raster::{DataType, Raster, TiledImage};

    #[test]
    fn test_statistics_over_tiles_and_windows() {
        let mut raster = Raster::interleaved(DataType::Float, Region::new(2, 2, 6, 4), 2).unwrap();
        for y in 2..6 {
            for x in 2..8 {
                raster.set_sample_float(x, y, 0, x as f32);
                raster.set_sample_float(x, y, 1, -(y as f32) * 0.5);
            }
        }
        let tiled = TiledImage::from_raster(&raster, 4, 3).unwrap();

        let stats = band_statistics(default_factory(), &tiled, None).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].min, stats[0].max, stats[0].count), (2.0, 7.0, 24));
        assert!((stats[0].mean - 4.5).abs() < 1e-9);
        assert_eq!((stats[1].min, stats[1].max), (-2.5, -1.0));

        let window = band_statistics(default_factory(), &tiled, Some(Region::new(6, 0, 10, 3))).unwrap();
        assert_eq!((window[0].min, window[0].max, window[0].count), (6.0, 7.0, 2));
    }
}

//! Forward traversal over single rasters and tiled images

use rstest::rstest;

use super::{collect_forward, expected_forward, factory, gradient_image, sample_value};
use crate::errors::TileError;
use crate::iterator::{rect_iter, writable_rect_iter, RectTraversal, ReverseTraversal, SampleRead, SampleWrite};
use crate::raster::{DataType, Raster, Region, SampleLayout, TiledImage, TiledSource, TiledSourceMut};

#[rstest]
#[case(false, DataType::Byte)]
#[case(true, DataType::Byte)]
#[case(false, DataType::Float)]
#[case(true, DataType::Float)]
#[case(true, DataType::Short)]
fn test_forward_order_across_tiles(#[case] specialized: bool, #[case] data_type: DataType) {
    let image = gradient_image(Region::new(-3, 2, 11, 9), 4, 3, 2, data_type);
    let window = Region::new(-2, 3, 8, 6);

    let factory = factory(specialized);
    let mut iter = factory.rect(&image, Some(window)).unwrap();
    let seen = collect_forward(&mut *iter);
    iter.done();

    assert_eq!(seen, expected_forward(window, 2));
}

#[test]
fn test_whole_raster_when_no_window() {
    let mut raster = Raster::interleaved(DataType::Byte, Region::new(100, 200, 8, 8), 3).unwrap();
    for y in 200..208 {
        for x in 100..108 {
            raster.set_pixel(x, y, &[sample_value(x, y, 0), sample_value(x, y, 1), sample_value(x, y, 2)]);
        }
    }

    let mut iter = rect_iter(&raster, None).unwrap();
    assert_eq!(iter.window(), raster.bounds());
    let seen = collect_forward(&mut *iter);
    assert_eq!(seen.len(), 192);
    assert_eq!(seen, expected_forward(raster.bounds(), 3));
}

#[test]
fn test_done_flags_report_passing_the_edge() {
    let raster = Raster::interleaved(DataType::Byte, Region::new(0, 0, 2, 2), 2).unwrap();
    let mut iter = rect_iter(&raster, None).unwrap();

    iter.start_pixels();
    assert!(!iter.next_pixel_done());
    assert!(iter.next_pixel_done());
    assert!(iter.finished_pixels());

    iter.start_bands();
    assert!(!iter.next_band_done());
    assert!(iter.next_band_done());
    assert!(iter.finished_bands());

    iter.start_lines();
    assert!(!iter.next_line_done());
    assert!(iter.next_line_done());
    assert!(iter.finished_lines());
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_jump_crosses_tiles(#[case] specialized: bool) {
    let image = gradient_image(Region::new(0, 0, 20, 20), 4, 4, 1, DataType::Byte);
    let factory = factory(specialized);
    let mut iter = factory.rect(&image, Some(Region::new(2, 2, 15, 15))).unwrap();

    iter.jump_lines(9).unwrap();
    iter.jump_pixels(13).unwrap();
    assert_eq!(iter.position(), (15, 11, 0));
    assert_eq!(iter.get_sample(), sample_value(15, 11, 0));

    iter.jump_pixels(-10).unwrap();
    assert_eq!(iter.get_sample(), sample_value(5, 11, 0));
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_jump_outside_window_leaves_position(#[case] specialized: bool) {
    let image = gradient_image(Region::new(0, 0, 12, 12), 4, 4, 1, DataType::Byte);
    let factory = factory(specialized);
    let mut iter = factory.rect(&image, Some(Region::new(1, 1, 6, 6))).unwrap();
    iter.jump_lines(2).unwrap();
    iter.jump_pixels(3).unwrap();

    match iter.jump_lines(4) {
        Err(TileError::OutOfBounds { axis, target, first, last }) => {
            assert_eq!(axis, "lines");
            assert_eq!(target, 7);
            assert_eq!((first, last), (1, 6));
        }
        other => panic!("expected OutOfBounds, got {:?}", other.map(|_| ())),
    }
    assert!(iter.jump_pixels(-5).is_err());

    assert_eq!(iter.position(), (4, 3, 0));
    assert_eq!(iter.get_sample(), sample_value(4, 3, 0));
}

#[test]
fn test_jump_to_window_edges_is_allowed() {
    let raster = Raster::interleaved(DataType::Byte, Region::new(0, 0, 5, 5), 1).unwrap();
    let mut iter = rect_iter(&raster, None).unwrap();
    assert!(iter.jump_pixels(4).is_ok());
    assert!(iter.jump_pixels(-4).is_ok());
    assert!(iter.jump_lines(5).is_err());
}

#[test]
fn test_pixel_reads_match_band_reads() {
    let image = gradient_image(Region::new(0, 0, 6, 6), 4, 4, 3, DataType::Float);
    let mut iter = rect_iter(&image, Some(Region::new(3, 3, 2, 2))).unwrap();

    let mut floats = [0f32; 3];
    iter.get_pixel_float(&mut floats);
    assert_eq!(iter.pixel(), vec![sample_value(3, 3, 0), sample_value(3, 3, 1), sample_value(3, 3, 2)]);
    assert_eq!(floats[2], sample_value(3, 3, 2) as f32);

    iter.next_pixel();
    let mut doubles = [0f64; 3];
    iter.get_pixel_double(&mut doubles);
    assert_eq!(doubles[1], iter.get_sample_double_at(1));
    assert_eq!(iter.get_sample_float_at(0), sample_value(4, 3, 0) as f32);
}

#[rstest]
#[case(false, DataType::Byte)]
#[case(true, DataType::Byte)]
#[case(false, DataType::Float)]
#[case(true, DataType::Float)]
fn test_writes_land_in_the_right_tiles(#[case] specialized: bool, #[case] data_type: DataType) {
    let mut image = gradient_image(Region::new(0, 0, 10, 7), 3, 3, 2, data_type);
    let window = Region::new(1, 1, 8, 5);

    let factory = factory(specialized);
    let mut iter = factory.rect_writable(&mut image, Some(window)).unwrap();
    iter.start_lines();
    while !iter.finished_lines() {
        iter.start_pixels();
        while !iter.finished_pixels() {
            let (x, y, _) = iter.position();
            iter.set_pixel(&[x + y, x * y]);
            iter.next_pixel();
        }
        iter.next_line();
    }
    iter.done();

    for y in 0..7 {
        for x in 0..10 {
            if window.contains(x, y) {
                assert_eq!(image.get_sample(x, y, 0), x + y);
                assert_eq!(image.get_sample(x, y, 1), x * y);
            } else {
                assert_eq!(image.get_sample(x, y, 0), sample_value(x, y, 0));
            }
        }
    }
}

#[test]
fn test_writable_band_setters_convert_like_the_buffer() {
    let mut raster = Raster::interleaved(DataType::Byte, Region::new(0, 0, 2, 1), 2).unwrap();
    {
        let mut iter = writable_rect_iter(&mut raster, None).unwrap();
        iter.set_sample(300);
        iter.next_band();
        iter.set_sample_float(7.9);
        iter.next_pixel();
        iter.set_sample_double_at(0, 12.5);
        iter.set_sample_at(1, -1);
        assert_eq!(iter.get_sample_at(1), 255);
    }
    assert_eq!(raster.get_pixel(0, 0), vec![44, 7]);
    assert_eq!(raster.get_pixel(1, 0), vec![12, 255]);
}

#[test]
fn test_fallback_and_specialized_write_identically() {
    let original = gradient_image(Region::new(-5, -5, 13, 11), 4, 5, 3, DataType::Byte);
    let mut results = Vec::new();

    for specialized in [false, true] {
        let mut image = original.clone();
        let factory = factory(specialized);
        let mut iter = factory.rect_writable(&mut image, Some(Region::new(-4, -3, 9, 8))).unwrap();
        iter.start_lines();
        while !iter.finished_lines() {
            iter.start_pixels();
            while !iter.finished_pixels() {
                iter.start_bands();
                while !iter.finished_bands() {
                    let value = iter.get_sample();
                    iter.set_sample_double(value as f64 * 1.5 + 0.25);
                    iter.next_band();
                }
                iter.next_pixel();
            }
            iter.next_line();
        }
        iter.done();
        results.push(image);
    }

    assert_eq!(results[0], results[1]);
    assert_ne!(results[0], original);
    assert_eq!(results[0].num_tiles_x(), 4);
}

/// A tiled image that reports one of its tiles as absent
struct SparseImage {
    image: TiledImage,
    hole: (i32, i32),
}

impl SparseImage {
    fn new(hole: (i32, i32)) -> Self {
        SparseImage {
            image: gradient_image(Region::new(0, 0, 8, 4), 4, 4, 1, DataType::Byte),
            hole,
        }
    }
}

impl TiledSource for SparseImage {
    fn bounds(&self) -> Region {
        TiledSource::bounds(&self.image)
    }

    fn sample_layout(&self) -> &SampleLayout {
        self.image.sample_layout()
    }

    fn tile_width(&self) -> i32 {
        self.image.tile_width()
    }

    fn tile_height(&self) -> i32 {
        self.image.tile_height()
    }

    fn tile_grid_x_offset(&self) -> i32 {
        self.image.tile_grid_x_offset()
    }

    fn tile_grid_y_offset(&self) -> i32 {
        self.image.tile_grid_y_offset()
    }

    fn tile(&self, tile_x: i32, tile_y: i32) -> Option<&Raster> {
        if (tile_x, tile_y) == self.hole {
            None
        } else {
            self.image.tile(tile_x, tile_y)
        }
    }
}

impl TiledSourceMut for SparseImage {
    fn tile_mut(&mut self, tile_x: i32, tile_y: i32) -> Option<&mut Raster> {
        if (tile_x, tile_y) == self.hole {
            None
        } else {
            self.image.tile_mut(tile_x, tile_y)
        }
    }

    fn tiles_mut(&mut self) -> Vec<&mut Raster> {
        let hole = self.hole;
        self.image
            .tiles_mut()
            .into_iter()
            .filter(|tile| (tile.min_x() / 4, tile.min_y() / 4) != hole)
            .collect()
    }
}

#[rstest]
#[case(false)]
#[case(true)]
#[should_panic(expected = "iterator moved to tile (1, 0)")]
fn test_stepping_onto_a_missing_tile_panics(#[case] specialized: bool) {
    let image = SparseImage::new((1, 0));
    let factory = factory(specialized);
    let mut iter = factory.rect(&image, None).unwrap();
    iter.start_lines();
    iter.start_pixels();
    for x in 0..4 {
        assert_eq!(iter.get_sample(), sample_value(x, 0, 0));
        iter.next_pixel();
    }
    iter.get_sample();
}

#[rstest]
#[case(false)]
#[case(true)]
#[should_panic(expected = "iterator moved to tile (1, 0)")]
fn test_jumping_onto_a_missing_tile_panics(#[case] specialized: bool) {
    let image = SparseImage::new((1, 0));
    let factory = factory(specialized);
    let mut iter = factory.rook(&image, None).unwrap();
    iter.end_lines();
    iter.start_pixels();
    iter.jump_pixels(6).unwrap();
    iter.get_sample();
}

#[test]
fn test_missing_first_tile_is_an_error_for_specialized_readers() {
    let image = SparseImage::new((0, 0));
    assert!(matches!(factory(true).rect(&image, None), Err(TileError::InvalidArgument(_))));
    // Windows that avoid the hole read normally
    let mut iter = factory(true).rect(&image, Some(Region::new(4, 0, 4, 4))).unwrap();
    assert_eq!(collect_forward(&mut *iter), expected_forward(Region::new(4, 0, 4, 4), 1));
}

#[test]
fn test_specialized_writers_need_every_tile() {
    let mut image = SparseImage::new((1, 0));
    assert!(matches!(factory(true).rect_writable(&mut image, None), Err(TileError::InvalidArgument(_))));
    assert!(matches!(factory(true).random_writable(&mut image, None), Err(TileError::InvalidArgument(_))));
}

#[test]
#[should_panic(expected = "iterator moved to tile (1, 0)")]
fn test_fallback_writer_panics_on_a_missing_tile() {
    let mut image = SparseImage::new((1, 0));
    let mut iter = factory(false).rect_writable(&mut image, None).unwrap();
    iter.start_lines();
    iter.start_pixels();
    iter.set_sample(1);
    iter.jump_pixels(4).unwrap();
    iter.set_sample(1);
}

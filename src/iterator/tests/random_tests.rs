//! Random access

use rstest::rstest;

use super::{factory, gradient_image, sample_value};
use crate::iterator::{random_iter, RandomIter, WritableRandomIter};
use crate::raster::{DataType, Raster, Region};

#[rstest]
#[case(false, DataType::Byte)]
#[case(true, DataType::Byte)]
#[case(false, DataType::Float)]
#[case(true, DataType::Float)]
#[case(true, DataType::Int)]
fn test_reads_in_any_order(#[case] specialized: bool, #[case] data_type: DataType) {
    let image = gradient_image(Region::new(-7, 3, 17, 12), 5, 4, 3, data_type);
    let window = Region::new(-6, 4, 14, 9);
    let factory = factory(specialized);
    let iter = factory.random(&image, Some(window)).unwrap();
    assert_eq!(iter.window(), window);

    // Bottom-right to top-left, columns before rows
    for x in (window.x..window.end_x()).rev() {
        for y in (window.y..window.end_y()).rev() {
            for b in (0..3).rev() {
                assert_eq!(iter.get_sample(x, y, b), sample_value(x, y, b));
            }
        }
    }

    let mut pixel = [0f64; 3];
    iter.get_pixel_double(2, 7, &mut pixel);
    assert_eq!(pixel, [sample_value(2, 7, 0) as f64, sample_value(2, 7, 1) as f64, sample_value(2, 7, 2) as f64]);
    iter.done();
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_random_writes(#[case] specialized: bool) {
    let mut image = gradient_image(Region::new(0, 0, 9, 9), 4, 4, 2, DataType::Byte);
    let factory = factory(specialized);
    {
        let mut iter = factory.random_writable(&mut image, Some(Region::new(2, 2, 6, 6))).unwrap();
        iter.set_pixel(7, 7, &[1, 2]);
        iter.set_sample(2, 2, 1, 9);
        iter.set_sample_double(4, 3, 0, 77.7);
        assert_eq!(iter.get_sample(7, 7, 1), 2);
        assert_eq!(iter.get_sample_float(4, 3, 0), 77.0);
    }

    assert_eq!(image.get_sample(7, 7, 0), 1);
    assert_eq!(image.get_sample(2, 2, 1), 9);
    assert_eq!(image.get_sample(4, 3, 0), 77);
    assert_eq!(image.get_sample(2, 2, 0), sample_value(2, 2, 0));
}

#[test]
fn test_random_over_single_raster() {
    let mut raster = Raster::interleaved(DataType::Float, Region::new(-10, -10, 4, 4), 1).unwrap();
    raster.set_sample_float(-8, -7, 0, 0.25);

    let iter = random_iter(&raster, None).unwrap();
    assert_eq!(iter.get_sample_float(-8, -7, 0), 0.25);
    assert_eq!(iter.get_sample(-8, -7, 0), 0);
    let mut pixel = [5];
    iter.get_pixel(-10, -10, &mut pixel);
    assert_eq!(pixel, [0]);
}

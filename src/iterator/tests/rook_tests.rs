//! Bidirectional traversal

use rstest::rstest;

use super::{expected_forward, factory, gradient_image, sample_value};
use crate::iterator::{rook_iter, RectTraversal, ReverseTraversal, RookIter, SampleRead, SampleWrite};
use crate::raster::{DataType, Raster, Region};

fn collect_backward(iter: &mut dyn RookIter) -> Vec<(i32, i32, i32, f64)> {
    let mut out = Vec::new();
    iter.end_lines();
    while !iter.finished_lines_top() {
        iter.end_pixels();
        while !iter.finished_pixels_left() {
            iter.end_bands();
            loop {
                let (x, y, b) = iter.position();
                out.push((x, y, b, iter.get_sample_double()));
                if iter.prev_band_done() {
                    break;
                }
            }
            iter.prev_pixel();
        }
        iter.prev_line();
    }
    out
}

#[rstest]
#[case(false, DataType::Byte)]
#[case(true, DataType::Byte)]
#[case(false, DataType::Float)]
#[case(true, DataType::Float)]
fn test_backward_order_is_forward_reversed(#[case] specialized: bool, #[case] data_type: DataType) {
    let image = gradient_image(Region::new(-6, -1, 14, 10), 5, 4, 2, data_type);
    let window = Region::new(-5, 0, 11, 8);

    let factory = factory(specialized);
    let mut iter = factory.rook(&image, Some(window)).unwrap();
    let seen = collect_backward(&mut *iter);

    let mut expected = expected_forward(window, 2);
    expected.reverse();
    assert_eq!(seen, expected);
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_step_back_and_forth_over_a_tile_edge(#[case] specialized: bool) {
    let image = gradient_image(Region::new(0, 0, 8, 8), 4, 4, 1, DataType::Byte);
    let factory = factory(specialized);
    let mut iter = factory.rook(&image, None).unwrap();

    iter.jump_pixels(3).unwrap();
    iter.next_pixel();
    assert_eq!(iter.get_sample(), sample_value(4, 0, 0));
    iter.prev_pixel();
    assert_eq!(iter.get_sample(), sample_value(3, 0, 0));
    iter.next_pixel();
    iter.next_pixel();
    iter.prev_pixel();
    assert_eq!(iter.get_sample(), sample_value(4, 0, 0));

    iter.jump_lines(4).unwrap();
    iter.prev_line();
    assert_eq!(iter.position(), (4, 3, 0));
    assert_eq!(iter.get_sample(), sample_value(4, 3, 0));
}

#[test]
fn test_end_moves_only_one_axis() {
    let image = gradient_image(Region::new(0, 0, 9, 7), 4, 4, 3, DataType::Byte);
    let mut iter = rook_iter(&image, Some(Region::new(1, 1, 6, 5))).unwrap();

    iter.jump_lines(2).unwrap();
    iter.next_band();
    iter.end_pixels();
    assert_eq!(iter.position(), (6, 3, 1));
    iter.end_lines();
    assert_eq!(iter.position(), (6, 5, 1));
    iter.end_bands();
    assert_eq!(iter.position(), (6, 5, 2));
    assert_eq!(iter.get_sample(), sample_value(6, 5, 2));
}

#[test]
fn test_prev_done_flags() {
    let raster = Raster::interleaved(DataType::Byte, Region::new(10, 10, 2, 2), 1).unwrap();
    let mut iter = rook_iter(&raster, None).unwrap();

    iter.end_pixels();
    assert!(!iter.prev_pixel_done());
    assert!(iter.prev_pixel_done());
    assert!(iter.finished_pixels_left());

    iter.end_lines();
    assert!(!iter.finished_lines_top());
    assert!(!iter.prev_line_done());
    assert!(iter.prev_line_done());
    assert!(iter.finished_lines_top());
    assert!(!iter.finished_lines());
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_writable_rook_writes_backward(#[case] specialized: bool) {
    let mut image = gradient_image(Region::new(0, 0, 6, 6), 4, 4, 1, DataType::Float);
    let factory = factory(specialized);
    {
        let mut iter = factory.rook_writable(&mut image, None).unwrap();
        let mut counter = 0;
        iter.end_lines();
        while !iter.finished_lines_top() {
            iter.end_pixels();
            while !iter.finished_pixels_left() {
                iter.set_sample_float(counter as f32 + 0.5);
                counter += 1;
                iter.prev_pixel();
            }
            iter.prev_line();
        }
    }

    assert_eq!(image.get_sample_double(5, 5, 0), 0.5);
    assert_eq!(image.get_sample_double(4, 5, 0), 1.5);
    assert_eq!(image.get_sample_double(0, 0, 0), 35.5);
}

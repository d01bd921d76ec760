//! Tests for tiled images and the single-raster adapter

use crate::raster::{
    pos_to_tile, ComponentLayout, DataType, Raster, Region, SampleLayout, TiledImage, TiledSource,
    TiledSourceMut,
};

fn byte_layout(width: usize, height: usize, bands: usize) -> SampleLayout {
    ComponentLayout::interleaved(DataType::Byte, width, height, bands).unwrap().into()
}

#[test]
fn test_pos_to_tile_floors_negative_positions() {
    assert_eq!(pos_to_tile(0, 0, 4), 0);
    assert_eq!(pos_to_tile(3, 0, 4), 0);
    assert_eq!(pos_to_tile(4, 0, 4), 1);
    assert_eq!(pos_to_tile(-1, 0, 4), -1);
    assert_eq!(pos_to_tile(-4, 0, 4), -1);
    assert_eq!(pos_to_tile(-5, 0, 4), -2);
    assert_eq!(pos_to_tile(7, 3, 4), 1);
}

#[test]
fn test_tile_grid_covers_bounds() {
    let image = TiledImage::with_grid_offset(Region::new(-2, 1, 10, 7), byte_layout(4, 4, 1), 0, 0).unwrap();

    assert_eq!(image.min_tile_x(), -1);
    assert_eq!(image.min_tile_y(), 0);
    assert_eq!(image.num_tiles_x(), 3);
    assert_eq!(image.num_tiles_y(), 2);
    assert_eq!(image.tiles().len(), 6);

    let tile = image.tile(-1, 0).unwrap();
    assert_eq!(tile.bounds(), Region::new(-4, 0, 4, 4));
    assert!(image.tile(2, 0).is_none());
    assert!(image.tile(0, -1).is_none());
}

#[test]
fn test_tiles_mut_is_row_major() {
    let mut image = TiledImage::new(Region::new(0, 0, 8, 8), byte_layout(4, 4, 1)).unwrap();
    let origins: Vec<(i32, i32)> = image.tiles_mut().iter().map(|t| (t.min_x(), t.min_y())).collect();
    assert_eq!(origins, vec![(0, 0), (4, 0), (0, 4), (4, 4)]);
}

#[test]
fn test_from_raster_and_back() {
    let bounds = Region::new(5, 7, 9, 6);
    let mut raster = Raster::interleaved(DataType::Byte, bounds, 3).unwrap();
    for y in bounds.y..bounds.end_y() {
        for x in bounds.x..bounds.end_x() {
            raster.set_pixel(x, y, &[x, y, x + y]);
        }
    }

    let image = TiledImage::from_raster(&raster, 4, 4).unwrap();
    assert_eq!(image.tiles().len(), 6);
    assert_eq!(image.get_sample(12, 11, 2), 23);

    let back = image.to_raster().unwrap();
    assert!(back.same_samples(&raster));
}

#[test]
fn test_put_tile_checks_grid() {
    let mut image = TiledImage::new(Region::new(0, 0, 8, 4), byte_layout(4, 4, 1)).unwrap();

    let mut tile = Raster::new(byte_layout(4, 4, 1), 4, 0).unwrap();
    tile.set_sample(5, 1, 0, 99);
    image.put_tile(tile).unwrap();
    assert_eq!(image.get_sample(5, 1, 0), 99);

    let misaligned = Raster::new(byte_layout(4, 4, 1), 2, 0).unwrap();
    assert!(image.put_tile(misaligned).is_err());
}

#[test]
fn test_raster_is_a_single_tile_source() {
    let raster = Raster::interleaved(DataType::Float, Region::new(3, -2, 5, 5), 2).unwrap();
    assert_eq!(raster.tile_width(), 5);
    assert_eq!(raster.min_tile_x(), 0);
    assert_eq!(raster.num_tiles_x(), 1);
    assert_eq!(raster.num_tiles_y(), 1);
    assert!(raster.tile(0, 0).is_some());
    assert!(raster.tile(1, 0).is_none());
}

//! Window resolution and implementation selection

use super::{collect_forward, expected_forward, gradient_image, sample_value};
use crate::errors::TileError;
use crate::iterator::{
    rect_iter, resolve_window, IterConstructors, IterRegistry, IteratorFactory, RandomIterCsm, RectIterCsm,
    RectTraversal, SampleRead,
};
use crate::raster::{DataType, LayoutKind, PackedLayout, Raster, Region, SampleLayout, TiledImage};

#[test]
fn test_window_is_clipped_to_bounds() {
    let bounds = Region::new(0, 0, 10, 10);
    assert_eq!(resolve_window(bounds, None).unwrap(), bounds);
    assert_eq!(
        resolve_window(bounds, Some(Region::new(-5, 8, 20, 20))).unwrap(),
        Region::new(0, 8, 10, 2)
    );
}

#[test]
fn test_disjoint_window_is_rejected() {
    let raster = Raster::interleaved(DataType::Byte, Region::new(0, 0, 4, 4), 1).unwrap();
    match rect_iter(&raster, Some(Region::new(10, 10, 2, 2))) {
        Err(TileError::InvalidArgument(_)) => {}
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("a disjoint window must be rejected"),
    };
}

#[test]
fn test_default_registry_specializes_bytes_and_floats() {
    let registry = IterRegistry::default();
    assert!(registry.is_specialized(LayoutKind::Component, DataType::Byte));
    assert!(registry.is_specialized(LayoutKind::Component, DataType::Float));
    assert!(!registry.is_specialized(LayoutKind::Component, DataType::UShort));
    assert!(!registry.is_specialized(LayoutKind::Packed, DataType::Byte));
    assert_eq!(registry.lookup(LayoutKind::Component, DataType::Double).name, "fallback");
    assert_eq!(registry.lookup(LayoutKind::Component, DataType::Byte).name, "component");
}

#[test]
fn test_unregister_falls_back() {
    let mut factory = IteratorFactory::default();
    let removed = factory.registry_mut().unregister(LayoutKind::Component, DataType::Byte);
    assert!(removed.is_some());
    assert_eq!(factory.registry().lookup(LayoutKind::Component, DataType::Byte).name, "fallback");

    let bounds = Region::new(0, 0, 7, 7);
    let image = gradient_image(bounds, 3, 3, 1, DataType::Byte);
    let mut iter = factory.rect(&image, None).unwrap();
    assert_eq!(collect_forward(&mut *iter), expected_forward(bounds, 1));
}

#[test]
fn test_register_replaces_constructors() {
    let mut registry = IterRegistry::new();
    assert!(registry
        .register(LayoutKind::Component, DataType::Short, IterConstructors::fallback())
        .is_none());
    let previous = registry.register(LayoutKind::Component, DataType::Byte, IterConstructors::component::<u8>());
    assert!(previous.is_none());
    assert!(registry.is_specialized(LayoutKind::Component, DataType::Byte));
}

#[test]
fn test_packed_layout_goes_through_the_fallback() {
    let layout = PackedLayout::new(DataType::Int, 4, 4, 4, vec![0xFF0000, 0x00FF00, 0x0000FF]).unwrap();
    let mut image = TiledImage::new(Region::new(0, 0, 6, 6), SampleLayout::from(layout)).unwrap();
    for y in 0..6 {
        for x in 0..6 {
            for b in 0..3 {
                image.set_sample(x, y, b, sample_value(x, y, b));
            }
        }
    }

    let mut iter = rect_iter(&image, Some(Region::new(2, 2, 4, 3))).unwrap();
    assert_eq!(collect_forward(&mut *iter), expected_forward(Region::new(2, 2, 4, 3), 3));
}

#[test]
fn test_specialized_constructors_check_the_layout() {
    let floats = Raster::interleaved(DataType::Float, Region::new(0, 0, 2, 2), 1).unwrap();
    assert!(RectIterCsm::<_, u8>::new(&floats, floats.bounds()).is_err());
    assert!(RectIterCsm::<_, f32>::new(&floats, floats.bounds()).is_ok());
    assert!(RandomIterCsm::<u8>::new(&floats, floats.bounds()).is_err());

    let packed = PackedLayout::new(DataType::Byte, 2, 2, 2, vec![0xF0, 0x0F]).unwrap();
    let raster = Raster::new(SampleLayout::from(packed), 0, 0).unwrap();
    assert!(RectIterCsm::<_, u8>::new(&raster, raster.bounds()).is_err());
}

#[test]
fn test_banded_layout_is_specialized_too() {
    use crate::raster::ComponentLayout;

    let layout = ComponentLayout::banded(DataType::Byte, 3, 3, 2).unwrap();
    let mut image = TiledImage::new(Region::new(0, 0, 5, 5), SampleLayout::from(layout)).unwrap();
    for y in 0..5 {
        for x in 0..5 {
            image.set_sample(x, y, 1, sample_value(x, y, 1));
        }
    }

    let mut iter = rect_iter(&image, None).unwrap();
    iter.jump_lines(4).unwrap();
    iter.jump_pixels(3).unwrap();
    assert_eq!(iter.get_sample_at(1), sample_value(3, 4, 1));
    assert_eq!(iter.get_sample_at(0), 0);
}

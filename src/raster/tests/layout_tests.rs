//! Tests for sample layouts and typed buffers

use crate::raster::{ComponentLayout, DataBuffer, DataType, PackedLayout, Raster, Region, SampleLayout};

#[test]
fn test_interleaved_offsets() {
    let layout = ComponentLayout::interleaved(DataType::Byte, 4, 3, 3).unwrap();
    assert_eq!(layout.pixel_stride(), 3);
    assert_eq!(layout.scanline_stride(), 12);
    assert_eq!(layout.offset(0, 0, 0), 0);
    assert_eq!(layout.offset(1, 0, 2), 5);
    assert_eq!(layout.offset(2, 1, 1), 12 + 6 + 1);
    assert_eq!(layout.num_banks(), 1);
    assert_eq!(layout.bank_size(0), 36);
    assert!(layout.is_pixel_interleaved());
}

#[test]
fn test_banded_uses_one_bank_per_band() {
    let layout = SampleLayout::from(ComponentLayout::banded(DataType::Short, 5, 2, 3).unwrap());
    assert_eq!(layout.bank_sizes(), vec![10, 10, 10]);

    let mut buffer = layout.create_buffer();
    layout.set_sample(4, 1, 2, -7, &mut buffer);
    assert_eq!(buffer.get_elem(2, 9), -7);
    assert_eq!(layout.get_sample(4, 1, 2, &buffer), -7);
    assert_eq!(layout.get_sample(4, 1, 1, &buffer), 0);
}

#[test]
fn test_component_layout_rejects_bad_shapes() {
    assert!(ComponentLayout::new(DataType::Byte, 0, 4, 1, 0, vec![0], vec![0]).is_err());
    assert!(ComponentLayout::new(DataType::Byte, 4, 4, 1, 4, vec![0, 0], vec![0]).is_err());
    assert!(ComponentLayout::new(DataType::Byte, 4, 4, 2, 4, vec![0], vec![0]).is_err());
    assert!(ComponentLayout::new(DataType::Byte, 4, 4, 0, 4, vec![0], vec![0]).is_err());
    assert!(ComponentLayout::new(DataType::Byte, 2, 1, usize::MAX, 0, vec![0], vec![0]).is_err());
    assert!(ComponentLayout::new(DataType::Byte, 1, 1, 1, 1, vec![0], vec![usize::MAX]).is_err());
}

#[test]
fn test_element_conversions() {
    let mut buffer = DataBuffer::new(DataType::Byte, 4, 1);
    buffer.set_elem(0, 0, 300);
    assert_eq!(buffer.get_elem(0, 0), 44);
    buffer.set_elem_float(0, 1, 200.9);
    assert_eq!(buffer.get_elem(0, 1), 200);

    let mut ushort = DataBuffer::new(DataType::UShort, 1, 1);
    ushort.set_elem(0, 0, -1);
    assert_eq!(ushort.get_elem(0, 0), 65535);

    let mut float = DataBuffer::new(DataType::Float, 1, 1);
    float.set_elem_double(0, 0, -2.75);
    assert_eq!(float.get_elem(0, 0), -2);
    assert_eq!(float.get_elem_float(0, 0), -2.75);
}

#[test]
fn test_packed_layout_masks() {
    // 5-6-5 RGB in 16-bit words
    let layout = PackedLayout::new(DataType::UShort, 2, 2, 2, vec![0xF800, 0x07E0, 0x001F]).unwrap();
    let layout = SampleLayout::from(layout);
    let mut buffer = layout.create_buffer();

    layout.set_pixel(1, 1, &[31, 63, 31], &mut buffer);
    assert_eq!(buffer.get_elem(0, 3), 0xFFFF);

    layout.set_sample(1, 1, 1, 0, &mut buffer);
    assert_eq!(layout.get_sample(1, 1, 0, &buffer), 31);
    assert_eq!(layout.get_sample(1, 1, 1, &buffer), 0);
    assert_eq!(layout.get_sample_float(1, 1, 2, &buffer), 31.0);
}

#[test]
fn test_packed_layout_rejects_bad_masks() {
    assert!(PackedLayout::new(DataType::Byte, 2, 2, 2, vec![0x0F, 0x1F0]).is_err());
    assert!(PackedLayout::new(DataType::Int, 2, 2, 2, vec![0b1010]).is_err());
    assert!(PackedLayout::new(DataType::Float, 2, 2, 2, vec![0xFF]).is_err());
    assert!(PackedLayout::new(DataType::Int, 2, 2, 2, vec![0]).is_err());
}

#[test]
fn test_raster_absolute_coordinates() {
    let mut raster = Raster::interleaved(DataType::Int, Region::new(-3, 10, 4, 2), 2).unwrap();
    assert_eq!(raster.bounds(), Region::new(-3, 10, 4, 2));

    raster.set_sample(-3, 10, 0, 5);
    raster.set_pixel(0, 11, &[-1, 9]);
    assert_eq!(raster.get_sample(-3, 10, 0), 5);
    assert_eq!(raster.get_pixel(0, 11), vec![-1, 9]);
    assert_eq!(raster.get_sample_double(0, 11, 1), 9.0);
}

#[test]
fn test_raster_from_parts_checks_buffer() {
    let layout = SampleLayout::from(ComponentLayout::interleaved(DataType::Byte, 4, 4, 3).unwrap());
    let short = DataBuffer::Byte(vec![vec![0; 47]]);
    assert!(Raster::from_parts(layout.clone(), short, 0, 0).is_err());

    let wrong_type = DataBuffer::Float(vec![vec![0.0; 48]]);
    assert!(Raster::from_parts(layout.clone(), wrong_type, 0, 0).is_err());

    let ok = DataBuffer::Byte(vec![vec![0; 48]]);
    assert!(Raster::from_parts(layout, ok, 0, 0).is_ok());
}

#[test]
fn test_with_size_keeps_band_mapping() {
    let layout = ComponentLayout::new(DataType::Byte, 4, 4, 4, 16, vec![0, 0, 0], vec![2, 1, 0]).unwrap();
    let resized = SampleLayout::from(layout).with_size(8, 2).unwrap();
    let component = resized.as_component().unwrap();
    assert_eq!(component.width(), 8);
    assert_eq!(component.scanline_stride(), 32);
    assert_eq!(component.band_offsets(), &[2, 1, 0]);
}

//! Tests for layout descriptors and buffer serialization

use std::io::Cursor;

use byteorder::{BigEndian, WriteBytesExt};

use crate::errors::TileError;
use crate::io::{read_buffer, read_layout, read_origin, write_buffer, write_layout, write_origin, MAX_BANK_ELEMENTS};
use crate::raster::{ComponentLayout, DataBuffer, DataType, PackedLayout, SampleLayout};

#[test]
fn test_component_descriptor_bytes() {
    let layout = SampleLayout::from(ComponentLayout::interleaved(DataType::Byte, 8, 8, 3).unwrap());
    let mut bytes = Vec::new();
    write_layout(&mut bytes, &layout).unwrap();

    let mut expected = b"SLD1".to_vec();
    expected.write_u8(0).unwrap();
    expected.write_u8(DataType::Byte.code()).unwrap();
    expected.write_u32::<BigEndian>(8).unwrap();
    expected.write_u32::<BigEndian>(8).unwrap();
    expected.write_u32::<BigEndian>(3).unwrap();
    expected.write_u32::<BigEndian>(24).unwrap();
    expected.write_u16::<BigEndian>(3).unwrap();
    for band in 0..3 {
        expected.write_u32::<BigEndian>(0).unwrap();
        expected.write_u32::<BigEndian>(band).unwrap();
    }
    assert_eq!(bytes, expected);

    let back = read_layout(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(back, layout);
}

#[test]
fn test_packed_descriptor_is_read_back() {
    let layout = SampleLayout::from(PackedLayout::new(DataType::Int, 5, 3, 6, vec![0xFF0000, 0xFF00, 0xFF]).unwrap());
    let mut bytes = Vec::new();
    write_layout(&mut bytes, &layout).unwrap();
    assert_eq!(read_layout(&mut Cursor::new(bytes)).unwrap(), layout);
}

#[test]
fn test_bad_magic_is_a_deserialization_error() {
    let mut cursor = Cursor::new(b"JUNKJUNKJUNK".to_vec());
    assert!(matches!(read_layout(&mut cursor), Err(TileError::Deserialization(_))));
}

#[test]
fn test_truncated_descriptor_is_a_deserialization_error() {
    let layout = SampleLayout::from(ComponentLayout::banded(DataType::Double, 4, 4, 2).unwrap());
    let mut bytes = Vec::new();
    write_layout(&mut bytes, &layout).unwrap();
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(read_layout(&mut Cursor::new(bytes)), Err(TileError::Deserialization(_))));
}

#[test]
fn test_invalid_layout_in_descriptor_is_rejected() {
    let mut bytes = b"SLD1".to_vec();
    bytes.write_u8(0).unwrap();
    bytes.write_u8(DataType::Byte.code()).unwrap();
    bytes.write_u32::<BigEndian>(4).unwrap();
    bytes.write_u32::<BigEndian>(4).unwrap();
    bytes.write_u32::<BigEndian>(1).unwrap();
    // Scanline shorter than a row
    bytes.write_u32::<BigEndian>(2).unwrap();
    bytes.write_u16::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(0).unwrap();
    bytes.write_u32::<BigEndian>(0).unwrap();
    assert!(matches!(read_layout(&mut Cursor::new(bytes)), Err(TileError::Deserialization(_))));
}

#[test]
fn test_buffers_keep_every_element_type() {
    let cases = vec![
        (DataType::UShort, DataBuffer::UShort(vec![vec![0, 1, 65535, 300]])),
        (DataType::Short, DataBuffer::Short(vec![vec![-32768, -1, 0, 32767]])),
        (DataType::Int, DataBuffer::Int(vec![vec![i32::MIN, -7, 7, i32::MAX]])),
        (DataType::Float, DataBuffer::Float(vec![vec![-0.5, 1.25, f32::MAX, 3.0]])),
        (DataType::Double, DataBuffer::Double(vec![vec![1e-300, -2.5, 0.0, 1e300]])),
    ];
    for (data_type, buffer) in cases {
        let layout = SampleLayout::from(ComponentLayout::interleaved(data_type, 2, 2, 1).unwrap());
        let mut bytes = Vec::new();
        write_buffer(&mut bytes, &buffer).unwrap();
        assert_eq!(read_buffer(&mut Cursor::new(bytes), &layout).unwrap(), buffer);
    }
}

#[test]
fn test_buffer_must_fit_the_layout() {
    let layout = SampleLayout::from(ComponentLayout::interleaved(DataType::Byte, 2, 2, 1).unwrap());

    let mut wrong_size = Vec::new();
    write_buffer(&mut wrong_size, &DataBuffer::Byte(vec![vec![1, 2, 3]])).unwrap();
    assert!(matches!(
        read_buffer(&mut Cursor::new(wrong_size), &layout),
        Err(TileError::Deserialization(_))
    ));

    let mut wrong_type = Vec::new();
    write_buffer(&mut wrong_type, &DataBuffer::Short(vec![vec![1, 2, 3, 4]])).unwrap();
    assert!(matches!(
        read_buffer(&mut Cursor::new(wrong_type), &layout),
        Err(TileError::Deserialization(_))
    ));
}

#[test]
fn test_origin_is_two_signed_words() {
    let mut bytes = Vec::new();
    write_origin(&mut bytes, -100, 200).unwrap();
    assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0x9C, 0, 0, 0, 200]);
    assert_eq!(read_origin(&mut Cursor::new(bytes)).unwrap(), (-100, 200));
}

/// One-pixel double layout whose band offset points four billion elements in
fn far_offset_stream() -> Vec<u8> {
    let mut bytes = b"SLD1".to_vec();
    bytes.write_u8(0).unwrap();
    bytes.write_u8(DataType::Double.code()).unwrap();
    bytes.write_u32::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(1).unwrap();
    bytes.write_u16::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(0).unwrap();
    bytes.write_u32::<BigEndian>(0xFFFF_FFFE).unwrap();
    write_origin(&mut bytes, 0, 0).unwrap();
    bytes.write_u8(DataType::Double.code()).unwrap();
    bytes.write_u16::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(0xFFFF_FFFF).unwrap();
    bytes
}

#[test]
fn test_oversized_bank_in_descriptor_is_rejected() {
    let bytes = far_offset_stream();
    assert_eq!(bytes.len(), 47);
    assert!(matches!(read_layout(&mut Cursor::new(&bytes)), Err(TileError::Deserialization(_))));

    let decoded = crate::codec::create_decoder("raw", &bytes[..]).unwrap().decode().unwrap();
    assert!(decoded.is_none());
}

#[test]
fn test_oversized_layouts_are_not_written() {
    let layout = SampleLayout::from(
        ComponentLayout::new(DataType::Byte, 1, 1, 1, 1, vec![0], vec![MAX_BANK_ELEMENTS]).unwrap(),
    );
    let mut bytes = Vec::new();
    assert!(matches!(write_layout(&mut bytes, &layout), Err(TileError::InvalidArgument(_))));
}

#[test]
fn test_bank_longer_than_the_stream_is_a_deserialization_error() {
    // Large enough that eager allocation would be noticeable, small enough to pass the descriptor limit
    let layout = SampleLayout::from(ComponentLayout::interleaved(DataType::Double, 4096, 4096, 1).unwrap());
    let mut bytes = Vec::new();
    bytes.write_u8(DataType::Double.code()).unwrap();
    bytes.write_u16::<BigEndian>(1).unwrap();
    bytes.write_u32::<BigEndian>(4096 * 4096).unwrap();
    bytes.extend_from_slice(&[0u8; 24]);

    assert!(matches!(
        read_buffer(&mut Cursor::new(bytes), &layout),
        Err(TileError::Deserialization(_))
    ));
}

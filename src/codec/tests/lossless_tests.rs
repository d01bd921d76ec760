//! Round trips through the raw, gzip and zstd codecs

use std::io::{self, Read};

use rstest::rstest;

use super::{ramp_raster, ramp_with_layout};
use crate::codec::{create_decoder, create_encoder, CodecParams};
use crate::errors::TileError;
use crate::raster::{ComponentLayout, DataType, PackedLayout, Raster, Region, SampleLayout};

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "link dropped"))
    }
}

fn round_trip(format: &str, tile: &Raster) -> Raster {
    let bytes = create_encoder(format, Vec::new(), None).unwrap().encode(tile).unwrap();
    let decoded = create_decoder(format, &bytes[..]).unwrap().decode().unwrap();
    decoded.expect("stream should decode").raster
}

#[rstest]
#[case("raw")]
#[case("gzip")]
#[case("zstd")]
fn test_tile_at_offset_keeps_origin_and_samples(#[case] format: &str) {
    let tile = ramp_raster(Region::new(100, 200, 8, 8), 3);
    let back = round_trip(format, &tile);

    assert_eq!(back.bounds(), Region::new(100, 200, 8, 8));
    assert_eq!(back.num_bands(), 3);
    assert_eq!(back.data_type(), DataType::Byte);
    let mut compared = 0;
    for y in 200..208 {
        for x in 100..108 {
            for b in 0..3 {
                assert_eq!(back.get_sample(x, y, b), tile.get_sample(x, y, b));
                compared += 1;
            }
        }
    }
    assert_eq!(compared, 192);
    assert_eq!(back, tile);
}

#[rstest]
#[case("raw", DataType::UShort)]
#[case("gzip", DataType::Short)]
#[case("zstd", DataType::Int)]
#[case("raw", DataType::Float)]
#[case("gzip", DataType::Double)]
fn test_banded_layouts_are_bit_exact(#[case] format: &str, #[case] data_type: DataType) {
    let layout = ComponentLayout::banded(data_type, 5, 7, 2).unwrap();
    let mut tile = Raster::new(layout.into(), -20, 13).unwrap();
    for y in 13..20 {
        for x in -20..-15 {
            tile.set_sample_double(x, y, 0, (x * y) as f64 * 1.5);
            tile.set_sample_double(x, y, 1, (x - y) as f64);
        }
    }

    let back = round_trip(format, &tile);
    assert_eq!(back.layout(), tile.layout());
    assert_eq!(back, tile);
}

#[test]
fn test_packed_layout_survives_compression() {
    let layout = PackedLayout::new(DataType::Int, 6, 4, 6, vec![0xFF0000, 0xFF00, 0xFF]).unwrap();
    let tile = ramp_with_layout(SampleLayout::from(layout), 0, 0);
    assert_eq!(round_trip("zstd", &tile), tile);
}

#[test]
fn test_raw_stream_starts_with_descriptor() {
    let tile = ramp_raster(Region::new(0, 0, 2, 2), 1);
    let bytes = create_encoder("raw", Vec::new(), None).unwrap().encode(&tile).unwrap();
    assert_eq!(&bytes[..4], b"SLD1");
}

#[rstest]
#[case("raw")]
#[case("gzip")]
#[case("zstd")]
fn test_unrecognized_content_decodes_to_none(#[case] format: &str) {
    let junk = b"definitely not a tile stream".to_vec();
    assert!(create_decoder(format, &junk[..]).unwrap().decode().unwrap().is_none());
}

#[test]
fn test_truncated_stream_decodes_to_none() {
    let tile = ramp_raster(Region::new(0, 0, 4, 4), 3);
    let mut bytes = create_encoder("raw", Vec::new(), None).unwrap().encode(&tile).unwrap();
    bytes.truncate(bytes.len() - 5);
    assert!(create_decoder("raw", &bytes[..]).unwrap().decode().unwrap().is_none());
}

#[test]
fn test_io_failures_are_errors() {
    let result = create_decoder("gzip", FailingReader).unwrap().decode();
    assert!(matches!(result, Err(TileError::IoError(_))));
}

#[test]
fn test_levels_are_checked_up_front() {
    let result = create_encoder("gzip", Vec::new(), Some(CodecParams::Gzip { level: 12 }));
    assert!(matches!(result, Err(TileError::InvalidArgument(_))));

    let result = create_encoder("zstd", Vec::new(), Some(CodecParams::Zstd { level: 0 }));
    assert!(matches!(result, Err(TileError::InvalidArgument(_))));

    let result = create_encoder("raw", Vec::new(), Some(CodecParams::Zstd { level: 3 }));
    assert!(matches!(result, Err(TileError::InvalidArgument(_))));
}

#[rstest]
#[case(0)]
#[case(9)]
fn test_gzip_levels_round_trip(#[case] level: u32) {
    let tile = ramp_raster(Region::new(3, 4, 16, 16), 4);
    let bytes = create_encoder("gzip", Vec::new(), Some(CodecParams::Gzip { level }))
        .unwrap()
        .encode(&tile)
        .unwrap();
    let back = create_decoder("gzip", &bytes[..]).unwrap().decode().unwrap().unwrap();
    assert_eq!(back.raster, tile);
}

//! Codec lookup, custom codecs and parameter/capability agreement

use std::io::{Read, Write};
use std::sync::Arc;

use super::ramp_raster;
use crate::capability::{CapabilityDescriptor, CodecRole, ParamValue};
use crate::codec::{
    create_decoder, create_encoder, default_registry, get_capability, CodecParams, CodecRegistry, DecodedTile,
    JpegParams, RawCodec, TileCodec,
};
use crate::errors::{TileError, TileResult};
use crate::raster::{Raster, Region};

/// Raw streams under another name
struct CopyCodec;

impl TileCodec for CopyCodec {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn encode(&self, tile: &Raster, _params: &CodecParams, sink: &mut dyn Write) -> TileResult<()> {
        RawCodec.encode(tile, &CodecParams::Raw, sink)
    }

    fn decode(&self, source: &mut dyn Read) -> TileResult<DecodedTile> {
        RawCodec.decode(source)
    }

    fn capability(&self, role: CodecRole) -> CapabilityDescriptor {
        CapabilityDescriptor::new(self.name(), role, Vec::new()).unwrap()
    }

    fn default_params(&self) -> CodecParams {
        CodecParams::Raw
    }
}

#[test]
fn test_default_formats() {
    assert_eq!(default_registry().names(), vec!["gzip", "jpeg", "raw", "zstd"]);
}

#[test]
fn test_lookup_ignores_case() {
    let tile = ramp_raster(Region::new(0, 0, 4, 4), 1);
    let bytes = create_encoder("GZip", Vec::new(), None).unwrap().encode(&tile).unwrap();
    let back = create_decoder("GZIP", &bytes[..]).unwrap().decode().unwrap().unwrap();
    assert_eq!(back.raster, tile);
}

#[test]
fn test_unknown_format() {
    assert!(matches!(create_encoder("webp", Vec::new(), None), Err(TileError::UnsupportedFormat(_))));
    assert!(matches!(create_decoder("webp", &b""[..]), Err(TileError::UnsupportedFormat(_))));
    assert!(matches!(get_capability("webp", CodecRole::Decoder), Err(TileError::UnsupportedFormat(_))));
}

#[test]
fn test_register_and_unregister() {
    let mut registry = CodecRegistry::new();
    assert!(registry.names().is_empty());
    assert!(registry.register(Arc::new(CopyCodec)).is_none());

    let tile = ramp_raster(Region::new(5, 5, 3, 3), 2);
    let bytes = registry.encoder("Copy", Vec::new(), None).unwrap().encode(&tile).unwrap();
    let back = registry.decoder("copy", &bytes[..]).unwrap().decode().unwrap().unwrap();
    assert_eq!(back.raster, tile);

    assert!(registry.unregister("COPY").is_some());
    assert!(matches!(registry.get("copy"), Err(TileError::UnsupportedFormat(_))));
}

#[test]
fn test_default_parameters_lie_in_the_encoder_descriptor() {
    for format in default_registry().names() {
        let codec = default_registry().get(format).unwrap();
        let descriptor = codec.capability(CodecRole::Encoder);
        assert_eq!(descriptor.format(), format);
        assert_eq!(descriptor.role(), CodecRole::Encoder);
        descriptor.check_values(&codec.default_params().to_values()).unwrap();
        // Descriptors of built-in codecs pass the checked constructor too
        CapabilityDescriptor::new(format, CodecRole::Encoder, descriptor.params().to_vec()).unwrap();
    }
}

#[test]
fn test_encoder_descriptors_name_only_accepted_parameters() {
    for format in default_registry().names() {
        let descriptor = get_capability(format, CodecRole::Encoder).unwrap();
        let values = descriptor.negotiated_values();
        assert_eq!(values.len(), descriptor.params().len(), "{}", format);
        CodecParams::from_values(format, &values).unwrap();
    }
}

#[test]
fn test_decoders_take_no_parameters() {
    for format in default_registry().names() {
        let descriptor = get_capability(format, CodecRole::Decoder).unwrap();
        assert_eq!(descriptor.role(), CodecRole::Decoder);
        assert!(descriptor.params().is_empty(), "{}", format);
    }
}

#[test]
fn test_recovered_parameters_lie_in_the_encoder_descriptor() {
    let tile = ramp_raster(Region::new(0, 0, 16, 16), 3);
    let bytes = create_encoder("jpeg", Vec::new(), None).unwrap().encode(&tile).unwrap();
    let decoded = create_decoder("jpeg", &bytes[..]).unwrap().decode().unwrap().unwrap();

    let values = decoded.params.to_values();
    assert!(!values.contains_key("write_table_info"));
    get_capability("jpeg", CodecRole::Encoder).unwrap().check_values(&values).unwrap();
}

#[test]
fn test_named_values_round_trip() {
    let mut jpeg = JpegParams::default();
    jpeg.set_quality(0.6).unwrap();
    jpeg.set_subsampling(1, 2, 1).unwrap();
    jpeg.set_subsampling(2, 2, 1).unwrap();
    jpeg.set_restart_interval(8);
    jpeg.set_write_jfif_header(false);

    let mut with_tables = JpegParams::default();
    with_tables.set_tables([3; 64], [5; 64]).unwrap();

    let cases = vec![
        CodecParams::Raw,
        CodecParams::Gzip { level: 1 },
        CodecParams::Zstd { level: 19 },
        CodecParams::Jpeg(jpeg),
        CodecParams::Jpeg(with_tables),
    ];
    for params in cases {
        let values = params.to_values();
        assert_eq!(CodecParams::from_values(params.format(), &values).unwrap(), params);
    }
}

#[test]
fn test_named_values_are_validated() {
    let mut values = CodecParams::defaults_for("gzip").unwrap().to_values();
    values.insert("level".to_string(), ParamValue::Int(10));
    assert!(CodecParams::from_values("gzip", &values).is_err());

    let mut values = CodecParams::defaults_for("jpeg").unwrap().to_values();
    values.insert("table_mapping".to_string(), ParamValue::IntList(vec![0, 1, 2, 0]));
    assert!(CodecParams::from_values("jpeg", &values).is_err());

    let mut values = CodecParams::defaults_for("jpeg").unwrap().to_values();
    values.insert("sharpness".to_string(), ParamValue::Int(1));
    assert!(CodecParams::from_values("jpeg", &values).is_err());

    assert!(matches!(
        CodecParams::from_values("tiff", &Default::default()),
        Err(TileError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_quality_alone_counts_as_set() {
    let mut values = std::collections::BTreeMap::new();
    values.insert("quality".to_string(), ParamValue::Float(0.4));
    match CodecParams::from_values("jpeg", &values).unwrap() {
        CodecParams::Jpeg(params) => {
            assert!(params.quality_set());
            assert!((params.quality() - 0.4).abs() < 1e-6);
        }
        other => panic!("expected jpeg parameters, got {:?}", other),
    }
}

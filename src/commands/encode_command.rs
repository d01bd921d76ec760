//! Image to tile pack command

use clap::ArgMatches;
use log::info;

use crate::api::TileKit;
use crate::capability::ParamValue;
use crate::codec::params::{LEVEL, QUALITY, QUALITY_SET};
use crate::codec::CodecParams;
use crate::commands::command_traits::Command;
use crate::commands::tile_size_arg;
use crate::errors::{TileError, TileResult};
use crate::raster::TiledImage;
use crate::utils::image_utils::load_image;
use crate::utils::progress::ProgressTracker;

/// Command for encoding every tile of an image into a tile pack
pub struct EncodeCommand<'a> {
    input_file: String,
    output_file: String,
    /// Codec name
    format: String,
    /// Parameters built from the defaults and the overrides on the command line
    params: CodecParams,
    tile_size: usize,
    kit: &'a TileKit,
}

impl<'a> EncodeCommand<'a> {
    pub fn new(args: &ArgMatches, kit: &'a TileKit) -> TileResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .ok_or_else(|| TileError::GenericError("Missing input file".to_string()))?
            .clone();
        let output_file = args
            .get_one::<String>("output")
            .ok_or_else(|| TileError::GenericError("Output file required for encoding".to_string()))?
            .clone();
        let format = args
            .get_one::<String>("format")
            .ok_or_else(|| TileError::GenericError("Missing tile format".to_string()))?
            .to_lowercase();

        let params = Self::build_params(&format, args)?;
        info!("Using {} tiles with parameters {:?}", format, params);

        Ok(EncodeCommand {
            input_file,
            output_file,
            format,
            params,
            tile_size: tile_size_arg(args)?,
            kit,
        })
    }

    /// Apply `--quality` and `--level` to the codec defaults
    ///
    /// Overrides go through the named values so the codec's own
    /// validation rejects ones it does not take.
    fn build_params(format: &str, args: &ArgMatches) -> TileResult<CodecParams> {
        let mut values = CodecParams::defaults_for(format)?.to_values();

        if let Some(quality) = args.get_one::<String>("quality") {
            let quality: f64 = quality
                .parse()
                .map_err(|_| TileError::InvalidArgument(format!("Invalid quality: {}", quality)))?;
            values.insert(QUALITY.to_string(), ParamValue::Float(quality));
            // A quality given on the command line replaces any tables
            values.insert(QUALITY_SET.to_string(), ParamValue::Bool(true));
        }
        if let Some(level) = args.get_one::<String>("level") {
            let level: i64 = level
                .parse()
                .map_err(|_| TileError::InvalidArgument(format!("Invalid level: {}", level)))?;
            values.insert(LEVEL.to_string(), ParamValue::Int(level));
        }

        CodecParams::from_values(format, &values)
    }
}

impl<'a> Command for EncodeCommand<'a> {
    fn execute(&self) -> TileResult<()> {
        info!("Encoding {} into {} ({} tiles)", self.input_file, self.output_file, self.format);

        let raster = load_image(&self.input_file)?;
        let image = TiledImage::from_raster(&raster, self.tile_size, self.tile_size)?;

        let progress = ProgressTracker::new(image.tiles().len() as u64, "Encoding tiles");
        let header = self.kit.write_pack_file(
            &image,
            &self.output_file,
            &self.format,
            Some(self.params.clone()),
            Some(&progress),
        )?;
        progress.finish();

        info!(
            "Encoded {} tiles of {}x{} covering {:?}",
            header.tile_count, header.tile_width, header.tile_height, header.bounds
        );
        Ok(())
    }
}

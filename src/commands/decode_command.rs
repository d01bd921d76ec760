//! Tile pack to image command

use clap::ArgMatches;
use log::info;

use crate::api::TileKit;
use crate::commands::command_traits::Command;
use crate::errors::{TileError, TileResult};
use crate::raster::TiledSource;
use crate::utils::image_utils::save_image;
use crate::utils::progress::ProgressTracker;
use crate::utils::tile_pack::read_header;

/// Command for decoding a tile pack into an image file
pub struct DecodeCommand<'a> {
    input_file: String,
    /// Image path; the extension picks the image format
    output_file: String,
    kit: &'a TileKit,
}

impl<'a> DecodeCommand<'a> {
    pub fn new(args: &ArgMatches, kit: &'a TileKit) -> TileResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .ok_or_else(|| TileError::GenericError("Missing input file".to_string()))?
            .clone();
        let output_file = args
            .get_one::<String>("output")
            .ok_or_else(|| TileError::GenericError("Output file required for decoding".to_string()))?
            .clone();

        Ok(DecodeCommand {
            input_file,
            output_file,
            kit,
        })
    }

    fn tile_count(&self) -> TileResult<u64> {
        let mut file = std::io::BufReader::new(std::fs::File::open(&self.input_file)?);
        let (header, _) = read_header(&mut file)?;
        info!(
            "Pack holds {} {} tiles of {}x{} covering {:?}",
            header.tile_count, header.format, header.tile_width, header.tile_height, header.bounds
        );
        Ok(header.tile_count as u64)
    }
}

impl<'a> Command for DecodeCommand<'a> {
    fn execute(&self) -> TileResult<()> {
        info!("Decoding {} into {}", self.input_file, self.output_file);

        let progress = ProgressTracker::new(self.tile_count()?, "Decoding tiles");
        let image = self.kit.read_pack_file(&self.input_file, Some(&progress))?;
        progress.finish();

        save_image(&image, &self.output_file)?;
        info!(
            "Wrote {}x{} image to {}",
            image.bounds().width,
            image.bounds().height,
            self.output_file
        );
        Ok(())
    }
}

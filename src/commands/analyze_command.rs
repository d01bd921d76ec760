//! Image layout and band statistics command

use clap::ArgMatches;
use log::info;

use crate::api::{Analysis, TileKit};
use crate::commands::command_traits::Command;
use crate::commands::tile_size_arg;
use crate::errors::{TileError, TileResult};

/// Command for analyzing how an image tiles and what its bands hold
pub struct AnalyzeCommand<'a> {
    /// Path to the input image
    input_file: String,
    /// Edge length of the square tiles
    tile_size: usize,
    /// Whether to list the codecs as well
    verbose: bool,
    kit: &'a TileKit,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `kit` - Iterators and codecs to use
    pub fn new(args: &ArgMatches, kit: &'a TileKit) -> TileResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .ok_or_else(|| TileError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(AnalyzeCommand {
            input_file,
            tile_size: tile_size_arg(args)?,
            verbose: args.get_flag("verbose"),
            kit,
        })
    }

    fn display_summary(&self, analysis: &Analysis) {
        info!("Image Analysis Results:");
        info!("  Dimensions: {}x{}", analysis.width, analysis.height);
        info!(
            "  Tiles: {}x{} of {}x{}",
            analysis.tiles_across, analysis.tiles_down, analysis.tile_size, analysis.tile_size
        );
        info!("  Layout: {}", analysis.layout);
        info!(
            "  Iterators: {}",
            if analysis.specialized { "specialized" } else { "fallback" }
        );
    }

    fn display_bands(&self, analysis: &Analysis) {
        info!("  Bands:");
        for stats in &analysis.bands {
            info!("    {}", stats);
        }
    }

    fn display_codecs(&self) {
        info!("  Available tile formats: {}", self.kit.codecs().names().join(", "));
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> TileResult<()> {
        info!("Analyzing file: {}", self.input_file);
        let analysis = self.kit.analyze(&self.input_file, self.tile_size)?;

        self.display_summary(&analysis);
        self.display_bands(&analysis);
        if self.verbose {
            self.display_codecs();
        }
        Ok(())
    }
}

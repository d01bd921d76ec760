//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod encode_command;
pub mod decode_command;
pub mod capabilities_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use encode_command::EncodeCommand;
pub use decode_command::DecodeCommand;
pub use capabilities_command::CapabilitiesCommand;

use clap::ArgMatches;

use crate::api::{TileKit, DEFAULT_TILE_SIZE};
use crate::errors::{TileError, TileResult};

/// Factory for creating command instances based on CLI arguments
pub struct TilekitCommandFactory;

impl TilekitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        TilekitCommandFactory
    }
}

impl Default for TilekitCommandFactory {
    fn default() -> Self {
        TilekitCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for TilekitCommandFactory {
    fn create_command(&self, args: &ArgMatches, kit: &'a TileKit) -> TileResult<Box<dyn Command + 'a>> {
        if args.get_flag("capabilities") {
            Ok(Box::new(CapabilitiesCommand::new(args, kit)?))
        } else if args.get_flag("encode") {
            Ok(Box::new(EncodeCommand::new(args, kit)?))
        } else if args.get_flag("decode") {
            Ok(Box::new(DecodeCommand::new(args, kit)?))
        } else {
            // Default to analyze command
            Ok(Box::new(AnalyzeCommand::new(args, kit)?))
        }
    }
}

/// The `--tile-size` argument, or the default edge length
pub(crate) fn tile_size_arg(args: &ArgMatches) -> TileResult<usize> {
    match args.get_one::<String>("tile-size") {
        Some(value) => match value.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(TileError::InvalidArgument(format!("Invalid tile size: {}", value))),
        },
        None => Ok(DEFAULT_TILE_SIZE),
    }
}

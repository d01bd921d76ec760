use clap::{Arg, ArgAction, Command as ClapCommand};
use log::{error, Level};
use std::process;

use tilekit::api::TileKit;
use tilekit::commands::{CommandFactory, TilekitCommandFactory};
use tilekit::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("tilekit")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Iterate, tile and encode raster images")
        .arg(
            Arg::new("input")
                .help("Input image, or tile pack when decoding")
                .required_unless_present("capabilities")
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Print tiling and band statistics (default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("encode")
                .short('e')
                .long("encode")
                .help("Encode every tile of the image into a tile pack")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["decode", "capabilities"]),
        )
        .arg(
            Arg::new("decode")
                .short('d')
                .long("decode")
                .help("Decode a tile pack into an image")
                .action(ArgAction::SetTrue)
                .conflicts_with("capabilities"),
        )
        .arg(
            Arg::new("capabilities")
                .long("capabilities")
                .help("Print codec capability descriptors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output tile pack or image file")
                .value_name("FILE")
                .required_if_eq_any([("encode", "true"), ("decode", "true")]),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Tile format (raw, gzip, zstd, jpeg)")
                .value_name("FORMAT")
                .default_value("zstd"),
        )
        .arg(
            Arg::new("quality")
                .short('q')
                .long("quality")
                .help("JPEG quality between 0.0 and 1.0")
                .value_name("QUALITY")
                .required(false),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .help("Compression level for gzip or zstd")
                .value_name("LEVEL")
                .required(false),
        )
        .arg(
            Arg::new("tile-size")
                .short('t')
                .long("tile-size")
                .help("Edge length of the square tiles")
                .value_name("PIXELS")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file instead of stderr only")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { Level::Debug } else { Level::Info };
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level.to_level_filter())
                .parse_default_env()
                .init();
        }
    }

    let kit = TileKit::new();
    let factory = TilekitCommandFactory::new();

    match factory.create_command(&matches, &kit) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

//! Utility modules for common functionality
//!
//! Logging, progress reporting, image conversion, band statistics and the
//! tile pack file format used by the binary.

pub mod logger;
pub mod progress;
pub mod image_utils;
pub mod statistics;
pub mod tile_pack;

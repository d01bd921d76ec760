//! Custom error types for raster iteration and tile coding

use std::fmt;
use std::io;

/// Tile-specific error types
#[derive(Debug)]
pub enum TileError {
    /// I/O error while reading or writing a tile stream
    IoError(io::Error),
    /// An argument was rejected before any work was done
    InvalidArgument(String),
    /// A relative seek would leave the iteration window
    OutOfBounds {
        /// Axis being moved ("lines" or "pixels")
        axis: &'static str,
        /// Requested destination coordinate
        target: i64,
        /// First valid coordinate (inclusive)
        first: i32,
        /// Last valid coordinate (inclusive)
        last: i32,
    },
    /// No codec is registered under this name
    UnsupportedFormat(String),
    /// The stream does not hold a recognizable serialized object
    Deserialization(String),
    /// The underlying encoder or decoder reported a failure
    CodecError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::IoError(e) => write!(f, "I/O error: {}", e),
            TileError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            TileError::OutOfBounds { axis, target, first, last } => write!(
                f,
                "Jump along {} to {} is outside the window [{}, {}]",
                axis, target, first, last
            ),
            TileError::UnsupportedFormat(name) => write!(f, "Unsupported tile format: {}", name),
            TileError::Deserialization(msg) => write!(f, "Unrecognized tile stream: {}", msg),
            TileError::CodecError(msg) => write!(f, "Codec error: {}", msg),
            TileError::GenericError(msg) => write!(f, "Tile error: {}", msg),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TileError {
    fn from(error: io::Error) -> Self {
        TileError::IoError(error)
    }
}

impl From<String> for TileError {
    fn from(msg: String) -> Self {
        TileError::GenericError(msg)
    }
}

/// Result type for tile operations
pub type TileResult<T> = Result<T, TileError>;

/// Shorthand for an [`TileError::InvalidArgument`] result
pub(crate) fn invalid<T>(msg: impl Into<String>) -> TileResult<T> {
    Err(TileError::InvalidArgument(msg.into()))
}

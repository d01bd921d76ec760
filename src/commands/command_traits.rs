//! Command pattern interfaces
//!
//! Each CLI operation is a [`Command`] built by a [`CommandFactory`] from the
//! parsed arguments. Commands borrow the [`TileKit`] they run against.

use crate::api::TileKit;
use crate::errors::TileResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> TileResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `kit` - Iterators and codecs the command runs with
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches, kit: &'a TileKit) -> TileResult<Box<dyn Command + 'a>>;
}

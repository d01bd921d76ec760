//! Codec capability listing command

use clap::ArgMatches;
use log::info;

use crate::api::TileKit;
use crate::capability::{CapabilityDescriptor, CodecRole};
use crate::commands::command_traits::Command;
use crate::errors::TileResult;

/// Command for printing what a codec accepts
pub struct CapabilitiesCommand<'a> {
    /// One format, or every registered one
    format: Option<String>,
    kit: &'a TileKit,
}

impl<'a> CapabilitiesCommand<'a> {
    pub fn new(args: &ArgMatches, kit: &'a TileKit) -> TileResult<Self> {
        // The format argument has a default for encoding; only an explicit one narrows the listing
        let format = match args.value_source("format") {
            Some(clap::parser::ValueSource::CommandLine) => args.get_one::<String>("format").cloned(),
            _ => None,
        };
        Ok(CapabilitiesCommand { format, kit })
    }

    fn display_descriptor(&self, descriptor: &CapabilityDescriptor) {
        info!("{} {}:", descriptor.format(), descriptor.role());
        if descriptor.params().is_empty() {
            info!("  (no parameters)");
        }
        for spec in descriptor.params() {
            info!("  {} in {} (default {})", spec.name, spec.domain, spec.default);
        }
    }
}

impl<'a> Command for CapabilitiesCommand<'a> {
    fn execute(&self) -> TileResult<()> {
        let formats: Vec<String> = match &self.format {
            Some(format) => vec![format.clone()],
            None => self.kit.codecs().names().into_iter().map(String::from).collect(),
        };

        for format in &formats {
            for role in [CodecRole::Encoder, CodecRole::Decoder] {
                self.display_descriptor(&self.kit.capability(format, role)?);
            }
            let agreed = self.kit.negotiated_capability(format)?;
            info!("  negotiated defaults: {:?}", agreed.negotiated_values());
        }
        Ok(())
    }
}

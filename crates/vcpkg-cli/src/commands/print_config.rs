//! `z-print-config`: dump the resolved configuration as JSON

use std::io::Write;

use vcpkg_args::{CmdArguments, CommandOptions, CommandStructure, ForwardingContext, ParsedArguments};

use crate::error::Result;

pub const COMMAND_STRUCTURE: CommandStructure =
    CommandStructure::new("vcpkg z-print-config", 0, 0, CommandOptions::EMPTY);

pub fn run(args: &CmdArguments, _parsed: &ParsedArguments, _forwarding: &mut ForwardingContext) -> Result<()> {
    // through Value so object keys come out sorted
    let value = serde_json::to_value(args.summary()).map_err(vcpkg_args::Error::from)?;
    let text = serde_json::to_string_pretty(&value).map_err(vcpkg_args::Error::from)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

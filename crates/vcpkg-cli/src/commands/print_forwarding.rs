//! `z-print-forwarding`: show what a recursively spawned child would receive

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use vcpkg_args::{CmdArguments, CommandOptions, CommandStructure, ForwardingContext, ParsedArguments};

use crate::error::Result;

pub const COMMAND_STRUCTURE: CommandStructure =
    CommandStructure::new("vcpkg z-print-forwarding", 0, 0, CommandOptions::EMPTY);

#[derive(Serialize)]
struct ForwardingView<'a> {
    arguments: &'a [String],
    environment: &'a BTreeMap<String, String>,
}

pub fn run(args: &CmdArguments, _parsed: &ParsedArguments, forwarding: &mut ForwardingContext) -> Result<()> {
    let invocation = forwarding.apply_process_recursion(args)?;

    let view = ForwardingView {
        arguments: &invocation.arguments,
        environment: &invocation.environment,
    };
    let text = serde_json::to_string_pretty(&view).map_err(vcpkg_args::Error::from)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

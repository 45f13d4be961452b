//! vcpkg CLI
//!
//! Resolves the startup configuration from the command line, response files
//! and the environment, then dispatches to a command.

mod commands;
mod error;
mod logging;
mod response_file;

use colored::Colorize;
use vcpkg_args::{CmdArguments, ForwardingContext, ProcessEnvironment};

use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        if e.is_fatal() {
            eprintln!("{}: {}", "internal error".red().bold(), e);
        } else {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(usage) = e.usage() {
                eprint!("{usage}");
            }
        }
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let raw = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned());
    let tokens = response_file::expand(raw)?;

    let mut args = CmdArguments::create_from_arg_sequence(&tokens).map_err(|e| {
        match commands::find_in_tokens(&tokens) {
            Some(entry) if e.is_user_error() => CliError::with_usage(e, entry.structure.usage()),
            _ => CliError::from(e),
        }
    })?;

    // Logging is best effort; a subscriber may already be installed
    let _ = logging::init(args.debug_enabled());

    let command_name = args.command().map(str::to_string);
    let entry = command_name.as_deref().and_then(commands::find);
    let usage = entry.map(|c| c.structure.usage());

    args.imbue_from_environment(&ProcessEnvironment)
        .map_err(|e| match &usage {
            Some(usage) if e.is_user_error() => CliError::with_usage(e, usage.clone()),
            _ => CliError::from(e),
        })?;
    args.debug_print_feature_flags();

    let Some(name) = command_name else {
        println!(
            "{} no command given; available commands: {}",
            "vcpkg".green().bold(),
            commands::known_names().cyan()
        );
        return Ok(());
    };
    let Some(command) = entry else {
        return Err(CliError::UnknownCommand {
            name,
            known: commands::known_names(),
        });
    };

    tracing::debug!(command = command.name, "dispatching");
    let parsed = args
        .parse_arguments(&command.structure)
        .map_err(|e| CliError::with_usage(e, command.structure.usage()))?;
    // the one forwarding context of this process
    let mut forwarding = ForwardingContext::new();
    (command.run)(&args, &parsed, &mut forwarding)
}

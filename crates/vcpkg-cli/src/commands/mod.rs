//! Command table for vcpkg-cli

pub mod print_config;
pub mod print_forwarding;

use vcpkg_args::{CmdArguments, CommandStructure, END_OF_OPTIONS, ForwardingContext, ParsedArguments};

use crate::error::Result;

/// Entry point of a command: resolved globals, its own parsed options and
/// the process's forwarding context.
pub type CommandFn = fn(&CmdArguments, &ParsedArguments, &mut ForwardingContext) -> Result<()>;

/// One row of the command table.
pub struct CommandEntry {
    pub name: &'static str,
    pub structure: CommandStructure,
    pub run: CommandFn,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "z-print-config",
        structure: print_config::COMMAND_STRUCTURE,
        run: print_config::run,
    },
    CommandEntry {
        name: "z-print-forwarding",
        structure: print_forwarding::COMMAND_STRUCTURE,
        run: print_forwarding::run,
    },
];

pub fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// First token before the option terminator that names a known command.
///
/// Used when parsing failed before a command could be selected.
pub fn find_in_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<&'static CommandEntry> {
    tokens
        .iter()
        .map(|token| token.as_ref())
        .take_while(|token| *token != END_OF_OPTIONS)
        .find_map(find)
}

/// Comma separated list of command names, for error messages.
pub fn known_names() -> String {
    COMMANDS.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_structure_is_valid() {
        for entry in COMMANDS {
            assert!(entry.structure.validate().is_ok(), "{}", entry.name);
        }
    }

    #[test]
    fn test_find_in_tokens_skips_options() {
        let found = find_in_tokens(&["--triplet=a", "z-print-config", "--triplet=b"]);
        assert_eq!(found.map(|c| c.name), Some("z-print-config"));
        assert!(find_in_tokens(&["--", "z-print-config"]).is_none());
        assert!(find_in_tokens(&["--triplet=a"]).is_none());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert!(find("Z-PRINT-CONFIG").is_some());
        assert!(find("install").is_none());
    }
}

//! Per-command option schema
//!
//! A [`CommandStructure`] is static data declared by each command: example
//! text, positional arity bounds, and the switches, settings and
//! multi-settings the command accepts on top of the global options.

use std::fmt;

use crate::error::{Error, Result};

/// Upper arity bound for commands that take any number of positionals.
pub const UNBOUNDED_ARITY: usize = usize::MAX;

/// Prefix that marks an option token.
pub const OPTION_PREFIX: &str = "--";

/// Prefix that turns a switch off (`--no-<name>`).
pub const NEGATION_PREFIX: &str = "no-";

/// Prefix of experimental option spellings (`--x-<name>`).
pub const EXPERIMENTAL_PREFIX: &str = "x-";

/// A boolean presence option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSwitch {
    pub name: &'static str,
    pub short_help_text: &'static str,
}

impl CommandSwitch {
    pub const fn new(name: &'static str, short_help_text: &'static str) -> Self {
        Self {
            name,
            short_help_text,
        }
    }
}

/// An option that holds exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSetting {
    pub name: &'static str,
    pub short_help_text: &'static str,
}

impl CommandSetting {
    pub const fn new(name: &'static str, short_help_text: &'static str) -> Self {
        Self {
            name,
            short_help_text,
        }
    }
}

/// An option that may repeat; every occurrence is kept in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMultiSetting {
    pub name: &'static str,
    pub short_help_text: &'static str,
}

impl CommandMultiSetting {
    pub const fn new(name: &'static str, short_help_text: &'static str) -> Self {
        Self {
            name,
            short_help_text,
        }
    }
}

/// The three option collections a command declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub switches: &'static [CommandSwitch],
    pub settings: &'static [CommandSetting],
    pub multisettings: &'static [CommandMultiSetting],
}

/// A command option matched by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredOption {
    Switch(&'static CommandSwitch),
    Setting(&'static CommandSetting),
    MultiSetting(&'static CommandMultiSetting),
}

impl DeclaredOption {
    /// Canonical (declared) name of the option.
    pub fn name(&self) -> &'static str {
        match self {
            DeclaredOption::Switch(s) => s.name,
            DeclaredOption::Setting(s) => s.name,
            DeclaredOption::MultiSetting(s) => s.name,
        }
    }
}

impl CommandOptions {
    pub const EMPTY: CommandOptions = CommandOptions {
        switches: &[],
        settings: &[],
        multisettings: &[],
    };

    /// Find the declared option a (lowercased) candidate name refers to.
    ///
    /// Returns the option and whether the candidate was the negated
    /// `no-<name>` form, which only ever matches switches.
    pub fn find(&self, candidate: &str) -> Option<(DeclaredOption, bool)> {
        if let Some(s) = self
            .switches
            .iter()
            .find(|s| equals_modulo_experimental(candidate, s.name))
        {
            return Some((DeclaredOption::Switch(s), false));
        }
        if let Some(s) = self
            .settings
            .iter()
            .find(|s| equals_modulo_experimental(candidate, s.name))
        {
            return Some((DeclaredOption::Setting(s), false));
        }
        if let Some(s) = self
            .multisettings
            .iter()
            .find(|s| equals_modulo_experimental(candidate, s.name))
        {
            return Some((DeclaredOption::MultiSetting(s), false));
        }

        let positive = candidate.strip_prefix(NEGATION_PREFIX)?;
        self.switches
            .iter()
            .find(|s| equals_modulo_experimental(positive, s.name))
            .map(|s| (DeclaredOption::Switch(s), true))
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty() && self.settings.is_empty() && self.multisettings.is_empty()
    }
}

/// Static description of one command.
///
/// `S` is the tool state handed to [`CommandStructure::valid_arguments`];
/// this crate never calls that callback itself, it only carries it for the
/// dispatch and completion layer.
pub struct CommandStructure<S: ?Sized = ()> {
    pub example_text: &'static str,
    pub minimum_arity: usize,
    pub maximum_arity: usize,
    pub options: CommandOptions,
    pub valid_arguments: Option<fn(&S) -> Vec<String>>,
}

impl<S: ?Sized> CommandStructure<S> {
    pub const fn new(
        example_text: &'static str,
        minimum_arity: usize,
        maximum_arity: usize,
        options: CommandOptions,
    ) -> Self {
        Self {
            example_text,
            minimum_arity,
            maximum_arity,
            options,
            valid_arguments: None,
        }
    }

    pub const fn with_valid_arguments(self, valid_arguments: fn(&S) -> Vec<String>) -> Self {
        Self {
            valid_arguments: Some(valid_arguments),
            ..self
        }
    }

    /// Reject structures whose bounds cannot be satisfied.
    pub fn validate(&self) -> Result<()> {
        if self.maximum_arity < self.minimum_arity {
            return Err(Error::InvalidSchema {
                example: self.example_text.to_string(),
                minimum: self.minimum_arity,
                maximum: self.maximum_arity,
            });
        }
        Ok(())
    }

    /// Check a positional argument count against the inclusive bounds.
    pub fn check_arity(&self, command: &str, actual: usize) -> Result<()> {
        if actual < self.minimum_arity || actual > self.maximum_arity {
            return Err(Error::Arity {
                command: command.to_string(),
                actual,
                minimum: self.minimum_arity,
                maximum: self.maximum_arity,
            });
        }
        Ok(())
    }

    /// Plain-text usage block shown after a user error.
    pub fn usage(&self) -> String {
        let mut out = format!("Example:\n  {}\n", self.example_text);
        if self.options.is_empty() {
            return out;
        }

        out.push_str("Options:\n");
        for s in self.options.switches {
            out.push_str(&format!("  --{:<30} {}\n", s.name, s.short_help_text));
        }
        for s in self.options.settings {
            let label = format!("{}=...", s.name);
            out.push_str(&format!("  --{:<30} {}\n", label, s.short_help_text));
        }
        for s in self.options.multisettings {
            let label = format!("{}=...", s.name);
            out.push_str(&format!("  --{:<30} {}\n", label, s.short_help_text));
        }
        out
    }
}

impl<S: ?Sized> Clone for CommandStructure<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for CommandStructure<S> {}

impl<S: ?Sized> fmt::Debug for CommandStructure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStructure")
            .field("example_text", &self.example_text)
            .field("minimum_arity", &self.minimum_arity)
            .field("maximum_arity", &self.maximum_arity)
            .field("options", &self.options)
            .field("valid_arguments", &self.valid_arguments.is_some())
            .finish()
    }
}

/// Compare an option name, treating `x-<name>` as an alias of `<name>`
/// for options that are not themselves experimental.
pub(crate) fn equals_modulo_experimental(candidate: &str, declared: &str) -> bool {
    match candidate.strip_prefix(EXPERIMENTAL_PREFIX) {
        Some(rest) if !declared.starts_with(EXPERIMENTAL_PREFIX) => rest == declared,
        _ => candidate == declared,
    }
}

//! Tokenizer and parser for raw command line arguments
//!
//! Turns the argument sequence (program name excluded) into a
//! [`RawArguments`] record. Global options are always recognized through the
//! [`OptionRegistry`]; command options are recognized when a
//! [`CommandStructure`] is supplied, and otherwise kept as pending options
//! that [`validate_pending`] checks once the command is known.
//!
//! Parsing is a pure function of its inputs: it never reads the environment.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::registry::{OptionKind, OptionRegistry};
use crate::schema::{CommandStructure, DeclaredOption, OPTION_PREFIX};
use crate::values::OptionValues;

/// Marks the end of options; every later token is positional.
pub const END_OF_OPTIONS: &str = "--";

/// Command options recognized against a [`CommandStructure`].
///
/// Keys are the declared option names. `switches` maps every switch that
/// appeared to its polarity (`--name` is true, `--no-name` is false).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArguments {
    pub switches: BTreeMap<String, bool>,
    pub settings: BTreeMap<String, String>,
    pub multisettings: BTreeMap<String, Vec<String>>,
}

impl ParsedArguments {
    pub fn read_setting(&self, name: &str) -> Option<&str> {
        self.settings.get(name).map(String::as_str)
    }

    pub fn read_multisetting(&self, name: &str) -> &[String] {
        self.multisettings
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True only when the switch was given in its positive form.
    pub fn has_switch(&self, name: &str) -> bool {
        self.switches.get(name).copied().unwrap_or(false)
    }

    fn set_switch(&mut self, name: &str, value: bool) -> Result<()> {
        match self.switches.insert(name.to_string(), value) {
            Some(previous) if previous != value => Err(Error::ConflictingSwitch {
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn set_setting(&mut self, name: &str, value: String) -> Result<()> {
        if self.settings.contains_key(name) {
            return Err(Error::DuplicateSetting {
                name: name.to_string(),
            });
        }
        self.settings.insert(name.to_string(), value);
        Ok(())
    }

    fn push_multisetting(&mut self, name: &str, value: String) {
        self.multisettings
            .entry(name.to_string())
            .or_default()
            .push(value);
    }
}

/// Options that matched no global option while the command was unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingOptions {
    /// `--name` tokens, lowercased
    pub switches: BTreeSet<String>,
    /// `--name=value` tokens, lowercased name, values in encounter order
    pub options: BTreeMap<String, Vec<String>>,
}

impl PendingOptions {
    pub fn is_empty(&self) -> bool {
        self.switches.is_empty() && self.options.is_empty()
    }
}

/// Everything the tokenizer extracted from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArguments {
    /// First positional token
    pub command: Option<String>,
    /// Remaining positional tokens
    pub command_arguments: Vec<String>,
    /// Global option values (argument tier)
    pub global: OptionValues,
    /// Command options, filled only when parsed with a command structure
    pub parsed: ParsedArguments,
    /// Unrecognized options, filled only when parsed without one
    pub pending: PendingOptions,
}

impl RawArguments {
    fn push_positional(&mut self, token: &str) {
        if self.command.is_none() {
            self.command = Some(token.to_string());
        } else {
            self.command_arguments.push(token.to_string());
        }
    }
}

/// `--name[=value]` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OptionToken {
    name: String,
    value: Option<String>,
}

impl OptionToken {
    /// Split an option token; the name is ASCII-lowercased, the value kept.
    fn split(token: &str) -> Self {
        let body = token.strip_prefix(OPTION_PREFIX).unwrap_or(token);
        match body.split_once('=') {
            Some((name, value)) => Self {
                name: name.to_ascii_lowercase(),
                value: Some(value.to_string()),
            },
            None => Self {
                name: body.to_ascii_lowercase(),
                value: None,
            },
        }
    }
}

/// Parse the argument sequence.
///
/// With `command`, command options are resolved in the same pass, unknown
/// options fail with [`Error::UnknownOption`] and the positional count is
/// checked against the structure's arity. Without it, unknown options are
/// kept in [`RawArguments::pending`].
pub fn parse_tokens<S: ?Sized>(
    tokens: &[String],
    command: Option<&CommandStructure<S>>,
) -> Result<RawArguments> {
    if let Some(structure) = command {
        structure.validate()?;
    }

    let registry = OptionRegistry::builtin();
    let mut out = RawArguments::default();
    let mut unknown = Vec::new();
    let mut positional_only = false;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        if token.is_empty() {
            continue;
        }
        if positional_only || !token.starts_with('-') || token == "-" {
            out.push_positional(token);
            continue;
        }
        if token == END_OF_OPTIONS {
            positional_only = true;
            continue;
        }
        if !token.starts_with(OPTION_PREFIX) {
            return Err(Error::ShortOption {
                token: token.clone(),
            });
        }

        let OptionToken { name, value } = OptionToken::split(token);

        if let Some((option, negated)) = registry.lookup_argument(&name) {
            let canonical = option.argument.unwrap_or_default();
            match option.kind {
                OptionKind::Switch => {
                    if value.is_some() {
                        return Err(Error::SwitchTakesNoValue {
                            name: canonical.to_string(),
                        });
                    }
                    out.global.set_switch(option.key, !negated, canonical)?;
                }
                OptionKind::Setting => {
                    let value = take_value(canonical, value, &mut iter)?;
                    out.global.set_setting(option.key, value, canonical)?;
                }
                OptionKind::MultiSetting => {
                    let value = take_value(canonical, value, &mut iter)?;
                    out.global.push_multisetting(option.key, value);
                }
            }
            continue;
        }

        let Some(structure) = command else {
            match value {
                Some(value) => out.pending.options.entry(name).or_default().push(value),
                None => {
                    out.pending.switches.insert(name);
                }
            }
            continue;
        };

        match structure.options.find(&name) {
            Some((DeclaredOption::Switch(switch), negated)) => {
                if value.is_some() {
                    return Err(Error::SwitchTakesNoValue {
                        name: switch.name.to_string(),
                    });
                }
                out.parsed.set_switch(switch.name, !negated)?;
            }
            Some((DeclaredOption::Setting(setting), _)) => {
                let value = take_value(setting.name, value, &mut iter)?;
                out.parsed.set_setting(setting.name, value)?;
            }
            Some((DeclaredOption::MultiSetting(multi), _)) => {
                let value = take_value(multi.name, value, &mut iter)?;
                out.parsed.push_multisetting(multi.name, value);
            }
            None => unknown.push(token.clone()),
        }
    }

    if let Some(structure) = command {
        let command_name = out.command.clone().unwrap_or_default();
        if !unknown.is_empty() {
            return Err(Error::UnknownOption {
                command: command_name,
                tokens: unknown,
            });
        }
        structure.check_arity(&command_name, out.command_arguments.len())?;
    }

    tracing::trace!(
        command = ?out.command,
        positionals = out.command_arguments.len(),
        pending = !out.pending.is_empty(),
        "parsed command line"
    );
    Ok(out)
}

/// Check pending options against a command structure once it is known.
///
/// Returns the command options merged into a copy of `parsed`; the arity
/// of `positional_count` is checked last.
pub fn validate_pending<S: ?Sized>(
    command: &str,
    positional_count: usize,
    parsed: &ParsedArguments,
    pending: &PendingOptions,
    structure: &CommandStructure<S>,
) -> Result<ParsedArguments> {
    structure.validate()?;

    let mut output = parsed.clone();
    let mut unknown = Vec::new();

    for name in &pending.switches {
        match structure.options.find(name) {
            Some((DeclaredOption::Switch(switch), negated)) => {
                output.set_switch(switch.name, !negated)?;
            }
            Some((declared, _)) => {
                return Err(Error::MissingValue {
                    name: declared.name().to_string(),
                });
            }
            None => unknown.push(format!("{OPTION_PREFIX}{name}")),
        }
    }

    for (name, values) in &pending.options {
        match structure.options.find(name) {
            Some((DeclaredOption::Switch(switch), _)) => {
                return Err(Error::SwitchTakesNoValue {
                    name: switch.name.to_string(),
                });
            }
            Some((DeclaredOption::Setting(setting), _)) => {
                if values.len() > 1 {
                    return Err(Error::DuplicateSetting {
                        name: setting.name.to_string(),
                    });
                }
                for value in values {
                    output.set_setting(setting.name, non_empty(setting.name, value)?)?;
                }
            }
            Some((DeclaredOption::MultiSetting(multi), _)) => {
                for value in values {
                    output.push_multisetting(multi.name, non_empty(multi.name, value)?);
                }
            }
            None => unknown.extend(
                values
                    .iter()
                    .map(|value| format!("{OPTION_PREFIX}{name}={value}")),
            ),
        }
    }

    if !unknown.is_empty() {
        return Err(Error::UnknownOption {
            command: command.to_string(),
            tokens: unknown,
        });
    }

    structure.check_arity(command, positional_count)?;
    Ok(output)
}

/// Take an option value from the inline `=value` or from the next token.
fn take_value<'a, I>(
    name: &str,
    inline: Option<String>,
    iter: &mut std::iter::Peekable<I>,
) -> Result<String>
where
    I: Iterator<Item = &'a String>,
{
    let value = match inline {
        Some(value) => value,
        None => iter
            .next_if(|next| !next.starts_with(OPTION_PREFIX))
            .cloned()
            .ok_or_else(|| Error::MissingValue {
                name: name.to_string(),
            })?,
    };
    non_empty(name, &value)
}

fn non_empty(name: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::EmptyValue {
            name: name.to_string(),
        });
    }
    Ok(value.to_string())
}

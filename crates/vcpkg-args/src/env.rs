//! Environment resolver
//!
//! Reads the registry-bound environment variables into an [`OptionValues`]
//! tier. The lookup is injected through the [`Environment`] trait so tests
//! can supply a fixed map instead of the process environment.

use std::collections::BTreeMap;
use std::env;

use crate::registry::{ListSyntax, OptionKind, OptionRegistry};
use crate::values::OptionValues;

/// Source of environment variables.
///
/// An unset variable and a variable set to the empty string both read as
/// absent.
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        env::var_os(name)
            .map(|value| value.to_string_lossy().into_owned())
            .filter(|value| !value.is_empty())
    }
}

/// A fixed set of variables, used by tests and by children reading a
/// captured environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvironment {
    variables: BTreeMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }
}

impl From<BTreeMap<String, String>> for MapEnvironment {
    fn from(variables: BTreeMap<String, String>) -> Self {
        Self { variables }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.variables
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name).filter(|value| !value.is_empty())
    }
}

/// Interpret an environment variable as a switch.
///
/// `0`, `false`, `no` and `off` (any case) turn the switch off; any other
/// non-empty value turns it on.
pub fn parse_env_bool(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    !matches!(normalized.as_str(), "0" | "false" | "no" | "off")
}

/// Split a list-valued variable; empty entries are dropped.
pub fn split_list(raw: &str, syntax: ListSyntax) -> Vec<String> {
    match syntax {
        ListSyntax::PathList => env::split_paths(raw)
            .map(|path| path.to_string_lossy().into_owned())
            .filter(|entry| !entry.is_empty())
            .collect(),
        ListSyntax::Comma => raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Read every environment-bound option of `registry` from `env`.
pub fn read_environment(env: &impl Environment, registry: OptionRegistry) -> OptionValues {
    let mut values = OptionValues::new();

    for option in registry.iter() {
        let Some(variable) = option.environment else {
            continue;
        };
        let Some(raw) = env.get(variable) else {
            continue;
        };

        tracing::debug!(variable, key = %option.key, "read option from environment");
        match option.kind {
            OptionKind::Switch => {
                values.switches.insert(option.key, parse_env_bool(&raw));
            }
            OptionKind::Setting => {
                values.settings.insert(option.key, raw);
            }
            OptionKind::MultiSetting => {
                let entries = split_list(&raw, option.list_syntax);
                if !entries.is_empty() {
                    values.multisettings.insert(option.key, entries);
                }
            }
        }
    }

    values
}

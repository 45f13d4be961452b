//! Governed option registry
//!
//! Maps stable [`OptionKey`]s to their descriptors. The registry replaces one
//! hand-written field and name constant per option: parsing, environment
//! reads, merging and forwarding all iterate it.

mod builtins;
mod types;

pub use builtins::{BUILTIN_COUNT, BUILTIN_OPTIONS, RECURSIVE_DATA_ENV};
pub use types::{Forwarding, GovernedOption, ListSyntax, OptionKey, OptionKind};

use crate::schema::{NEGATION_PREFIX, equals_modulo_experimental};

/// Lookup over a static table of governed options.
#[derive(Debug, Clone, Copy)]
pub struct OptionRegistry {
    options: &'static [GovernedOption],
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OptionRegistry {
    /// Registry over the built-in option table.
    pub fn builtin() -> Self {
        Self {
            options: BUILTIN_OPTIONS,
        }
    }

    /// Registry over a custom table.
    pub fn from_table(options: &'static [GovernedOption]) -> Self {
        Self { options }
    }

    pub fn get(&self, key: OptionKey) -> Option<&'static GovernedOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Find the option an argument name refers to.
    ///
    /// The name must already be lowercased. `x-<name>` matches a stable
    /// `<name>`, and `no-<name>` matches switches only. Returns the option
    /// and whether the negated form was used.
    pub fn lookup_argument(&self, name: &str) -> Option<(&'static GovernedOption, bool)> {
        let direct = self.options.iter().find(|o| {
            o.argument
                .is_some_and(|arg| equals_modulo_experimental(name, arg))
        });
        if let Some(option) = direct {
            return Some((option, false));
        }

        let positive = name.strip_prefix(NEGATION_PREFIX)?;
        self.options
            .iter()
            .filter(|o| o.kind == OptionKind::Switch)
            .find(|o| {
                o.argument
                    .is_some_and(|arg| equals_modulo_experimental(positive, arg))
            })
            .map(|o| (o, true))
    }

    /// Find the option bound to an environment variable.
    pub fn lookup_environment(&self, variable: &str) -> Option<&'static GovernedOption> {
        self.options
            .iter()
            .find(|o| o.environment == Some(variable))
    }

    pub fn iter(self) -> impl Iterator<Item = &'static GovernedOption> {
        self.options.iter()
    }

    /// Options passed down to child processes, in table order.
    pub fn forwardable(self) -> impl Iterator<Item = &'static GovernedOption> {
        self.options.iter().filter(|o| o.is_forwarded())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

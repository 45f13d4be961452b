//! Precedence merger
//!
//! Layers [`OptionValues`] tiers in precedence order and records, for every
//! governed option, which tier supplied the winning value. A multi-setting
//! list wins or loses as a whole.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::registry::{OptionKey, OptionKind, OptionRegistry};
use crate::tristate::TriState;
use crate::values::OptionValues;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSource {
    /// Explicit command line argument
    Argument,
    /// Payload inherited from a parent process
    RecursivePayload,
    /// Fresh environment scan
    Environment,
    /// Nothing set; the compiled default applies
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => write!(f, "argument"),
            Self::RecursivePayload => write!(f, "recursive-payload"),
            Self::Environment => write!(f, "environment"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Switch(bool),
    Setting(String),
    MultiSetting(Vec<String>),
}

/// A winning value and its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub value: ResolvedValue,
    pub source: ValueSource,
}

/// One input tier for [`merge`].
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub source: ValueSource,
    pub values: &'a OptionValues,
}

impl<'a> Layer<'a> {
    pub fn new(source: ValueSource, values: &'a OptionValues) -> Self {
        Self { source, values }
    }
}

/// Result of a merge: only options some tier set have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedValues {
    entries: BTreeMap<OptionKey, Resolved>,
}

impl MergedValues {
    pub fn get(&self, key: OptionKey) -> Option<&Resolved> {
        self.entries.get(&key)
    }

    /// Tier that decided `key`, [`ValueSource::Default`] when none did.
    pub fn source(&self, key: OptionKey) -> ValueSource {
        self.entries
            .get(&key)
            .map_or(ValueSource::Default, |resolved| resolved.source)
    }

    pub fn switch(&self, key: OptionKey) -> TriState {
        match self.entries.get(&key).map(|r| &r.value) {
            Some(ResolvedValue::Switch(value)) => TriState::from(*value),
            _ => TriState::Unset,
        }
    }

    pub fn setting(&self, key: OptionKey) -> Option<&str> {
        match self.entries.get(&key).map(|r| &r.value) {
            Some(ResolvedValue::Setting(value)) => Some(value),
            _ => None,
        }
    }

    pub fn multisetting(&self, key: OptionKey) -> &[String] {
        match self.entries.get(&key).map(|r| &r.value) {
            Some(ResolvedValue::MultiSetting(values)) => values,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &Resolved)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge `layers`, highest precedence first.
///
/// Pure: the same registry and layers always give the same result, so
/// re-running the merge never changes a resolved configuration.
pub fn merge(registry: OptionRegistry, layers: &[Layer<'_>]) -> MergedValues {
    let mut merged = MergedValues::default();

    for option in registry.iter() {
        let key = option.key;
        let winner = layers.iter().find_map(|layer| {
            let value = match option.kind {
                OptionKind::Switch => layer.values.switch(key).map(ResolvedValue::Switch),
                OptionKind::Setting => layer
                    .values
                    .setting(key)
                    .map(|v| ResolvedValue::Setting(v.to_string())),
                OptionKind::MultiSetting => {
                    let values = layer.values.multisetting(key);
                    (!values.is_empty()).then(|| ResolvedValue::MultiSetting(values.to_vec()))
                }
            }?;
            Some(Resolved {
                value,
                source: layer.source,
            })
        });

        match winner {
            Some(resolved) => {
                tracing::debug!(key = %key, source = %resolved.source, "resolved option");
                merged.entries.insert(key, resolved);
            }
            None => tracing::trace!(key = %key, "option left at default"),
        }
    }

    merged
}

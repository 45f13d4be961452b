//! Raw per-tier option values
//!
//! One [`OptionValues`] holds what a single source (command line,
//! environment, recursion payload) said about the governed options, before
//! any precedence is applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::{Forwarding, OptionKey, OptionKind, OptionRegistry};

/// Values contributed by one source, keyed by governed option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValues {
    pub switches: BTreeMap<OptionKey, bool>,
    pub settings: BTreeMap<OptionKey, String>,
    pub multisettings: BTreeMap<OptionKey, Vec<String>>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a switch; repeating it with the other polarity is an error.
    pub fn set_switch(&mut self, key: OptionKey, value: bool, name: &str) -> Result<()> {
        match self.switches.insert(key, value) {
            Some(previous) if previous != value => Err(Error::ConflictingSwitch {
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Record a single-value setting; a second assignment is an error.
    pub fn set_setting(&mut self, key: OptionKey, value: String, name: &str) -> Result<()> {
        if self.settings.contains_key(&key) {
            return Err(Error::DuplicateSetting {
                name: name.to_string(),
            });
        }
        self.settings.insert(key, value);
        Ok(())
    }

    /// Append one occurrence of a multi-setting.
    pub fn push_multisetting(&mut self, key: OptionKey, value: String) {
        self.multisettings.entry(key).or_default().push(value);
    }

    pub fn switch(&self, key: OptionKey) -> Option<bool> {
        self.switches.get(&key).copied()
    }

    pub fn setting(&self, key: OptionKey) -> Option<&str> {
        self.settings.get(&key).map(String::as_str)
    }

    pub fn multisetting(&self, key: OptionKey) -> &[String] {
        self.multisettings
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether this source says anything about `key`.
    pub fn contains(&self, key: OptionKey) -> bool {
        self.switches.contains_key(&key)
            || self.settings.contains_key(&key)
            || self.multisettings.get(&key).is_some_and(|v| !v.is_empty())
    }

    /// Drop every value whose option is passed down to children, feature
    /// flags included.
    ///
    /// A forwarded child uses this on its fresh environment scan so that
    /// only the inherited payload decides forwarded fields.
    pub fn without_forwarded(mut self, registry: &OptionRegistry) -> Self {
        for option in registry.iter().filter(|o| o.forwarding != Forwarding::Local) {
            match option.kind {
                OptionKind::Switch => {
                    self.switches.remove(&option.key);
                }
                OptionKind::Setting => {
                    self.settings.remove(&option.key);
                }
                OptionKind::MultiSetting => {
                    self.multisettings.remove(&option.key);
                }
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty() && self.settings.is_empty() && self.multisettings.is_empty()
    }
}

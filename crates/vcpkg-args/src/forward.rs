//! Forwarding builder
//!
//! When the tool re-invokes itself it hands the child two things: the
//! argument-sourced global options as `--name=value` tokens, and a JSON
//! payload in [`RECURSIVE_DATA_ENV`] holding every forwarded value that came
//! from the environment together with the resolved feature flags. A child that sees the payload uses it instead of
//! its own environment scan, so its configuration cannot drift from the
//! parent's.
//!
//! Building the child invocation is guarded by a [`ForwardingContext`]: the
//! second attempt in one process fails with [`Error::RecursionMisuse`].

use std::collections::BTreeMap;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::args::CmdArguments;
use crate::error::{Error, Result};
use crate::features::FeatureStates;
use crate::merge::{MergedValues, ResolvedValue, ValueSource};
use crate::registry::{Forwarding, OptionKey, OptionKind, OptionRegistry, RECURSIVE_DATA_ENV};
use crate::schema::OPTION_PREFIX;
use crate::values::OptionValues;

/// One forwarded value in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadEntry {
    Single(String),
    List(Vec<String>),
}

/// Side channel contents, keyed by environment variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecursionPayload {
    entries: BTreeMap<String, PayloadEntry>,
}

impl RecursionPayload {
    /// Collect forwarded values that did not come from an argument, plus
    /// the resolved state of every capability.
    pub fn from_merged(merged: &MergedValues, features: &FeatureStates, registry: OptionRegistry) -> Self {
        let mut entries = BTreeMap::new();

        if let Some(variable) = registry
            .get(OptionKey::FeatureFlags)
            .and_then(|option| option.environment)
        {
            entries.insert(variable.to_string(), PayloadEntry::List(features.resolved_flags()));
        }

        for option in registry.forwardable() {
            let Some(variable) = option.environment else {
                continue;
            };
            let Some(resolved) = merged.get(option.key) else {
                continue;
            };
            if !matches!(
                resolved.source,
                ValueSource::Environment | ValueSource::RecursivePayload
            ) {
                continue;
            }
            let entry = match &resolved.value {
                ResolvedValue::Setting(value) => PayloadEntry::Single(value.clone()),
                ResolvedValue::MultiSetting(values) => PayloadEntry::List(values.clone()),
                ResolvedValue::Switch(_) => continue,
            };
            entries.insert(variable.to_string(), entry);
        }

        Self { entries }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::InvalidRecursionPayload {
            variable: RECURSIVE_DATA_ENV.to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Turn the payload back into an option tier.
    ///
    /// Variables the registry keeps local or does not know are skipped with
    /// a warning, so an older child tolerates a newer parent's payload.
    pub fn to_values(&self, registry: OptionRegistry) -> Result<OptionValues> {
        let mut values = OptionValues::new();

        for (variable, entry) in &self.entries {
            let Some(option) = registry
                .lookup_environment(variable)
                .filter(|option| option.forwarding != Forwarding::Local)
            else {
                tracing::warn!(variable = %variable, "ignoring unknown entry in recursion payload");
                continue;
            };

            match (option.kind, entry) {
                (OptionKind::Setting, PayloadEntry::Single(value)) => {
                    values.settings.insert(option.key, value.clone());
                }
                (OptionKind::MultiSetting, PayloadEntry::List(list)) => {
                    if !list.is_empty() {
                        values.multisettings.insert(option.key, list.clone());
                    }
                }
                _ => {
                    return Err(Error::InvalidRecursionPayload {
                        variable: RECURSIVE_DATA_ENV.to_string(),
                        message: format!("entry '{variable}' has the wrong shape for a {:?}", option.kind),
                    });
                }
            }
        }

        Ok(values)
    }

    pub fn get(&self, variable: &str) -> Option<&PayloadEntry> {
        self.entries.get(variable)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the argument line a child receives.
///
/// Argument-sourced forwarded options come first in registry order, one
/// token per value; then one `--feature-flags=` token if any capability is
/// explicit. Local switches and positional arguments never appear.
pub fn build_forwardable_arguments(
    merged: &MergedValues,
    features: &FeatureStates,
    registry: OptionRegistry,
) -> Vec<String> {
    let mut out = Vec::new();

    for option in registry.forwardable() {
        let (Some(argument), Some(resolved)) = (option.argument, merged.get(option.key)) else {
            continue;
        };
        if resolved.source != ValueSource::Argument {
            continue;
        }
        match &resolved.value {
            ResolvedValue::Setting(value) => out.push(format!("{OPTION_PREFIX}{argument}={value}")),
            ResolvedValue::MultiSetting(values) => out.extend(
                values
                    .iter()
                    .map(|value| format!("{OPTION_PREFIX}{argument}={value}")),
            ),
            ResolvedValue::Switch(_) => {}
        }
    }

    if let Some(list) = features.to_flag_list() {
        let name = registry
            .get(OptionKey::FeatureFlags)
            .and_then(|option| option.argument)
            .unwrap_or("feature-flags");
        out.push(format!("{OPTION_PREFIX}{name}={list}"));
    }

    out
}

/// Initialization state of the process recursion step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitState {
    #[default]
    Fresh,
    Applied,
}

/// Arguments and environment for a recursively spawned child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildInvocation {
    /// Global options to place before the child's command and positionals
    pub arguments: Vec<String>,
    /// Variables to set on the child
    pub environment: BTreeMap<String, String>,
}

impl ChildInvocation {
    /// Add the forwarded arguments and environment to `command`.
    ///
    /// The parent's own environment is left untouched.
    pub fn apply_to<'a>(&self, command: &'a mut Command) -> &'a mut Command {
        command.args(&self.arguments).envs(&self.environment)
    }
}

/// Owned guard around the once-per-process recursion step.
///
/// The guard only covers calls made through the same context: the caller
/// must create exactly one per process, at startup, and pass it by `&mut`
/// to whatever spawns children.
#[derive(Debug, Default)]
pub struct ForwardingContext {
    state: InitState,
}

impl ForwardingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// Build the child invocation for `args`.
    ///
    /// A forwarded child passes on the payload it received, so nested
    /// children see the same values. Calling this twice is a bug in the
    /// caller and fails with [`Error::RecursionMisuse`].
    pub fn apply_process_recursion(&mut self, args: &CmdArguments) -> Result<ChildInvocation> {
        if self.state == InitState::Applied {
            tracing::error!("process recursion applied twice");
            return Err(Error::RecursionMisuse);
        }
        self.state = InitState::Applied;

        let payload = args.recursion_payload();
        let mut environment = BTreeMap::new();
        environment.insert(RECURSIVE_DATA_ENV.to_string(), payload.to_json()?);

        tracing::debug!(
            arguments = args.forwardable_arguments().len(),
            payload_entries = payload.entries.len(),
            forwarded_child = args.is_forwarded_child(),
            "prepared child invocation"
        );

        Ok(ChildInvocation {
            arguments: args.forwardable_arguments().to_vec(),
            environment,
        })
    }
}

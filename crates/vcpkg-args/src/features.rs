//! Feature flag engine
//!
//! Each capability can be addressed by its legacy switch (`--binarycaching`,
//! `--no-manifests`, ...) and by the combined flag list
//! (`--feature-flags=binarycaching,-manifests` or `VCPKG_FEATURE_FLAGS`).
//! [`reconcile`] folds both channels into one tri-state per capability and
//! rejects contradictions.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::registry::OptionKey;
use crate::tristate::TriState;

/// Markers that disable a capability inside the flag list.
pub const NEGATION_MARKERS: [char; 2] = ['-', '!'];

/// An optional capability governed by a feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    BinaryCaching,
    CompilerTracking,
    Manifests,
    Registries,
    Versions,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::BinaryCaching,
        Feature::CompilerTracking,
        Feature::Manifests,
        Feature::Registries,
        Feature::Versions,
    ];

    /// Name used in the combined flag list.
    pub fn flag_name(self) -> &'static str {
        match self {
            Feature::BinaryCaching => "binarycaching",
            Feature::CompilerTracking => "compilertracking",
            Feature::Manifests => "manifests",
            Feature::Registries => "registries",
            Feature::Versions => "versions",
        }
    }

    /// Registry key of the legacy switch.
    pub fn option_key(self) -> OptionKey {
        match self {
            Feature::BinaryCaching => OptionKey::BinaryCaching,
            Feature::CompilerTracking => OptionKey::CompilerTracking,
            Feature::Manifests => OptionKey::Manifests,
            Feature::Registries => OptionKey::Registries,
            Feature::Versions => OptionKey::Versions,
        }
    }

    /// Compiled default when neither channel says anything.
    pub fn default_enabled(self) -> bool {
        true
    }

    /// Look a list entry up; the hyphenated key spelling is accepted too.
    pub fn from_flag_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| {
            name.eq_ignore_ascii_case(f.flag_name()) || name.eq_ignore_ascii_case(f.option_key().as_str())
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// Parsed combined flag list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagList {
    /// Explicit value per mentioned capability; the last mention wins
    pub entries: BTreeMap<Feature, bool>,
    /// Names no capability matched, in encounter order
    pub unknown: Vec<String>,
}

impl FlagList {
    /// Parse list values; each value may itself hold comma separated entries.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Self {
        let mut list = FlagList::default();

        for entry in values.iter().flat_map(|v| v.as_ref().split(',')) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, enabled) = match entry.strip_prefix(NEGATION_MARKERS) {
                Some(rest) => (rest.trim_start(), false),
                None => (entry, true),
            };
            match Feature::from_flag_name(name) {
                Some(feature) => {
                    list.entries.insert(feature, enabled);
                }
                None => list.unknown.push(name.to_string()),
            }
        }

        list
    }

    pub fn get(&self, feature: Feature) -> TriState {
        TriState::from(self.entries.get(&feature).copied())
    }
}

/// Resolved tri-state of every capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureStates {
    binary_caching: TriState,
    compiler_tracking: TriState,
    manifests: TriState,
    registries: TriState,
    versions: TriState,
}

impl FeatureStates {
    pub fn get(&self, feature: Feature) -> TriState {
        match feature {
            Feature::BinaryCaching => self.binary_caching,
            Feature::CompilerTracking => self.compiler_tracking,
            Feature::Manifests => self.manifests,
            Feature::Registries => self.registries,
            Feature::Versions => self.versions,
        }
    }

    fn set(&mut self, feature: Feature, state: TriState) {
        let slot = match feature {
            Feature::BinaryCaching => &mut self.binary_caching,
            Feature::CompilerTracking => &mut self.compiler_tracking,
            Feature::Manifests => &mut self.manifests,
            Feature::Registries => &mut self.registries,
            Feature::Versions => &mut self.versions,
        };
        *slot = state;
    }

    /// Concrete value, falling back to the compiled default.
    pub fn enabled(&self, feature: Feature) -> bool {
        self.get(feature).unwrap_or(feature.default_enabled())
    }

    /// Capabilities with an explicit value, in [`Feature::ALL`] order.
    pub fn explicit(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        Feature::ALL
            .into_iter()
            .filter_map(|f| self.get(f).value().map(|v| (f, v)))
    }

    /// Flag list naming every explicit capability, `-` marking disabled
    /// ones; `None` when nothing is explicit.
    pub fn to_flag_list(&self) -> Option<String> {
        let entries: Vec<String> = self
            .explicit()
            .map(|(f, enabled)| {
                if enabled {
                    f.flag_name().to_string()
                } else {
                    format!("-{}", f.flag_name())
                }
            })
            .collect();
        (!entries.is_empty()).then(|| entries.join(","))
    }

    /// Every capability with its concrete value, `-` marking disabled ones.
    ///
    /// Unlike [`to_flag_list`](Self::to_flag_list) this pins defaults too,
    /// so a reader with a different environment reaches the same states.
    pub fn resolved_flags(&self) -> Vec<String> {
        Feature::ALL
            .into_iter()
            .map(|f| {
                if self.enabled(f) {
                    f.flag_name().to_string()
                } else {
                    format!("-{}", f.flag_name())
                }
            })
            .collect()
    }

    pub fn settings(&self) -> FeatureFlagSettings {
        FeatureFlagSettings {
            binary_caching: self.enabled(Feature::BinaryCaching),
            compiler_tracking: self.enabled(Feature::CompilerTracking),
            manifests: self.enabled(Feature::Manifests),
            registries: self.enabled(Feature::Registries),
            versions: self.enabled(Feature::Versions),
        }
    }
}

/// Concrete capability values handed to the rest of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlagSettings {
    pub binary_caching: bool,
    pub compiler_tracking: bool,
    pub manifests: bool,
    pub registries: bool,
    pub versions: bool,
}

impl Default for FeatureFlagSettings {
    fn default() -> Self {
        FeatureStates::default().settings()
    }
}

/// Fold legacy switches and the flag list into one state per capability.
///
/// `switch_state` returns the merged tri-state of a capability's legacy
/// switch. When both channels are explicit and disagree this fails with
/// [`Error::FeatureFlagConflict`].
pub fn reconcile(switch_state: impl Fn(Feature) -> TriState, list: &FlagList) -> Result<FeatureStates> {
    let mut states = FeatureStates::default();

    for feature in Feature::ALL {
        let from_switch = switch_state(feature);
        let from_list = list.get(feature);

        if let (Some(switch_value), Some(list_value)) = (from_switch.value(), from_list.value()) {
            if switch_value != list_value {
                return Err(Error::FeatureFlagConflict {
                    feature: feature.flag_name().to_string(),
                    switch: feature.flag_name().to_string(),
                    switch_value,
                    list_value,
                });
            }
        }

        states.set(feature, from_switch.or(from_list));
    }

    Ok(states)
}

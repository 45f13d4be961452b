//! Resolved configuration
//!
//! [`CmdArguments`] is built in two steps:
//!
//! 1. [`CmdArguments::create_from_arg_sequence`] parses the tokens.
//! 2. [`CmdArguments::imbue_from_environment`] layers the environment (or an
//!    inherited recursion payload) underneath the arguments, reconciles the
//!    feature flags and computes the forwarding line.
//!
//! After that the value is read-only; every accessor takes `&self`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::env::{Environment, MapEnvironment, read_environment};
use crate::error::Result;
use crate::features::{Feature, FeatureFlagSettings, FeatureStates, FlagList, reconcile};
use crate::forward::{RecursionPayload, build_forwardable_arguments};
use crate::merge::{Layer, MergedValues, Resolved, ValueSource, merge};
use crate::parser::{ParsedArguments, PendingOptions, parse_tokens, validate_pending};
use crate::registry::{OptionKey, OptionKind, OptionRegistry, RECURSIVE_DATA_ENV};
use crate::schema::CommandStructure;
use crate::tristate::TriState;
use crate::values::OptionValues;

/// Fully resolved startup configuration.
#[derive(Debug, Clone)]
pub struct CmdArguments {
    registry: OptionRegistry,
    command: Option<String>,
    command_arguments: Vec<String>,
    arguments: OptionValues,
    pending: PendingOptions,
    merged: MergedValues,
    features: FeatureStates,
    forwarded_child: bool,
    forwardable_arguments: Vec<String>,
    warnings: Vec<String>,
}

/// Serializable view printed by `z-print-config`.
#[derive(Debug, Serialize)]
pub struct ConfigSummary<'a> {
    pub command: Option<&'a str>,
    pub command_arguments: &'a [String],
    pub options: &'a MergedValues,
    pub feature_flags: FeatureFlagSettings,
    pub forwarded_child: bool,
    pub forwardable_arguments: &'a [String],
    pub warnings: &'a [String],
}

/// One step of the resolution, as produced by [`resolve`].
struct Resolution {
    merged: MergedValues,
    features: FeatureStates,
    forwardable_arguments: Vec<String>,
    warnings: Vec<String>,
}

impl CmdArguments {
    /// Parse the argument sequence (program name excluded).
    ///
    /// Only the argument tier is applied; call
    /// [`imbue_from_environment`](Self::imbue_from_environment) before
    /// reading environment-backed values.
    pub fn create_from_arg_sequence<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        let raw = parse_tokens::<()>(&tokens, None)?;
        let registry = OptionRegistry::builtin();
        let resolution = resolve(registry, &raw.global, None, None)?;

        Ok(Self {
            registry,
            command: raw.command,
            command_arguments: raw.command_arguments,
            arguments: raw.global,
            pending: raw.pending,
            merged: resolution.merged,
            features: resolution.features,
            forwarded_child: false,
            forwardable_arguments: resolution.forwardable_arguments,
            warnings: resolution.warnings,
        })
    }

    /// Layer the environment under the arguments.
    ///
    /// When [`RECURSIVE_DATA_ENV`] is set this process is a forwarded child:
    /// the payload replaces the environment for every forwarded option.
    /// Running this again with the same environment gives the same result.
    pub fn imbue_from_environment(&mut self, env: &impl Environment) -> Result<()> {
        let mut environment = read_environment(env, self.registry);

        let payload = match env.get(RECURSIVE_DATA_ENV) {
            Some(raw) => {
                let values = RecursionPayload::from_json(&raw)?.to_values(self.registry)?;
                environment = environment.without_forwarded(&self.registry);
                tracing::debug!("using recursion payload from parent process");
                Some(values)
            }
            None => None,
        };

        let resolution = resolve(self.registry, &self.arguments, payload.as_ref(), Some(&environment))?;
        for warning in &resolution.warnings {
            tracing::warn!("{warning}");
        }

        self.forwarded_child = payload.is_some();
        self.merged = resolution.merged;
        self.features = resolution.features;
        self.forwardable_arguments = resolution.forwardable_arguments;
        self.warnings = resolution.warnings;
        Ok(())
    }

    /// [`imbue_from_environment`](Self::imbue_from_environment) over a fixed map.
    pub fn imbue_from_fake_environment(&mut self, env: &BTreeMap<String, String>) -> Result<()> {
        self.imbue_from_environment(&MapEnvironment::from(env.clone()))
    }

    /// Check the options the global registry did not recognize against the
    /// command's structure.
    pub fn parse_arguments<S: ?Sized>(&self, structure: &CommandStructure<S>) -> Result<ParsedArguments> {
        validate_pending(
            self.command.as_deref().unwrap_or_default(),
            self.command_arguments.len(),
            &ParsedArguments::default(),
            &self.pending,
            structure,
        )
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn command_arguments(&self) -> &[String] {
        &self.command_arguments
    }

    /// Global setting by argument name (`triplet`, `x-install-root`, ...).
    pub fn read_setting(&self, name: &str) -> Option<&str> {
        let key = self.lookup(name, OptionKind::Setting)?;
        self.merged.setting(key)
    }

    pub fn read_multisetting(&self, name: &str) -> &[String] {
        self.lookup(name, OptionKind::MultiSetting)
            .map(|key| self.merged.multisetting(key))
            .unwrap_or_default()
    }

    /// Concrete value of a global switch, defaulted when unset.
    pub fn switch_enabled(&self, name: &str) -> bool {
        self.lookup(name, OptionKind::Switch)
            .is_some_and(|key| self.switch_or_default(key))
    }

    pub fn resolved(&self, key: OptionKey) -> Option<&Resolved> {
        self.merged.get(key)
    }

    pub fn source(&self, key: OptionKey) -> ValueSource {
        self.merged.source(key)
    }

    pub fn switch_state(&self, key: OptionKey) -> TriState {
        self.merged.switch(key)
    }

    fn lookup(&self, name: &str, kind: OptionKind) -> Option<OptionKey> {
        let lowered = name.to_ascii_lowercase();
        self.registry
            .lookup_argument(&lowered)
            .filter(|(option, negated)| !negated && option.kind == kind)
            .map(|(option, _)| option.key)
    }

    fn switch_or_default(&self, key: OptionKey) -> bool {
        let default = self.registry.get(key).is_some_and(|o| o.default_enabled);
        self.merged.switch(key).unwrap_or(default)
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    pub fn vcpkg_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::VcpkgRoot)
    }

    pub fn manifest_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::ManifestRoot)
    }

    pub fn buildtrees_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::BuildtreesRoot)
    }

    pub fn downloads_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::DownloadsRoot)
    }

    pub fn install_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::InstallRoot)
    }

    pub fn packages_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::PackagesRoot)
    }

    pub fn scripts_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::ScriptsRoot)
    }

    pub fn builtin_ports_root_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::BuiltinPortsRoot)
    }

    pub fn builtin_registry_versions_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::BuiltinRegistryVersionsDir)
    }

    pub fn registries_cache_dir(&self) -> Option<&str> {
        self.merged.setting(OptionKey::RegistriesCache)
    }

    /// Only ever set from `VCPKG_VISUAL_STUDIO_PATH`.
    pub fn default_visual_studio_path(&self) -> Option<&str> {
        self.merged.setting(OptionKey::VisualStudioPath)
    }

    pub fn triplet(&self) -> Option<&str> {
        self.merged.setting(OptionKey::Triplet)
    }

    pub fn host_triplet(&self) -> Option<&str> {
        self.merged.setting(OptionKey::HostTriplet)
    }

    pub fn asset_sources_template(&self) -> Option<&str> {
        self.merged.setting(OptionKey::AssetSources)
    }

    pub fn overlay_ports(&self) -> &[String] {
        self.merged.multisetting(OptionKey::OverlayPorts)
    }

    pub fn overlay_triplets(&self) -> &[String] {
        self.merged.multisetting(OptionKey::OverlayTriplets)
    }

    pub fn binary_sources(&self) -> &[String] {
        self.merged.multisetting(OptionKey::BinarySources)
    }

    pub fn cmake_args(&self) -> &[String] {
        self.merged.multisetting(OptionKey::CmakeArgs)
    }

    pub fn debug_enabled(&self) -> bool {
        self.switch_or_default(OptionKey::Debug)
    }

    /// Independent of [`debug_enabled`](Self::debug_enabled).
    pub fn debug_env_enabled(&self) -> bool {
        self.switch_or_default(OptionKey::DebugEnv)
    }

    pub fn send_metrics(&self) -> bool {
        self.switch_or_default(OptionKey::SendMetrics)
    }

    pub fn disable_metrics(&self) -> bool {
        self.switch_or_default(OptionKey::DisableMetrics)
    }

    pub fn print_metrics(&self) -> bool {
        self.switch_or_default(OptionKey::PrintMetrics)
    }

    pub fn wait_for_lock(&self) -> bool {
        self.switch_or_default(OptionKey::WaitForLock)
    }

    pub fn ignore_lock_failures(&self) -> bool {
        self.switch_or_default(OptionKey::IgnoreLockFailures)
    }

    pub fn output_json(&self) -> bool {
        self.switch_or_default(OptionKey::Json)
    }

    pub fn exact_abi_tools_versions(&self) -> bool {
        self.switch_or_default(OptionKey::ExactAbiToolsVersions)
    }

    // ========================================================================
    // Feature flags
    // ========================================================================

    pub fn feature_state(&self, feature: Feature) -> TriState {
        self.features.get(feature)
    }

    pub fn binary_caching_enabled(&self) -> bool {
        self.features.enabled(Feature::BinaryCaching)
    }

    pub fn compiler_tracking_enabled(&self) -> bool {
        self.features.enabled(Feature::CompilerTracking)
    }

    pub fn manifests_enabled(&self) -> bool {
        self.features.enabled(Feature::Manifests)
    }

    pub fn registries_enabled(&self) -> bool {
        self.features.enabled(Feature::Registries)
    }

    pub fn versions_enabled(&self) -> bool {
        self.features.enabled(Feature::Versions)
    }

    pub fn feature_flag_settings(&self) -> FeatureFlagSettings {
        self.features.settings()
    }

    /// Log the resolved capabilities at debug level.
    pub fn debug_print_feature_flags(&self) {
        for feature in Feature::ALL {
            tracing::debug!(
                feature = feature.flag_name(),
                state = %self.features.get(feature),
                enabled = self.features.enabled(feature),
                "feature flag"
            );
        }
    }

    // ========================================================================
    // Forwarding
    // ========================================================================

    /// Global options a recursively spawned child must receive.
    pub fn forwardable_arguments(&self) -> &[String] {
        &self.forwardable_arguments
    }

    /// True when this process was started with a recursion payload.
    pub fn is_forwarded_child(&self) -> bool {
        self.forwarded_child
    }

    /// Side channel for a child of this process.
    pub fn recursion_payload(&self) -> RecursionPayload {
        RecursionPayload::from_merged(&self.merged, &self.features, self.registry)
    }

    /// Non-fatal problems found while resolving (unknown feature flags,
    /// inconsistent settings).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn summary(&self) -> ConfigSummary<'_> {
        ConfigSummary {
            command: self.command(),
            command_arguments: &self.command_arguments,
            options: &self.merged,
            feature_flags: self.feature_flag_settings(),
            forwarded_child: self.forwarded_child,
            forwardable_arguments: &self.forwardable_arguments,
            warnings: &self.warnings,
        }
    }

    /// Pretty JSON of [`summary`](Self::summary); options appear in
    /// registry key order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}

/// Merge the tiers, reconcile feature flags and collect warnings.
fn resolve(
    registry: OptionRegistry,
    arguments: &OptionValues,
    payload: Option<&OptionValues>,
    environment: Option<&OptionValues>,
) -> Result<Resolution> {
    let mut layers = vec![Layer::new(ValueSource::Argument, arguments)];
    if let Some(values) = payload {
        layers.push(Layer::new(ValueSource::RecursivePayload, values));
    }
    if let Some(values) = environment {
        layers.push(Layer::new(ValueSource::Environment, values));
    }
    let merged = merge(registry, &layers);

    let mut list = FlagList::parse(merged.multisetting(OptionKey::FeatureFlags));
    if merged.source(OptionKey::FeatureFlags) == ValueSource::RecursivePayload {
        // an inherited list sits below this process's own switches
        list.entries
            .retain(|feature, _| !merged.switch(feature.option_key()).is_set());
    }
    let features = reconcile(|feature| merged.switch(feature.option_key()), &list)?;

    let mut warnings: Vec<String> = list
        .unknown
        .iter()
        .map(|name| format!("unknown feature flag '{name}'"))
        .collect();
    if !merged.multisetting(OptionKey::BinarySources).is_empty() && !features.enabled(Feature::BinaryCaching) {
        warnings.push("binary sources were specified, but binary caching is disabled".to_string());
    }
    if merged.setting(OptionKey::ManifestRoot).is_some() && !features.enabled(Feature::Manifests) {
        warnings.push("a manifest root was specified, but manifests are disabled".to_string());
    }

    let forwardable_arguments = build_forwardable_arguments(&merged, &features, registry);

    Ok(Resolution {
        merged,
        features,
        forwardable_arguments,
        warnings,
    })
}

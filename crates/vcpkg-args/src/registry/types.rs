//! Core types for the governed option registry

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a globally governed option.
///
/// The serialized form is the key used in printed configuration and in
/// internal maps; it never changes when an argument is renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKey {
    VcpkgRoot,
    ManifestRoot,
    BuildtreesRoot,
    DownloadsRoot,
    InstallRoot,
    PackagesRoot,
    ScriptsRoot,
    BuiltinPortsRoot,
    BuiltinRegistryVersionsDir,
    RegistriesCache,
    VisualStudioPath,
    Triplet,
    HostTriplet,
    AssetSources,
    OverlayPorts,
    OverlayTriplets,
    BinarySources,
    CmakeArgs,
    FeatureFlags,
    Debug,
    DebugEnv,
    SendMetrics,
    DisableMetrics,
    PrintMetrics,
    WaitForLock,
    IgnoreLockFailures,
    Json,
    ExactAbiToolsVersions,
    BinaryCaching,
    CompilerTracking,
    Manifests,
    Registries,
    Versions,
}

impl OptionKey {
    /// The kebab-case key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VcpkgRoot => "vcpkg-root",
            Self::ManifestRoot => "manifest-root",
            Self::BuildtreesRoot => "buildtrees-root",
            Self::DownloadsRoot => "downloads-root",
            Self::InstallRoot => "install-root",
            Self::PackagesRoot => "packages-root",
            Self::ScriptsRoot => "scripts-root",
            Self::BuiltinPortsRoot => "builtin-ports-root",
            Self::BuiltinRegistryVersionsDir => "builtin-registry-versions-dir",
            Self::RegistriesCache => "registries-cache",
            Self::VisualStudioPath => "visual-studio-path",
            Self::Triplet => "triplet",
            Self::HostTriplet => "host-triplet",
            Self::AssetSources => "asset-sources",
            Self::OverlayPorts => "overlay-ports",
            Self::OverlayTriplets => "overlay-triplets",
            Self::BinarySources => "binary-sources",
            Self::CmakeArgs => "cmake-args",
            Self::FeatureFlags => "feature-flags",
            Self::Debug => "debug",
            Self::DebugEnv => "debug-env",
            Self::SendMetrics => "send-metrics",
            Self::DisableMetrics => "disable-metrics",
            Self::PrintMetrics => "print-metrics",
            Self::WaitForLock => "wait-for-lock",
            Self::IgnoreLockFailures => "ignore-lock-failures",
            Self::Json => "json",
            Self::ExactAbiToolsVersions => "exact-abi-tools-versions",
            Self::BinaryCaching => "binary-caching",
            Self::CompilerTracking => "compiler-tracking",
            Self::Manifests => "manifests",
            Self::Registries => "registries",
            Self::Versions => "versions",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an option is spelled and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// Boolean presence flag, tri-state through `--no-<name>`
    Switch,
    /// Exactly one value
    Setting,
    /// Repeatable, order-preserving values
    MultiSetting,
}

/// How a list-valued environment variable is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSyntax {
    /// Platform path list (`:` on Unix, `;` on Windows)
    PathList,
    /// Comma separated entries
    Comma,
}

/// Whether a resolved value travels to a recursively spawned child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarding {
    /// Passed down as `--<name>=<value>` or in the recursion payload
    Forward,
    /// Never leaves this process
    Local,
    /// Passed down as part of the resolved `--feature-flags` list
    FeatureFlag,
}

/// One row of the option registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernedOption {
    pub key: OptionKey,
    pub kind: OptionKind,
    /// Argument spelling without the `--` prefix
    pub argument: Option<&'static str>,
    /// Environment variable read when the argument is absent
    pub environment: Option<&'static str>,
    pub forwarding: Forwarding,
    /// Compiled default for switches; ignored for settings
    pub default_enabled: bool,
    pub list_syntax: ListSyntax,
    pub short_help_text: &'static str,
}

impl GovernedOption {
    pub const fn setting(key: OptionKey, argument: &'static str, short_help_text: &'static str) -> Self {
        Self {
            key,
            kind: OptionKind::Setting,
            argument: Some(argument),
            environment: None,
            forwarding: Forwarding::Forward,
            default_enabled: false,
            list_syntax: ListSyntax::PathList,
            short_help_text,
        }
    }

    pub const fn multisetting(key: OptionKey, argument: &'static str, short_help_text: &'static str) -> Self {
        Self {
            kind: OptionKind::MultiSetting,
            ..Self::setting(key, argument, short_help_text)
        }
    }

    pub const fn switch(key: OptionKey, argument: &'static str, short_help_text: &'static str) -> Self {
        Self {
            kind: OptionKind::Switch,
            forwarding: Forwarding::Local,
            ..Self::setting(key, argument, short_help_text)
        }
    }

    /// Bind an environment variable (builder pattern).
    pub const fn with_env(self, environment: &'static str) -> Self {
        Self {
            environment: Some(environment),
            ..self
        }
    }

    pub const fn with_forwarding(self, forwarding: Forwarding) -> Self {
        Self { forwarding, ..self }
    }

    pub const fn with_default(self, default_enabled: bool) -> Self {
        Self {
            default_enabled,
            ..self
        }
    }

    pub const fn with_list_syntax(self, list_syntax: ListSyntax) -> Self {
        Self { list_syntax, ..self }
    }

    /// An option only ever read from the environment.
    pub const fn env_only(self) -> Self {
        Self {
            argument: None,
            ..self
        }
    }

    pub fn is_forwarded(&self) -> bool {
        matches!(self.forwarding, Forwarding::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_keep_unrelated_fields() {
        let opt = GovernedOption::switch(OptionKey::Debug, "debug", "Print debug output")
            .with_env("VCPKG_DEBUG")
            .with_default(true);
        assert_eq!(opt.kind, OptionKind::Switch);
        assert_eq!(opt.argument, Some("debug"));
        assert_eq!(opt.environment, Some("VCPKG_DEBUG"));
        assert_eq!(opt.forwarding, Forwarding::Local);
        assert!(opt.default_enabled);
    }

    #[test]
    fn settings_forward_by_default() {
        let opt = GovernedOption::setting(OptionKey::Triplet, "triplet", "Target triplet");
        assert!(opt.is_forwarded());
        let multi = GovernedOption::multisetting(OptionKey::OverlayPorts, "overlay-ports", "Overlays");
        assert_eq!(multi.kind, OptionKind::MultiSetting);
        assert!(multi.is_forwarded());
    }

    #[test]
    fn env_only_drops_argument() {
        let opt = GovernedOption::setting(OptionKey::VisualStudioPath, "unused", "VS path")
            .with_env("VCPKG_VISUAL_STUDIO_PATH")
            .env_only();
        assert_eq!(opt.argument, None);
    }

    #[test]
    fn key_serializes_as_kebab_case() {
        let json = serde_json::to_string(&OptionKey::BuiltinRegistryVersionsDir).unwrap();
        assert_eq!(json, format!("\"{}\"", OptionKey::BuiltinRegistryVersionsDir.as_str()));
    }
}

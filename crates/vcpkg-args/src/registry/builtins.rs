//! Built-in governed options - SINGLE SOURCE OF TRUTH
//!
//! Every global option, its argument spelling, its environment variable and
//! its forwarding class is declared here once. Parsing, environment reads,
//! merging and forwarding all iterate this table instead of naming fields.

use super::{Forwarding, GovernedOption, ListSyntax, OptionKey};

/// Environment variable carrying the recursion payload from a parent process.
pub const RECURSIVE_DATA_ENV: &str = "X_VCPKG_RECURSIVE_DATA";

/// Number of built-in options.
pub const BUILTIN_COUNT: usize = 33;

/// Returns all built-in option registrations, in forwarding order.
pub const BUILTIN_OPTIONS: &[GovernedOption] = &[
    // Roots and directories
    GovernedOption::setting(OptionKey::VcpkgRoot, "vcpkg-root", "Specify the vcpkg root directory")
        .with_env("VCPKG_ROOT"),
    GovernedOption::setting(
        OptionKey::ManifestRoot,
        "x-manifest-root",
        "Specify the directory containing vcpkg.json",
    ),
    GovernedOption::setting(
        OptionKey::BuildtreesRoot,
        "x-buildtrees-root",
        "Specify the buildtrees root directory",
    ),
    GovernedOption::setting(
        OptionKey::DownloadsRoot,
        "downloads-root",
        "Specify the downloads root directory",
    )
    .with_env("VCPKG_DOWNLOADS"),
    GovernedOption::setting(
        OptionKey::InstallRoot,
        "x-install-root",
        "Specify the install root directory",
    ),
    GovernedOption::setting(
        OptionKey::PackagesRoot,
        "x-packages-root",
        "Specify the packages root directory",
    ),
    GovernedOption::setting(
        OptionKey::ScriptsRoot,
        "x-scripts-root",
        "Specify the scripts root directory",
    ),
    GovernedOption::setting(
        OptionKey::BuiltinPortsRoot,
        "x-builtin-ports-root",
        "Specify the builtin ports directory",
    ),
    GovernedOption::setting(
        OptionKey::BuiltinRegistryVersionsDir,
        "x-builtin-registry-versions-dir",
        "Specify the builtin registry versions directory",
    ),
    GovernedOption::setting(
        OptionKey::RegistriesCache,
        "x-registries-cache",
        "Specify the registries cache directory",
    )
    .with_env("X_VCPKG_REGISTRIES_CACHE"),
    GovernedOption::setting(
        OptionKey::VisualStudioPath,
        "visual-studio-path",
        "Visual Studio installation to use",
    )
    .with_env("VCPKG_VISUAL_STUDIO_PATH")
    .with_forwarding(Forwarding::Local)
    .env_only(),
    // Triplets and asset sources
    GovernedOption::setting(OptionKey::Triplet, "triplet", "Specify the target architecture triplet")
        .with_env("VCPKG_DEFAULT_TRIPLET"),
    GovernedOption::setting(
        OptionKey::HostTriplet,
        "host-triplet",
        "Specify the host architecture triplet",
    )
    .with_env("VCPKG_DEFAULT_HOST_TRIPLET"),
    GovernedOption::setting(
        OptionKey::AssetSources,
        "x-asset-sources",
        "Add sources for asset caching",
    )
    .with_env("X_VCPKG_ASSET_SOURCES"),
    // Lists
    GovernedOption::multisetting(
        OptionKey::OverlayPorts,
        "overlay-ports",
        "Specify directories to be used when searching for ports",
    )
    .with_env("VCPKG_OVERLAY_PORTS"),
    GovernedOption::multisetting(
        OptionKey::OverlayTriplets,
        "overlay-triplets",
        "Specify directories containing triplets files",
    )
    .with_env("VCPKG_OVERLAY_TRIPLETS"),
    GovernedOption::multisetting(
        OptionKey::BinarySources,
        "binarysource",
        "Add sources for binary caching",
    ),
    GovernedOption::multisetting(
        OptionKey::CmakeArgs,
        "x-cmake-args",
        "Additional arguments passed to CMake",
    ),
    GovernedOption::multisetting(
        OptionKey::FeatureFlags,
        "feature-flags",
        "Comma separated list of feature flags",
    )
    .with_env("VCPKG_FEATURE_FLAGS")
    .with_list_syntax(ListSyntax::Comma)
    .with_forwarding(Forwarding::FeatureFlag),
    // Behavior switches (never forwarded)
    GovernedOption::switch(OptionKey::Debug, "debug", "Print debugging information"),
    GovernedOption::switch(OptionKey::DebugEnv, "debug-env", "Print the environment of build steps"),
    GovernedOption::switch(OptionKey::SendMetrics, "sendmetrics", "Send metrics"),
    GovernedOption::switch(
        OptionKey::DisableMetrics,
        "disable-metrics",
        "Disable both printing and sending metrics",
    )
    .with_env("VCPKG_DISABLE_METRICS"),
    GovernedOption::switch(OptionKey::PrintMetrics, "printmetrics", "Print metrics"),
    GovernedOption::switch(OptionKey::WaitForLock, "x-wait-for-lock", "Wait for the filesystem lock"),
    GovernedOption::switch(
        OptionKey::IgnoreLockFailures,
        "x-ignore-lock-failures",
        "Continue when the filesystem lock cannot be taken",
    )
    .with_env("X_VCPKG_IGNORE_LOCK_FAILURES"),
    GovernedOption::switch(OptionKey::Json, "x-json", "Print machine readable output"),
    GovernedOption::switch(
        OptionKey::ExactAbiToolsVersions,
        "x-abi-tools-use-exact-versions",
        "Use exact tool versions in ABI hashes",
    ),
    // Legacy feature flag switches
    GovernedOption::switch(OptionKey::BinaryCaching, "binarycaching", "Enable binary caching")
        .with_default(true)
        .with_forwarding(Forwarding::FeatureFlag),
    GovernedOption::switch(
        OptionKey::CompilerTracking,
        "compilertracking",
        "Track the compiler in ABI hashes",
    )
    .with_default(true)
    .with_forwarding(Forwarding::FeatureFlag),
    GovernedOption::switch(OptionKey::Manifests, "manifests", "Enable manifest mode")
        .with_default(true)
        .with_forwarding(Forwarding::FeatureFlag),
    GovernedOption::switch(OptionKey::Registries, "registries", "Enable registries")
        .with_default(true)
        .with_forwarding(Forwarding::FeatureFlag),
    GovernedOption::switch(OptionKey::Versions, "versions", "Enable versioning")
        .with_default(true)
        .with_forwarding(Forwarding::FeatureFlag),
];

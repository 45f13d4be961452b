//! Startup scenarios across parsing, environment, feature flags and
//! forwarding.
//!
//! Each scenario resolves a full invocation the way the binary does and
//! checks the values a command would read.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rstest::rstest;
use vcpkg_args::{
    CmdArguments, CommandOptions, CommandSetting, CommandStructure, CommandSwitch, Error, ForwardingContext,
    OptionKey, ValueSource,
};
use vcpkg_test_utils::{env_map, path_list, tokens};

// =============================================================================
// Test Infrastructure
// =============================================================================

const INSTALL_SWITCHES: &[CommandSwitch] = &[
    CommandSwitch::new("dry-run", "Do not actually build or install"),
    CommandSwitch::new("head", "Install the libraries on the command line using the latest upstream sources"),
];
const INSTALL_SETTINGS: &[CommandSetting] = &[CommandSetting::new("x-xunit", "File to output results in XUnit format")];

const INSTALL: CommandStructure = CommandStructure::new(
    "vcpkg install zlib zlib:x64-windows curl boost",
    0,
    vcpkg_args::UNBOUNDED_ARITY,
    CommandOptions {
        switches: INSTALL_SWITCHES,
        settings: INSTALL_SETTINGS,
        multisettings: &[],
    },
);

fn startup(args: &[&str], env: &BTreeMap<String, String>) -> vcpkg_args::Result<CmdArguments> {
    let mut resolved = CmdArguments::create_from_arg_sequence(&tokens(args))?;
    resolved.imbue_from_fake_environment(env)?;
    Ok(resolved)
}

// =============================================================================
// Scenarios
// =============================================================================

/// A CI job: everything comes from the environment, the command line only
/// names the command and ports.
#[test]
fn scenario_ci_environment_driven_install() {
    let env = env_map(&[
        ("VCPKG_ROOT", "/src/vcpkg"),
        ("VCPKG_DEFAULT_TRIPLET", "x64-linux"),
        ("VCPKG_DEFAULT_HOST_TRIPLET", "x64-linux"),
        ("VCPKG_OVERLAY_PORTS", path_list(&["/ci/ports", "/ci/more-ports"]).as_str()),
        ("VCPKG_FEATURE_FLAGS", "-compilertracking"),
        ("VCPKG_DISABLE_METRICS", "1"),
    ]);
    let args = startup(&["install", "--head", "zlib", "fmt"], &env).unwrap();

    assert_eq!(args.command(), Some("install"));
    assert_eq!(args.command_arguments(), ["zlib", "fmt"]);
    assert_eq!(args.vcpkg_root_dir(), Some("/src/vcpkg"));
    assert_eq!(args.triplet(), Some("x64-linux"));
    assert_eq!(args.overlay_ports(), ["/ci/ports", "/ci/more-ports"]);
    assert!(!args.compiler_tracking_enabled());
    assert!(args.disable_metrics());

    let parsed = args.parse_arguments(&INSTALL).unwrap();
    assert!(parsed.has_switch("head"));
    assert!(!parsed.has_switch("dry-run"));
}

/// A developer overrides the CI environment on the command line.
#[test]
fn scenario_developer_overrides_environment() {
    let env = env_map(&[
        ("VCPKG_DEFAULT_TRIPLET", "x64-linux"),
        ("VCPKG_OVERLAY_PORTS", "/ci/ports"),
    ]);
    let args = startup(
        &["--triplet", "x64-linux-dynamic", "--overlay-ports=/mine", "install", "zlib"],
        &env,
    )
    .unwrap();

    assert_eq!(args.triplet(), Some("x64-linux-dynamic"));
    assert_eq!(args.source(OptionKey::Triplet), ValueSource::Argument);
    assert_eq!(args.overlay_ports(), ["/mine"]);
}

/// Options addressed with either the stable or the experimental spelling
/// resolve to the same field.
#[rstest]
#[case("--x-triplet=arm64-osx")]
#[case("--triplet=arm64-osx")]
#[case("--TRIPLET=arm64-osx")]
fn scenario_option_spellings(#[case] token: &str) {
    let args = startup(&[token, "install"], &BTreeMap::new()).unwrap();
    assert_eq!(args.triplet(), Some("arm64-osx"));
}

/// Command options and global options in any order, with a terminator.
#[test]
fn scenario_terminator_passes_option_like_ports() {
    let args = startup(
        &["install", "--dry-run", "--", "--not-an-option", "zlib"],
        &BTreeMap::new(),
    )
    .unwrap();
    assert_eq!(args.command_arguments(), ["--not-an-option", "zlib"]);
    let parsed = args.parse_arguments(&INSTALL).unwrap();
    assert!(parsed.has_switch("dry-run"));
}

#[test]
fn scenario_unknown_install_option_is_user_error() {
    let args = startup(&["install", "--x-no-such-thing", "zlib"], &BTreeMap::new()).unwrap();
    let err = args.parse_arguments(&INSTALL).unwrap_err();
    assert!(matches!(err, Error::UnknownOption { .. }));
    assert!(err.is_user_error());
}

/// A parent spawns a child for a transitive build; the child agrees with
/// the parent on every forwarded value and on the feature flags.
#[test]
fn scenario_parent_spawns_child_build() {
    let parent_env = env_map(&[
        ("VCPKG_ROOT", "/src/vcpkg"),
        ("VCPKG_DOWNLOADS", "/cache/downloads"),
        ("X_VCPKG_ASSET_SOURCES", "x-azurl,https://mirror.example/,,read"),
    ]);
    let parent = startup(
        &["--x-buildtrees-root=/bt", "--no-versions", "--x-json", "install", "zlib"],
        &parent_env,
    )
    .unwrap();

    let mut ctx = ForwardingContext::new();
    let child_invocation = ctx.apply_process_recursion(&parent).unwrap();

    let mut child_env = env_map(&[("VCPKG_DOWNLOADS", "/tmp/moved")]);
    child_env.extend(child_invocation.environment.clone());

    let mut child_tokens: Vec<&str> = child_invocation.arguments.iter().map(String::as_str).collect();
    child_tokens.extend(["build", "zlib:x64-linux"]);
    let child = startup(&child_tokens, &child_env).unwrap();

    assert!(child.is_forwarded_child());
    assert_eq!(child.vcpkg_root_dir(), parent.vcpkg_root_dir());
    assert_eq!(child.downloads_root_dir(), Some("/cache/downloads"));
    assert_eq!(child.buildtrees_root_dir(), Some("/bt"));
    assert_eq!(child.asset_sources_template(), parent.asset_sources_template());
    assert_eq!(child.feature_flag_settings(), parent.feature_flag_settings());
    assert!(!child.output_json());

    let err = ctx.apply_process_recursion(&parent).unwrap_err();
    assert!(err.is_fatal());
}

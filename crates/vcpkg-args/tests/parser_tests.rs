use pretty_assertions::assert_eq;
use rstest::rstest;
use vcpkg_args::{
    CommandMultiSetting, CommandOptions, CommandSetting, CommandStructure, CommandSwitch, Error, OptionKey,
    parse_tokens,
};
use vcpkg_test_utils::tokens;

const NO_COMMAND: Option<&CommandStructure> = None;

const SWITCHES: &[CommandSwitch] = &[CommandSwitch::new("dry-run", "Print what would happen")];
const SETTINGS: &[CommandSetting] = &[CommandSetting::new("x-output", "Output file")];
const MULTI: &[CommandMultiSetting] = &[CommandMultiSetting::new("exclude", "Ports to skip")];

const ONE_PORT: CommandStructure = CommandStructure::new(
    "vcpkg remove zlib",
    1,
    1,
    CommandOptions {
        switches: SWITCHES,
        settings: SETTINGS,
        multisettings: MULTI,
    },
);

// ============================================================================
// Multi-setting ordering
// ============================================================================

#[rstest]
#[case(&["--overlay-ports=a", "--overlay-ports=b"], &["a", "b"])]
#[case(&["--overlay-ports=b", "--overlay-ports=a"], &["b", "a"])]
#[case(&["--overlay-ports=a", "--overlay-ports", "a"], &["a", "a"])]
fn multisetting_preserves_encounter_order(#[case] args: &[&str], #[case] expected: &[&str]) {
    let raw = parse_tokens(&tokens(args), NO_COMMAND).unwrap();
    assert_eq!(raw.global.multisetting(OptionKey::OverlayPorts), expected);
}

#[test]
fn command_multisetting_preserves_encounter_order() {
    let raw = parse_tokens(
        &tokens(&["remove", "--exclude=b", "zlib", "--exclude=a"]),
        Some(&ONE_PORT),
    )
    .unwrap();
    assert_eq!(raw.parsed.read_multisetting("exclude"), ["b", "a"]);
}

// ============================================================================
// Setting uniqueness
// ============================================================================

#[rstest]
#[case(&["--triplet=x", "--triplet=y"])]
#[case(&["--triplet=x", "--triplet=x"])]
#[case(&["--triplet", "x", "--x-triplet=y"])]
fn duplicate_triplet_is_rejected(#[case] args: &[&str]) {
    let err = parse_tokens(&tokens(args), NO_COMMAND).unwrap_err();
    assert!(matches!(err, Error::DuplicateSetting { ref name } if name == "triplet"), "{err}");
    assert!(err.is_user_error());
}

#[test]
fn duplicate_command_setting_is_rejected() {
    let err = parse_tokens(
        &tokens(&["remove", "zlib", "--x-output=a", "--x-output=b"]),
        Some(&ONE_PORT),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateSetting { .. }));
}

// ============================================================================
// Arity
// ============================================================================

#[rstest]
#[case(&["remove"], false)]
#[case(&["remove", "zlib"], true)]
#[case(&["remove", "zlib", "fmt"], false)]
#[case(&["remove", "--dry-run", "zlib"], true)]
fn arity_of_exactly_one(#[case] args: &[&str], #[case] ok: bool) {
    let result = parse_tokens(&tokens(args), Some(&ONE_PORT));
    if ok {
        assert!(result.is_ok());
    } else {
        let err = result.unwrap_err();
        assert!(
            matches!(err, Error::Arity { minimum: 1, maximum: 1, .. }),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn arity_error_carries_observed_count() {
    let err = parse_tokens(&tokens(&["remove", "a", "b", "c"]), Some(&ONE_PORT)).unwrap_err();
    match err {
        Error::Arity { command, actual, .. } => {
            assert_eq!(command, "remove");
            assert_eq!(actual, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn inverted_arity_bounds_are_rejected() {
    const BROKEN: CommandStructure = CommandStructure::new("vcpkg broken", 2, 0, CommandOptions::EMPTY);
    let err = parse_tokens(&tokens(&["broken"]), Some(&BROKEN)).unwrap_err();
    assert!(matches!(err, Error::InvalidSchema { minimum: 2, maximum: 0, .. }));
}

// ============================================================================
// Unknown options and switches
// ============================================================================

#[test]
fn every_unknown_option_is_reported() {
    let err = parse_tokens(
        &tokens(&["remove", "zlib", "--bogus", "--other=1"]),
        Some(&ONE_PORT),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown option(s) for command 'remove': --bogus, --other=1"
    );
}

#[test]
fn global_and_command_options_mix() {
    let raw = parse_tokens(
        &tokens(&["--x-json", "remove", "--no-dry-run", "--triplet", "x64-linux", "zlib"]),
        Some(&ONE_PORT),
    )
    .unwrap();
    assert_eq!(raw.global.switch(OptionKey::Json), Some(true));
    assert_eq!(raw.global.setting(OptionKey::Triplet), Some("x64-linux"));
    assert_eq!(raw.parsed.switches.get("dry-run"), Some(&false));
    assert_eq!(raw.command_arguments, ["zlib"]);
}

#[test]
fn conflicting_switch_polarity_is_rejected() {
    let err = parse_tokens(&tokens(&["--debug", "--no-debug"]), NO_COMMAND).unwrap_err();
    assert!(matches!(err, Error::ConflictingSwitch { .. }));
}

#[test]
fn parse_is_deterministic_for_errors() {
    let input = tokens(&["--triplet=a", "--triplet=b"]);
    let first = parse_tokens(&input, NO_COMMAND).unwrap_err().to_string();
    let second = parse_tokens(&input, NO_COMMAND).unwrap_err().to_string();
    assert_eq!(first, second);
}

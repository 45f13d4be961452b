//! Forwarding is drift-free: whatever mix of arguments and environment the
//! parent resolved, a child started with the forwarded invocation resolves
//! the same forwarded values, even when its own environment differs.

use std::collections::BTreeMap;

use proptest::prelude::*;
use vcpkg_args::{CmdArguments, Forwarding, ForwardingContext, OptionRegistry};

/// Forwarded options with both an argument and an environment spelling.
const SOURCES: &[(&str, &str)] = &[
    ("vcpkg-root", "VCPKG_ROOT"),
    ("downloads-root", "VCPKG_DOWNLOADS"),
    ("triplet", "VCPKG_DEFAULT_TRIPLET"),
    ("host-triplet", "VCPKG_DEFAULT_HOST_TRIPLET"),
    ("x-asset-sources", "X_VCPKG_ASSET_SOURCES"),
];

/// Where one option's value comes from in the parent.
#[derive(Debug, Clone)]
enum Origin {
    Unset,
    Argument(String),
    Environment(String),
}

fn origin() -> impl Strategy<Value = Origin> {
    let value = "[a-z][a-z0-9-]{0,10}";
    prop_oneof![
        Just(Origin::Unset),
        value.prop_map(Origin::Argument),
        value.prop_map(Origin::Environment),
    ]
}

fn flags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("--no-binarycaching".to_string()),
            Just("--feature-flags=-versions".to_string()),
            Just("--x-json".to_string()),
            Just("--x-wait-for-lock".to_string()),
        ],
        0..3,
    )
}

fn resolve(tokens: &[String], env: &BTreeMap<String, String>) -> CmdArguments {
    let mut args = CmdArguments::create_from_arg_sequence(tokens).unwrap();
    args.imbue_from_fake_environment(env).unwrap();
    args
}

proptest! {
    #[test]
    fn child_resolves_parent_values(
        origins in prop::collection::vec(origin(), SOURCES.len()),
        extra in flags(),
        drift in "[a-z]{1,8}",
    ) {
        let mut parent_tokens: Vec<String> = extra;
        let mut parent_env = BTreeMap::new();
        for ((argument, variable), origin) in SOURCES.iter().zip(&origins) {
            match origin {
                Origin::Unset => {}
                Origin::Argument(v) => parent_tokens.push(format!("--{argument}={v}")),
                Origin::Environment(v) => {
                    parent_env.insert(variable.to_string(), v.clone());
                }
            }
        }
        parent_tokens.push("install".to_string());
        let parent = resolve(&parent_tokens, &parent_env);

        let invocation = ForwardingContext::new().apply_process_recursion(&parent).unwrap();

        // every bound variable drifted to a new value
        let mut child_env: BTreeMap<String, String> = SOURCES
            .iter()
            .map(|(_, variable)| (variable.to_string(), drift.clone()))
            .collect();
        child_env.extend(invocation.environment.clone());

        let mut child_tokens = invocation.arguments.clone();
        child_tokens.push("build".to_string());
        let child = resolve(&child_tokens, &child_env);

        for option in OptionRegistry::builtin().iter().filter(|o| o.forwarding == Forwarding::Forward) {
            prop_assert_eq!(
                parent.resolved(option.key).map(|r| &r.value),
                child.resolved(option.key).map(|r| &r.value),
                "{} drifted", option.key
            );
        }
        prop_assert_eq!(parent.feature_flag_settings(), child.feature_flag_settings());
        prop_assert!(!child.output_json());
        prop_assert!(!child.wait_for_lock());
    }
}

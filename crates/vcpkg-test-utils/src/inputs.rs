//! Builders for raw invocation inputs.

use std::collections::BTreeMap;
use std::env;

/// Owned token sequence from string literals.
pub fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Fake environment from `(name, value)` pairs.
pub fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Join entries with the platform path-list delimiter, as a list-valued
/// environment variable would hold them.
///
/// # Panics
///
/// Panics if an entry contains the delimiter itself.
pub fn path_list(entries: &[&str]) -> String {
    env::join_paths(entries)
        .expect("path_list: entry contains the path delimiter")
        .to_string_lossy()
        .into_owned()
}

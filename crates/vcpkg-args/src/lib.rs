//! Startup configuration resolver for the vcpkg tool
//!
//! This crate turns the raw invocation (argument tokens and environment
//! variables) into one read-only [`CmdArguments`] value, implementing:
//!
//! - **Option schema**: static per-command descriptions ([`CommandStructure`])
//! - **Option registry**: one table of governed global options ([`OptionRegistry`])
//! - **Parsing**: tokens to per-tier values ([`parse_tokens`])
//! - **Environment**: an injectable lookup ([`Environment`])
//! - **Merging**: argument > recursion payload > environment > default ([`merge`])
//! - **Feature flags**: legacy switches reconciled with the combined list ([`reconcile`])
//! - **Forwarding**: argument line and payload for child processes ([`ForwardingContext`])
//!
//! # Architecture
//!
//! Data flows once, top to bottom:
//!
//! ```text
//!   tokens ──> parser ──┐
//!                       ├──> merge ──> feature flags ──> forwarding
//!   env ──> environment ┘
//! ```
//!
//! # Example
//!
//! ```
//! use vcpkg_args::{CmdArguments, MapEnvironment};
//!
//! let mut args = CmdArguments::create_from_arg_sequence(&["--triplet=x64-linux", "install", "zlib"])?;
//! args.imbue_from_environment(&MapEnvironment::new().with("VCPKG_ROOT", "/opt/vcpkg"))?;
//!
//! assert_eq!(args.triplet(), Some("x64-linux"));
//! assert_eq!(args.vcpkg_root_dir(), Some("/opt/vcpkg"));
//! assert!(args.manifests_enabled());
//! # Ok::<(), vcpkg_args::Error>(())
//! ```

pub mod args;
pub mod env;
pub mod error;
pub mod features;
pub mod forward;
pub mod merge;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod tristate;
pub mod values;

pub use args::{CmdArguments, ConfigSummary};
pub use env::{Environment, MapEnvironment, ProcessEnvironment, parse_env_bool, read_environment, split_list};
pub use error::{Error, Result};
pub use features::{Feature, FeatureFlagSettings, FeatureStates, FlagList, reconcile};
pub use forward::{
    ChildInvocation, ForwardingContext, InitState, PayloadEntry, RecursionPayload, build_forwardable_arguments,
};
pub use merge::{Layer, MergedValues, Resolved, ResolvedValue, ValueSource, merge};
pub use parser::{END_OF_OPTIONS, ParsedArguments, PendingOptions, RawArguments, parse_tokens, validate_pending};
pub use registry::{
    BUILTIN_COUNT, BUILTIN_OPTIONS, Forwarding, GovernedOption, ListSyntax, OptionKey, OptionKind, OptionRegistry,
    RECURSIVE_DATA_ENV,
};
pub use schema::{
    CommandMultiSetting, CommandOptions, CommandSetting, CommandStructure, CommandSwitch, DeclaredOption,
    UNBOUNDED_ARITY,
};
pub use tristate::TriState;
pub use values::OptionValues;

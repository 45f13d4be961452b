//! Shared test utilities for the vcpkg argument resolver workspace.
//!
//! This crate provides standardised fixtures so the crate test suites do not
//! each rebuild token lists and fake environments by hand. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`inputs`]: token sequences and fake environments
//! - [`workspace`]: [`TestWorkspace`] for response files and fake roots

pub mod inputs;
pub mod workspace;

pub use inputs::{env_map, path_list, tokens};
pub use workspace::TestWorkspace;

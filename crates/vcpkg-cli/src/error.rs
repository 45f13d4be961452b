//! Error types for vcpkg-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from vcpkg-args before a command was selected
    #[error(transparent)]
    Args(#[from] vcpkg_args::Error),

    /// Error from vcpkg-args, reported with the command's usage text
    #[error("{source}")]
    Usage {
        source: vcpkg_args::Error,
        usage: String,
    },

    /// The command name matched no known command
    #[error("invalid command: {name}\navailable commands: {known}")]
    UnknownCommand { name: String, known: String },

    /// A `@file` argument could not be read
    #[error("failed to read response file '{}': {source}", .path.display())]
    ResponseFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Attach usage text to a resolver error.
    pub fn with_usage(source: vcpkg_args::Error, usage: String) -> Self {
        Self::Usage { source, usage }
    }

    /// Internal lifecycle violations; everything else is the user's input.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Args(e) | Self::Usage { source: e, .. } => e.is_fatal(),
            _ => false,
        }
    }

    pub fn usage(&self) -> Option<&str> {
        match self {
            Self::Usage { usage, .. } => Some(usage),
            _ => None,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() { 2 } else { 1 }
    }
}

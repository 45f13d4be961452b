//! Error types for vcpkg-args

/// Result type for argument resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning tokens and environment into a configuration
///
/// Everything except [`Error::RecursionMisuse`] and
/// [`Error::InvalidRecursionPayload`] is caused by user input and should be
/// reported together with the command's usage text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more `--name` tokens matched no declared option
    #[error("unknown option(s) for command '{command}': {}", .tokens.join(", "))]
    UnknownOption { command: String, tokens: Vec<String> },

    /// A single-value setting was assigned more than once
    #[error("the option '--{name}' can only be passed once")]
    DuplicateSetting { name: String },

    /// Positional argument count is outside the command's bounds
    #[error("{}", arity_message(.command, .actual, .minimum, .maximum))]
    Arity {
        command: String,
        actual: usize,
        minimum: usize,
        maximum: usize,
    },

    /// The legacy switch and the combined flag list disagree
    #[error(
        "conflicting values for feature flag '{feature}': --{switch} says {switch_value}, \
         but the feature flag list says {list_value}"
    )]
    FeatureFlagConflict {
        feature: String,
        switch: String,
        switch_value: bool,
        list_value: bool,
    },

    /// The process recursion step ran more than once
    #[error(
        "process recursion data may only be applied once per process; \
         this is a bug in the caller"
    )]
    RecursionMisuse,

    #[error("short options are not supported: {token}")]
    ShortOption { token: String },

    #[error("the option '--{name}' must be passed an argument")]
    MissingValue { name: String },

    #[error("the option '--{name}' must be passed a non-empty argument")]
    EmptyValue { name: String },

    #[error("the option '--{name}' does not accept an argument")]
    SwitchTakesNoValue { name: String },

    #[error("conflicting values specified for '--{name}'")]
    ConflictingSwitch { name: String },

    /// A command structure declares impossible arity bounds
    #[error("invalid command structure '{example}': maximum arity {maximum} is below minimum arity {minimum}")]
    InvalidSchema {
        example: String,
        minimum: usize,
        maximum: usize,
    },

    /// The recursion payload inherited from a parent process is unreadable
    #[error("invalid recursion payload in {variable}: {message}")]
    InvalidRecursionPayload { variable: String, message: String },

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by what the user typed or exported
    pub fn is_user_error(&self) -> bool {
        !self.is_fatal()
    }

    /// True for internal lifecycle violations that must not be shown as
    /// ordinary usage errors
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::RecursionMisuse | Error::InvalidRecursionPayload { .. } | Error::Json(_)
        )
    }
}

fn arity_message(command: &str, actual: &usize, minimum: &usize, maximum: &usize) -> String {
    if minimum == maximum {
        format!("'{command}' requires {minimum} arguments, but {actual} were provided")
    } else if actual < minimum {
        format!("'{command}' requires at least {minimum} arguments, but {actual} were provided")
    } else {
        format!("'{command}' requires at most {maximum} arguments, but {actual} were provided")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_message_uses_exact_wording_for_fixed_arity() {
        let err = Error::Arity {
            command: "install".into(),
            actual: 2,
            minimum: 1,
            maximum: 1,
        };
        assert_eq!(
            err.to_string(),
            "'install' requires 1 arguments, but 2 were provided"
        );
    }

    #[test]
    fn arity_message_distinguishes_lower_and_upper_bounds() {
        let low = Error::Arity {
            command: "x".into(),
            actual: 0,
            minimum: 1,
            maximum: 3,
        };
        let high = Error::Arity {
            command: "x".into(),
            actual: 4,
            minimum: 1,
            maximum: 3,
        };
        assert!(low.to_string().contains("at least 1"));
        assert!(high.to_string().contains("at most 3"));
    }

    #[test]
    fn recursion_misuse_is_fatal_not_user_error() {
        assert!(Error::RecursionMisuse.is_fatal());
        assert!(!Error::RecursionMisuse.is_user_error());
        assert!(Error::DuplicateSetting { name: "triplet".into() }.is_user_error());
    }

    #[test]
    fn unknown_option_lists_every_token() {
        let err = Error::UnknownOption {
            command: "install".into(),
            tokens: vec!["--foo".into(), "--bar=1".into()],
        };
        assert_eq!(
            err.to_string(),
            "unknown option(s) for command 'install': --foo, --bar=1"
        );
    }
}

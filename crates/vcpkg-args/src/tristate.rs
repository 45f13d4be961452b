//! Three-valued switch state

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a boolean-governed option.
///
/// `Unset` means "no opinion yet": it is distinct from an explicit `False`
/// and is only turned into a concrete boolean when read with a compiled
/// default via [`TriState::unwrap_or`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// Check whether an explicit value was provided.
    pub fn is_set(self) -> bool {
        !matches!(self, TriState::Unset)
    }

    /// The explicit value, if any.
    pub fn value(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }

    /// Resolve to a concrete boolean, falling back to `default` when unset.
    pub fn unwrap_or(self, default: bool) -> bool {
        self.value().unwrap_or(default)
    }

    /// Keep `self` if set, otherwise take `other`.
    pub fn or(self, other: TriState) -> TriState {
        if self.is_set() { self } else { other }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { TriState::True } else { TriState::False }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map(TriState::from).unwrap_or_default()
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Unset => write!(f, "unset"),
            TriState::True => write!(f, "true"),
            TriState::False => write!(f, "false"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_defers_to_default() {
        assert!(TriState::Unset.unwrap_or(true));
        assert!(!TriState::Unset.unwrap_or(false));
    }

    #[test]
    fn explicit_false_ignores_default() {
        assert!(!TriState::False.unwrap_or(true));
        assert!(TriState::True.unwrap_or(false));
    }

    #[test]
    fn or_keeps_first_explicit_value() {
        assert_eq!(TriState::Unset.or(TriState::False), TriState::False);
        assert_eq!(TriState::True.or(TriState::False), TriState::True);
        assert_eq!(TriState::Unset.or(TriState::Unset), TriState::Unset);
    }

    #[test]
    fn conversions() {
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::from(None), TriState::Unset);
        assert_eq!(TriState::from(Some(false)), TriState::False);
        assert_eq!(TriState::False.to_string(), "false");
    }
}

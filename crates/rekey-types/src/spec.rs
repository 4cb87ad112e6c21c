use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which mapping keys get prefixed, and with what.
///
/// A key named in `keys` is eligible: when its value is a string that does
/// not already start with `prefix`, the value is rewritten to
/// `prefix + value`. The specification is immutable for a rewrite pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSpec {
    prefix: String,
    keys: BTreeSet<String>,
}

impl PrefixSpec {
    /// Create a specification from a prefix and the eligible key names.
    pub fn new<I, K>(prefix: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The literal prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The eligible key names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Returns `true` if values under `key` may be prefixed.
    pub fn is_eligible(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if `value` already carries the prefix.
    pub fn is_prefixed(&self, value: &str) -> bool {
        value.starts_with(&self.prefix)
    }

    /// Prepend the prefix to `value`.
    pub fn apply(&self, value: &str) -> String {
        format!("{}{}", self.prefix, value)
    }
}

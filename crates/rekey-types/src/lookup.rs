use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Original value → prefixed value, accumulated over a whole run.
///
/// A given original maps to exactly one prefixed value: recording the same
/// original again overwrites the earlier entry (last write wins) but keeps
/// its first-seen position, so reports list entries in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    entries: IndexMap<String, String>,
}

impl LookupTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rename, returning the previous prefixed value if any.
    pub fn record(&mut self, original: impl Into<String>, prefixed: impl Into<String>) -> Option<String> {
        self.entries.insert(original.into(), prefixed.into())
    }

    /// The prefixed value recorded for `original`.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.entries.contains_key(original)
    }

    /// Number of distinct originals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(original, prefixed)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold another table into this one; entries from `other` win.
    pub fn merge(&mut self, other: LookupTable) {
        self.entries.extend(other.entries);
    }
}

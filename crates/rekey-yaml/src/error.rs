//! Error types for the YAML codec.

/// Errors that can occur while decoding or encoding YAML documents.
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    /// The text is not a valid single YAML document.
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A mapping key is not a string (number, boolean, null, or collection).
    #[error("unsupported {kind} mapping key at {path}")]
    UnsupportedKey { path: String, kind: &'static str },

    /// Two keys of one mapping have the same string form (e.g. `!a x` and `!b x`).
    #[error("duplicate mapping key at {path}")]
    DuplicateKey { path: String },

    /// The emitted text does not parse back to the tree it came from.
    #[error("emitted YAML does not round-trip at {path}: {detail}")]
    RoundTrip { path: String, detail: String },
}

/// Convenience alias for codec results.
pub type YamlResult<T> = Result<T, YamlError>;

/// Render a tree path for messages; the root is `<root>`.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

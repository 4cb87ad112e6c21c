//! Tree rewriter for rekey.
//!
//! Walks a parsed document and rebuilds it with every eligible string value
//! prefixed, recording each rename in a [`LookupTable`].
//!
//! [`LookupTable`]: rekey_types::LookupTable

pub mod rewriter;

pub use rewriter::rewrite;

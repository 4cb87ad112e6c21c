//! Foundation types for rekey.
//!
//! This crate provides the in-memory document model and the small value types
//! shared by the rewriter, the differ, and the batch pipeline. Every other
//! rekey crate depends on `rekey-types`.
//!
//! # Key Types
//!
//! - [`Node`] -- Parsed document tree (mapping, sequence, or scalar)
//! - [`PrefixSpec`] -- Literal prefix plus the set of eligible key names
//! - [`LookupTable`] -- Run-scoped original → prefixed value table
//! - [`ChangeRecord`] -- One path-qualified difference between two trees

pub mod change;
pub mod lookup;
pub mod node;
pub mod spec;

pub use change::{index_path, key_path, ChangeKind, ChangeRecord};
pub use lookup::LookupTable;
pub use node::{Mapping, Node, Number};
pub use spec::PrefixSpec;

#[cfg(feature = "testing")]
pub mod testing;

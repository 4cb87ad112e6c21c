//! Structural differ for rekey.
//!
//! Compares two document trees of any shape and produces an ordered,
//! path-qualified change list.
//!
//! # Key Types
//!
//! - [`NodeDiff`] -- The ordered list of [`ChangeRecord`]s plus counters
//! - [`diff_nodes`] -- Compare two trees from the document root
//!
//! [`ChangeRecord`]: rekey_types::ChangeRecord

pub mod node_diff;

pub use node_diff::{diff_at, diff_nodes, NodeDiff};

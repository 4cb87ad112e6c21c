//! Batch pipeline for rekey.
//!
//! Runs every configured document through parse → rewrite → diff →
//! serialize → persist, and accumulates one lookup table for the whole run.
//!
//! # Key Types
//!
//! - [`BatchConfig`] / [`DocumentClass`] -- Which files, which keys, which policy
//! - [`ErrorPolicy`] -- Abort on the first failure or report and continue
//! - [`Pipeline`] -- The per-file driver
//! - [`FileOutcome`] / [`RunReport`] -- What happened, file by file

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{BatchConfig, DocumentClass, ErrorPolicy};
pub use error::{BatchError, BatchResult};
pub use pipeline::Pipeline;
pub use report::{FileOutcome, RunReport};

// Re-export the types callers need to drive a run.
pub use rekey_types::{ChangeRecord, LookupTable, Node, PrefixSpec};

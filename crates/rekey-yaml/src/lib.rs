//! YAML codec for rekey.
//!
//! Converts between YAML text and [`Node`] trees. Parsing goes through
//! `serde_yaml`; emission is done here so that every string can be rendered
//! in the style a [`StylePolicy`] asks for.
//!
//! # Key Types
//!
//! - [`YamlCodec`] -- Decode/encode with repair and round-trip options
//! - [`StylePolicy`] / [`ScalarStyle`] -- Per-string style selection
//! - [`BlockForSpecial`] -- Literal blocks for multi-line or quote-sensitive strings
//!
//! [`Node`]: rekey_types::Node

pub mod codec;
pub mod emit;
pub mod error;
pub mod parse;
pub mod repair;
pub mod style;

pub use codec::YamlCodec;
pub use emit::{to_string, verify_round_trip};
pub use error::{YamlError, YamlResult};
pub use parse::parse_str;
pub use repair::repair_block_scalars;
pub use style::{BlockForSpecial, ScalarStyle, StylePolicy};

use rekey_types::Node;
use tracing::debug;

use crate::emit::{to_string, verify_round_trip};
use crate::error::YamlResult;
use crate::parse::parse_str;
use crate::repair::repair_block_scalars;
use crate::style::{BlockForSpecial, StylePolicy};

/// Codec for decoding/encoding YAML documents.
#[derive(Clone, Debug)]
pub struct YamlCodec<P = BlockForSpecial> {
    policy: P,
    repair: bool,
    verify: bool,
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new(BlockForSpecial)
    }
}

impl<P: StylePolicy> YamlCodec<P> {
    /// A codec emitting strings in the styles `policy` picks, with repair
    /// and round-trip verification enabled.
    pub fn new(policy: P) -> Self {
        Self { policy, repair: true, verify: true }
    }

    /// Retry unparseable documents after [`repair_block_scalars`].
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Re-parse every encoded document and compare it to its tree.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Decode a document.
    ///
    /// When the text does not parse and repair is enabled, the repaired text
    /// is tried once. If that also fails, the original error is returned.
    pub fn decode(&self, text: &str) -> YamlResult<Node> {
        let err = match parse_str(text) {
            Ok(node) => return Ok(node),
            Err(err) => err,
        };
        if !self.repair {
            return Err(err);
        }
        let repaired = repair_block_scalars(text);
        if repaired == text {
            return Err(err);
        }
        debug!(error = %err, "retrying parse after block scalar repair");
        parse_str(&repaired).map_err(|_| err)
    }

    /// Encode a document.
    pub fn encode(&self, node: &Node) -> YamlResult<String> {
        let text = to_string(node, &self.policy);
        if self.verify {
            verify_round_trip(node, &text)?;
        }
        Ok(text)
    }
}

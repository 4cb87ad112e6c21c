//! Recursive prefix rewrite.
//!
//! Only a string stored *directly* under an eligible key is prefixed. Any
//! other value under an eligible key (a list of names, a nested mapping,
//! null) is walked like ordinary structure, so a list of strings under an
//! eligible key comes out unchanged.

use rekey_types::{LookupTable, Mapping, Node, PrefixSpec};
use tracing::trace;

/// Rebuild `tree` with eligible string values prefixed.
///
/// The input is never mutated. The output has the same shape: same keys in
/// the same order, same sequence lengths. Values that already start with the
/// prefix are left as they are, which makes the rewrite idempotent. Every
/// value that is actually prefixed is recorded in `lookup`, overwriting any
/// earlier entry for the same original.
pub fn rewrite(tree: &Node, spec: &PrefixSpec, lookup: &mut LookupTable) -> Node {
    match tree {
        Node::Mapping(map) => Node::Mapping(rewrite_mapping(map, spec, lookup)),
        Node::Sequence(items) => Node::Sequence(
            items
                .iter()
                .map(|item| rewrite(item, spec, lookup))
                .collect(),
        ),
        Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_) => tree.clone(),
    }
}

fn rewrite_mapping(map: &Mapping, spec: &PrefixSpec, lookup: &mut LookupTable) -> Mapping {
    map.iter()
        .map(|(key, value)| {
            let rewritten = match value {
                Node::String(original) if spec.is_eligible(key) => {
                    Node::String(prefix_value(original, spec, lookup))
                }
                _ => rewrite(value, spec, lookup),
            };
            (key.clone(), rewritten)
        })
        .collect()
}

fn prefix_value(original: &str, spec: &PrefixSpec, lookup: &mut LookupTable) -> String {
    if spec.is_prefixed(original) {
        return original.to_string();
    }
    let prefixed = spec.apply(original);
    trace!(%original, %prefixed, "prefixed value");
    lookup.record(original, prefixed.clone());
    prefixed
}

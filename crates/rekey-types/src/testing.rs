//! Proptest strategies for document trees.

use proptest::prelude::*;

use crate::node::Node;

/// Key names that test suites treat as eligible for prefixing.
pub const ELIGIBLE_KEYS: &[&str] = &["name", "organization", "credentials"];

/// Short lowercase strings, some of which collide with eligible key names.
pub fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(ELIGIBLE_KEYS).prop_map(str::to_string),
        "[a-z]{1,6}",
    ]
}

/// Scalar leaves: null, booleans, integers, and short strings.
pub fn arb_scalar() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Null),
        any::<bool>().prop_map(Node::from),
        any::<i64>().prop_map(Node::from),
        "[a-z_]{0,8}".prop_map(Node::from),
    ]
}

/// Arbitrary nested trees up to four levels deep.
pub fn arb_node() -> impl Strategy<Value = Node> {
    arb_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Node::Sequence),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|pairs| pairs.into_iter().collect::<Node>()),
        ]
    })
}

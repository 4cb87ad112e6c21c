//! Node-level diff: compare two document trees.
//!
//! Mappings are compared key by key, sequences position by position, and
//! anything else (scalars or mismatched shapes) by value. Records come out in
//! pre-order traversal order.

use rekey_types::{index_path, key_path, ChangeKind, ChangeRecord, Mapping, Node};
use serde::Serialize;

/// The result of comparing two document trees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeDiff {
    /// The changes, in traversal order.
    pub changes: Vec<ChangeRecord>,
}

impl NodeDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of paths present only in the updated tree.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    /// Number of paths present only in the original tree.
    pub fn removals(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    /// Number of paths whose value changed.
    pub fn modifications(&self) -> usize {
        self.count(ChangeKind::Modified)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.changes.iter()
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind() == kind).count()
    }
}

impl IntoIterator for NodeDiff {
    type Item = ChangeRecord;
    type IntoIter = std::vec::IntoIter<ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Compare two trees from the document root.
pub fn diff_nodes(original: &Node, updated: &Node) -> NodeDiff {
    diff_at(original, updated, "")
}

/// Compare two subtrees located at `path`.
///
/// Never fails: any pair of trees has a (possibly empty) diff.
pub fn diff_at(original: &Node, updated: &Node, path: &str) -> NodeDiff {
    let mut changes = Vec::new();
    collect(original, updated, path, &mut changes);
    NodeDiff { changes }
}

fn collect(original: &Node, updated: &Node, path: &str, out: &mut Vec<ChangeRecord>) {
    match (original, updated) {
        (Node::Mapping(old), Node::Mapping(new)) => collect_mappings(old, new, path, out),
        (Node::Sequence(old), Node::Sequence(new)) => collect_sequences(old, new, path, out),
        _ => {
            if original != updated {
                out.push(ChangeRecord::modified(path, original.clone(), updated.clone()));
            }
        }
    }
}

/// Walks the original's keys in document order, then keys that exist only
/// in the updated mapping in their order.
fn collect_mappings(old: &Mapping, new: &Mapping, path: &str, out: &mut Vec<ChangeRecord>) {
    for (key, old_val) in old {
        let child = key_path(path, key);
        match new.get(key) {
            Some(new_val) => collect(old_val, new_val, &child, out),
            None => out.push(ChangeRecord::removed(child, old_val.clone())),
        }
    }

    for (key, new_val) in new {
        if !old.contains_key(key) {
            out.push(ChangeRecord::added(key_path(path, key), new_val.clone()));
        }
    }
}

fn collect_sequences(old: &[Node], new: &[Node], path: &str, out: &mut Vec<ChangeRecord>) {
    for (i, (old_item, new_item)) in old.iter().zip(new).enumerate() {
        collect(old_item, new_item, &index_path(path, i), out);
    }

    // At most one of these loops runs.
    for (i, item) in new.iter().enumerate().skip(old.len()) {
        out.push(ChangeRecord::added(index_path(path, i), item.clone()));
    }
    for (i, item) in old.iter().enumerate().skip(new.len()) {
        out.push(ChangeRecord::removed(index_path(path, i), item.clone()));
    }
}

use std::fmt;

use serde::Serialize;

use crate::node::Node;

/// Whether a change added, removed, or modified a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One difference between two document trees.
///
/// `old` is `None` when the path is absent in the original tree, `new` is
/// `None` when it is absent in the updated tree. The path reconstructs the
/// location as `a.b[2].c`; the document root is the empty path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub path: String,
    pub old: Option<Node>,
    pub new: Option<Node>,
}

impl ChangeRecord {
    pub fn added(path: impl Into<String>, value: Node) -> Self {
        Self { path: path.into(), old: None, new: Some(value) }
    }

    pub fn removed(path: impl Into<String>, value: Node) -> Self {
        Self { path: path.into(), old: Some(value), new: None }
    }

    pub fn modified(path: impl Into<String>, old: Node, new: Node) -> Self {
        Self { path: path.into(), old: Some(old), new: Some(new) }
    }

    pub fn kind(&self) -> ChangeKind {
        match (&self.old, &self.new) {
            (None, _) => ChangeKind::Added,
            (_, None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        }
    }

    /// Both sides as strings, when this record is a string rewrite.
    pub fn as_string_pair(&self) -> Option<(&str, &str)> {
        match (&self.old, &self.new) {
            (Some(Node::String(old)), Some(Node::String(new))) => Some((old, new)),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeRecord {
    /// Report line: `path: old -> new`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{path}: ")?;
        write_side(f, self.old.as_ref())?;
        write!(f, " -> ")?;
        write_side(f, self.new.as_ref())
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, side: Option<&Node>) -> fmt::Result {
    match side {
        Some(node) => write!(f, "{node}"),
        None => write!(f, "None"),
    }
}

/// Path of the child stored under `key` in the mapping at `parent`.
pub fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of the element at `index` in the sequence at `parent`.
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

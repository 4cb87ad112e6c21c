//! [`Node`] → YAML text.
//!
//! Block layout throughout: `key: value` mappings, `- item` sequences, and
//! sequences under a mapping key written at the key's indentation. Empty
//! collections are written in flow form (`{}`, `[]`). Mapping order is kept.

use rekey_diff::diff_nodes;
use rekey_types::{Mapping, Node};

use crate::error::{display_path, YamlError, YamlResult};
use crate::parse::parse_str;
use crate::style::{ScalarStyle, StylePolicy};

const INDENT: usize = 2;

/// First characters that make a plain scalar ambiguous.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Flow indicators are legal inside block plain scalars but are quoted anyway.
const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}'];

/// Words a YAML 1.1 or 1.2 reader resolves to something other than a string.
const RESERVED_WORDS: &[&str] = &[
    "~", "null", "true", "false", "yes", "no", "on", "off", ".inf", "-.inf", "+.inf", ".nan",
    "<<", "=",
];

/// Serialize a tree, rendering each string in the style `policy` picks.
///
/// A requested style that cannot reproduce the string exactly falls back to
/// double quotes.
pub fn to_string<P: StylePolicy + ?Sized>(node: &Node, policy: &P) -> String {
    let mut emitter = Emitter { out: String::new(), policy };
    emitter.document(node);
    emitter.out
}

/// Check that `text` parses back to exactly `node`.
pub fn verify_round_trip(node: &Node, text: &str) -> YamlResult<()> {
    let reparsed = parse_str(text).map_err(|e| YamlError::RoundTrip {
        path: display_path(""),
        detail: e.to_string(),
    })?;
    match diff_nodes(node, &reparsed).changes.into_iter().next() {
        None => Ok(()),
        Some(drift) => Err(YamlError::RoundTrip {
            path: display_path(&drift.path),
            detail: drift.to_string(),
        }),
    }
}

struct Emitter<'p, P: ?Sized> {
    out: String,
    policy: &'p P,
}

impl<P: StylePolicy + ?Sized> Emitter<'_, P> {
    fn document(&mut self, node: &Node) {
        match node {
            Node::Mapping(map) if !map.is_empty() => self.mapping(map, 0, false),
            Node::Sequence(items) if !items.is_empty() => self.sequence(items, 0, false),
            _ => self.scalar(node, INDENT),
        }
    }

    /// `inline_first`: the first entry continues a `- ` already written.
    fn mapping(&mut self, map: &Mapping, indent: usize, inline_first: bool) {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(indent);
            }
            self.key(key);
            self.out.push(':');
            match value {
                Node::Mapping(child) if !child.is_empty() => {
                    self.out.push('\n');
                    self.mapping(child, indent + INDENT, false);
                }
                Node::Sequence(items) if !items.is_empty() => {
                    self.out.push('\n');
                    self.sequence(items, indent, false);
                }
                _ => {
                    self.out.push(' ');
                    self.scalar(value, indent + INDENT);
                }
            }
        }
    }

    fn sequence(&mut self, items: &[Node], indent: usize, inline_first: bool) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(indent);
            }
            self.out.push_str("- ");
            match item {
                Node::Mapping(map) if !map.is_empty() => self.mapping(map, indent + INDENT, true),
                Node::Sequence(inner) if !inner.is_empty() => {
                    self.sequence(inner, indent + INDENT, true)
                }
                _ => self.scalar(item, indent + INDENT),
            }
        }
    }

    /// Writes a scalar (or empty collection) and the line break after it.
    /// `block_indent` is where literal block content starts.
    fn scalar(&mut self, node: &Node, block_indent: usize) {
        match node {
            Node::Null => self.out.push_str("null"),
            Node::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Node::Number(n) => self.out.push_str(&n.to_string()),
            Node::String(s) => match self.policy.style_for(s) {
                ScalarStyle::Literal if literal_ok(s) => {
                    // Block content supplies its own line breaks.
                    self.literal(s, block_indent);
                    return;
                }
                ScalarStyle::Plain if plain_ok(s) => self.out.push_str(s),
                _ => self.double_quoted(s),
            },
            Node::Sequence(_) => self.out.push_str("[]"),
            Node::Mapping(_) => self.out.push_str("{}"),
        }
        self.out.push('\n');
    }

    fn key(&mut self, key: &str) {
        if plain_ok(key) {
            self.out.push_str(key);
        } else {
            self.double_quoted(key);
        }
    }

    fn literal(&mut self, s: &str, indent: usize) {
        let body = s.trim_end_matches('\n');
        let trailing = s.len() - body.len();
        self.out.push_str(match trailing {
            0 => "|-",
            1 => "|",
            _ => "|+",
        });
        self.out.push('\n');
        for line in body.split('\n') {
            if !line.is_empty() {
                self.pad(indent);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
        for _ in 1..trailing {
            self.out.push('\n');
        }
    }

    fn double_quoted(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                '\0' => self.out.push_str("\\0"),
                '\u{85}' => self.out.push_str("\\N"),
                '\u{2028}' => self.out.push_str("\\L"),
                '\u{2029}' => self.out.push_str("\\P"),
                '\u{feff}' => self.out.push_str("\\uFEFF"),
                c if c.is_control() => self.out.push_str(&format!("\\x{:02X}", c as u32)),
                c if is_unprintable(c) => self.out.push_str(&format!("\\u{:04X}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }
}

/// Characters that may not appear raw in plain or literal scalars.
fn is_unprintable(c: char) -> bool {
    c.is_control() || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}' | '\u{fffe}' | '\u{ffff}')
}

/// `---` and `...` at the start of a line end the document.
fn starts_with_marker(s: &str) -> bool {
    s.starts_with("---") || s.starts_with("...")
}

fn plain_ok(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        return false;
    }
    if INDICATORS.contains(&first) || starts_with_marker(s) {
        return false;
    }
    if s.ends_with(':') || s.contains(": ") || s.contains(" #") {
        return false;
    }
    if s.chars().any(|c| is_unprintable(c) || FLOW_INDICATORS.contains(&c)) {
        return false;
    }
    !resolves_to_non_string(s)
}

fn resolves_to_non_string(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    if RESERVED_WORDS.contains(&lower.as_str()) || s.parse::<f64>().is_ok() {
        return true;
    }
    // Dates, times, octal, hex, sexagesimal and underscored numbers.
    let mut chars = s.chars();
    let numeric_start = match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('+' | '-' | '.'), Some(c)) => c.is_ascii_digit(),
        _ => false,
    };
    numeric_start
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '-'))
}

/// A literal block reproduces `s` only if its first line carries no leading
/// whitespace, no line is whitespace-only, and nothing needs escaping.
fn literal_ok(s: &str) -> bool {
    let body = s.trim_end_matches('\n');
    if body.is_empty() || body.starts_with([' ', '\t', '\n']) {
        return false;
    }
    if s.chars().any(|c| c != '\n' && c != '\t' && is_unprintable(c)) {
        return false;
    }
    body.split('\n')
        .all(|line| line.is_empty() || !line.trim().is_empty())
}

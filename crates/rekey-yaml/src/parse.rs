//! YAML text → [`Node`] conversion.

use rekey_types::{index_path, key_path, Mapping, Node};
use serde_yaml::Value;

use crate::error::{display_path, YamlError, YamlResult};

/// Parse a single YAML document into a tree.
///
/// Merge keys (`<<`) are applied. Custom tags such as `!unsafe` are dropped
/// and the tagged value kept. Mapping keys must be strings: a number,
/// boolean, null, or collection key is rejected rather than retyped, since
/// writing it back as a string would change the document. A document with no
/// content parses as [`Node::Null`].
pub fn parse_str(text: &str) -> YamlResult<Node> {
    if is_blank_document(text) {
        return Ok(Node::Null);
    }
    let mut value: Value = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    convert(value, "")
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

fn convert(value: Value, path: &str) -> YamlResult<Node> {
    let node = match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => Node::Number(n),
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| convert(item, &index_path(path, i)))
                .collect::<YamlResult<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let key = key_string(key, path)?;
                let child = key_path(path, &key);
                if out.contains_key(&key) {
                    return Err(YamlError::DuplicateKey { path: child });
                }
                let node = convert(value, &child)?;
                out.insert(key, node);
            }
            Node::Mapping(out)
        }
        Value::Tagged(tagged) => convert(tagged.value, path)?,
    };
    Ok(node)
}

fn key_string(key: Value, path: &str) -> YamlResult<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Tagged(tagged) => key_string(tagged.value, path),
        Value::Number(_) => Err(unsupported_key(path, "number")),
        Value::Bool(_) => Err(unsupported_key(path, "boolean")),
        Value::Null => Err(unsupported_key(path, "null")),
        Value::Sequence(_) => Err(unsupported_key(path, "sequence")),
        Value::Mapping(_) => Err(unsupported_key(path, "mapping")),
    }
}

fn unsupported_key(path: &str, kind: &'static str) -> YamlError {
    YamlError::UnsupportedKey { path: display_path(path), kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_order_is_document_order() {
        let node = parse_str("zeta: 1\nalpha: two\nmid: true\n").unwrap();
        let keys: Vec<&String> = node.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(node.get("alpha"), Some(&Node::from("two")));
        assert_eq!(node.get("mid"), Some(&Node::Bool(true)));
        assert_eq!(node.get("zeta"), Some(&Node::from(1)));
    }

    #[test]
    fn nested_structures() {
        let text = "\
job_templates:
- name: deploy
  credentials:
  - aws
  - vault
- name: backup
";
        let node = parse_str(text).unwrap();
        let jobs = node.get("job_templates").and_then(Node::as_sequence).unwrap();
        assert_eq!(jobs.len(), 2);
        let creds = jobs[0].get("credentials").and_then(Node::as_sequence).unwrap();
        assert_eq!(creds, [Node::from("aws"), Node::from("vault")]);
    }

    #[test]
    fn custom_tags_are_dropped() {
        let node = parse_str("extra_vars: !unsafe '{{ lookup }}'\n").unwrap();
        assert_eq!(node.get("extra_vars"), Some(&Node::from("{{ lookup }}")));
    }

    #[test]
    fn merge_keys_are_applied() {
        let text = "\
base: &base
  organization: infra
team:
  <<: *base
  name: ops
";
        let node = parse_str(text).unwrap();
        let team = node.get("team").unwrap();
        assert_eq!(team.get("organization"), Some(&Node::from("infra")));
        assert_eq!(team.get("name"), Some(&Node::from("ops")));
        assert!(team.get("<<").is_none());
    }

    fn unsupported_kind(text: &str) -> (String, &'static str) {
        match parse_str(text).unwrap_err() {
            YamlError::UnsupportedKey { path, kind } => (path, kind),
            other => panic!("expected UnsupportedKey, got {other:?}"),
        }
    }

    #[test]
    fn number_and_boolean_keys_are_rejected() {
        assert_eq!(unsupported_kind("1: one\n"), ("<root>".to_string(), "number"));
        assert_eq!(unsupported_kind("0x1F: y\n"), ("<root>".to_string(), "number"));
        assert_eq!(unsupported_kind("ports:\n  true: x\n"), ("ports".to_string(), "boolean"));
    }

    #[test]
    fn quoted_numeric_keys_are_strings() {
        let node = parse_str("'1': one\n\"true\": x\n").unwrap();
        assert_eq!(node.get("1"), Some(&Node::from("one")));
        assert_eq!(node.get("true"), Some(&Node::from("x")));
    }

    #[test]
    fn keys_colliding_once_tags_are_dropped() {
        let err = parse_str("!a x: 1\n!b x: 2\n").unwrap_err();
        assert!(matches!(err, YamlError::DuplicateKey { ref path } if path == "x"));
    }

    #[test]
    fn collection_keys_are_rejected() {
        let (path, kind) = unsupported_kind("outer:\n  ? [a, b]\n  : value\n");
        assert_eq!(path, "outer");
        assert_eq!(kind, "sequence");
    }

    #[test]
    fn blank_documents_are_null() {
        assert_eq!(parse_str("").unwrap(), Node::Null);
        assert_eq!(parse_str("# only a comment\n\n").unwrap(), Node::Null);
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = parse_str("name: [unclosed\n").unwrap_err();
        assert!(matches!(err, YamlError::Parse(_)));
    }

    #[test]
    fn block_scalars_keep_content() {
        let node = parse_str("script: |\n  echo one\n  echo two\n").unwrap();
        assert_eq!(node.get("script"), Some(&Node::from("echo one\necho two\n")));
    }
}

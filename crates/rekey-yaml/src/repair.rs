//! Repair for block scalars written with content on the indicator line.
//!
//! Hand-edited exports sometimes contain `description: | some text`, which
//! is not valid YAML: only a comment may follow a block indicator. The repair
//! moves the content onto its own line, indented under the key:
//!
//! ```text
//! description: | some text      description: |
//!   more text              →      some text
//!                                 more text
//! ```

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `<indent><dashes><key>: <indicator> <content>` on a single line.
static INLINE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^(?P<indent> *)(?P<dash>(?:- +)*)(?P<key>[^\s#'"\-:][^#'"\n:]*: +)?(?P<ind>[|>][-+]?)[ \t]+(?P<body>[^\s#][^\n]*)$"#,
    )
    .expect("inline block pattern is valid")
});

/// Move inline block-scalar content onto the following line.
///
/// Returns the input unchanged (borrowed) when nothing needed repair. Only
/// lines where the indicator follows a mapping key or a sequence dash are
/// touched.
pub fn repair_block_scalars(text: &str) -> Cow<'_, str> {
    INLINE_BLOCK.replace_all(text, |caps: &Captures<'_>| {
        let indent = &caps["indent"];
        let dash = &caps["dash"];
        let key = caps.name("key").map_or("", |m| m.as_str());
        if dash.is_empty() && key.is_empty() {
            return caps[0].to_string();
        }

        // Content must sit deeper than the node that owns the scalar: the key
        // column when there is a key, otherwise the innermost dash.
        let content_indent = if key.is_empty() {
            indent.len() + dash.len()
        } else {
            indent.len() + dash.len() + 2
        };
        format!(
            "{indent}{dash}{key}{ind}\n{pad}{body}",
            ind = &caps["ind"],
            pad = " ".repeat(content_indent),
            body = &caps["body"],
        )
    })
}

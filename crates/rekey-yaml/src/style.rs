//! Scalar style selection.

/// How a string scalar is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted when that is unambiguous, double-quoted otherwise.
    Plain,
    /// Always double-quoted with escapes.
    DoubleQuoted,
    /// Literal block (`|`), one source line per output line.
    Literal,
}

/// Chooses the style of each string value at emit time.
///
/// Passed per call to the emitter; nothing is registered globally. Any
/// `Fn(&str) -> ScalarStyle` is a policy.
pub trait StylePolicy {
    fn style_for(&self, value: &str) -> ScalarStyle;
}

impl<F> StylePolicy for F
where
    F: Fn(&str) -> ScalarStyle,
{
    fn style_for(&self, value: &str) -> ScalarStyle {
        self(value)
    }
}

/// Characters that send a string to a literal block.
pub const BLOCK_TRIGGERS: &[char] = &['\n', '"', '\'', '\\', '<', '>'];

/// Literal blocks for multi-line or quote-sensitive strings, default style
/// for everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockForSpecial;

impl StylePolicy for BlockForSpecial {
    fn style_for(&self, value: &str) -> ScalarStyle {
        if value.contains(BLOCK_TRIGGERS) {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_characters_trigger_literal() {
        for value in ["a\nb", "say \"hi\"", "it's", "C:\\temp", "<b>", "a > b"] {
            assert_eq!(BlockForSpecial.style_for(value), ScalarStyle::Literal, "{value:?}");
        }
    }

    #[test]
    fn ordinary_strings_use_default_style() {
        for value in ["web", "dev_web", "with space", "", "{{ var }}"] {
            assert_eq!(BlockForSpecial.style_for(value), ScalarStyle::Plain, "{value:?}");
        }
    }

    #[test]
    fn closures_are_policies() {
        let quote_all = |_: &str| ScalarStyle::DoubleQuoted;
        assert_eq!(quote_all.style_for("x"), ScalarStyle::DoubleQuoted);
    }
}

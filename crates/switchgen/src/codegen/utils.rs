use std::borrow::Cow;
use std::fmt::Write;

/// Escape a value for the inside of a C# regular string literal.
///
/// Values that need no escaping are returned unchanged.
pub(super) fn string_literal(value: &str) -> Cow<'_, str> {
    if !value.chars().any(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            c if is_unprintable(c) => {
                let _ = write!(escaped, "\\u{:04X}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn needs_escape(c: char) -> bool {
    matches!(c, '\\' | '"') || is_unprintable(c)
}

// C# also ends a line at U+2028 and U+2029
fn is_unprintable(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_are_borrowed() {
        assert!(matches!(string_literal("Warning Level"), Cow::Borrowed(_)));
        assert!(matches!(string_literal(""), Cow::Borrowed(_)));
    }

    #[test]
    fn quotes_backslashes_and_controls_are_escaped() {
        assert_eq!(string_literal(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(string_literal(r"C:\tools"), r"C:\\tools");
        assert_eq!(string_literal("a\nb\tc"), r"a\nb\tc");
        assert_eq!(string_literal("bell\u{7}"), r"bell\u0007");
    }

    #[test]
    fn unicode_line_separators_are_escaped() {
        assert_eq!(string_literal("one\u{2028}two"), r"one\u2028two");
        assert_eq!(string_literal("\u{2029}"), r"\u2029");
    }
}

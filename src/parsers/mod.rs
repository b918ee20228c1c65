pub mod answer;

pub use answer::{ParsedAnswer, parse_answer};

pub(crate) fn collapse_whitespace(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push('\u{2026}');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_joins_lines_and_tabs() {
        assert_eq!(
            collapse_whitespace("  hello\n\n   world\tfrom   parser  "),
            "hello world from parser"
        );
    }

    #[test]
    fn collapse_whitespace_of_blank_is_empty() {
        assert_eq!(collapse_whitespace("   \n\t   "), "");
    }

    #[test]
    fn truncate_chars_at_80_and_81_char_boundaries() {
        let exactly_80 = "a".repeat(80);
        let exactly_81 = "b".repeat(81);

        assert_eq!(truncate_chars(&exactly_80, 80), exactly_80);

        let mut expected = "b".repeat(80);
        expected.push('\u{2026}');
        assert_eq!(truncate_chars(&exactly_81, 80), expected);
    }

    #[test]
    fn truncate_chars_handles_multibyte_chars_safely() {
        let multibyte = "é".repeat(81);

        let truncated = truncate_chars(&multibyte, 80);
        let mut expected = "é".repeat(80);
        expected.push('\u{2026}');
        assert_eq!(truncated, expected);
        assert_eq!(truncated.chars().count(), 81); // 80 chars + ellipsis
    }
}

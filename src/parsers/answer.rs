//! Splitting of the backend's combined answer string.
//!
//! The chat endpoint returns a single blob shaped like
//! `"Answer: <text>Sources:<text>"`. Only the first `Sources:` marker is a
//! split point; anything after it, including further markers, belongs to the
//! sources block. A marker inside the answer body itself cannot be told apart
//! from the real one and will split early.

use serde::{Deserialize, Serialize};

pub const ANSWER_MARKER: &str = "Answer:";
pub const SOURCES_MARKER: &str = "Sources:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    pub content: String,
    /// Empty when the backend sent no sources block.
    pub sources: String,
}

impl ParsedAnswer {
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Split a raw answer into its body and sources. Never fails.
pub fn parse_answer(raw: &str) -> ParsedAnswer {
    let (body, sources) = match raw.split_once(SOURCES_MARKER) {
        Some((body, sources)) => (body, sources.trim()),
        None => (raw, ""),
    };

    let body = body.trim_start();
    let body = body.strip_prefix(ANSWER_MARKER).unwrap_or(body);

    ParsedAnswer {
        content: body.trim().to_string(),
        sources: sources.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_fields() {
        assert_eq!(parse_answer(""), ParsedAnswer::default());
    }

    #[test]
    fn splits_answer_and_sources() {
        let parsed = parse_answer("Answer: Paris is the capital.Sources:doc1.pdf p.2");

        assert_eq!(parsed.content, "Paris is the capital.");
        assert_eq!(parsed.sources, "doc1.pdf p.2");
        assert!(parsed.has_sources());
    }

    #[test]
    fn missing_sources_marker_leaves_sources_empty() {
        let parsed = parse_answer("Answer:   Only an answer here.  \n");

        assert_eq!(parsed.content, "Only an answer here.");
        assert!(parsed.sources.is_empty());
        assert!(!parsed.has_sources());
    }

    #[test]
    fn missing_answer_marker_keeps_prefix() {
        let parsed = parse_answer("  plain text  Sources:  a.pdf ");

        assert_eq!(parsed.content, "plain text");
        assert_eq!(parsed.sources, "a.pdf");
    }

    #[test]
    fn only_first_sources_marker_splits() {
        let parsed = parse_answer("Answer: x Sources: a.pdf Sources: b.pdf");

        assert_eq!(parsed.content, "x");
        assert_eq!(parsed.sources, "a.pdf Sources: b.pdf");
    }

    #[test]
    fn only_leading_answer_marker_is_stripped() {
        let parsed = parse_answer("Answer: the word Answer: appears twice");

        assert_eq!(parsed.content, "the word Answer: appears twice");
    }

    #[test]
    fn answer_marker_after_leading_whitespace_is_stripped() {
        assert_eq!(parse_answer("  \nAnswer: x").content, "x");
    }

    #[test]
    fn sources_marker_alone_yields_empty_halves() {
        assert_eq!(parse_answer("Sources:"), ParsedAnswer::default());
    }

    #[test]
    fn multiline_sources_are_kept_verbatim_inside() {
        let parsed = parse_answer("Answer: yes\nSources:\n- a.pdf p.1\n- b.pdf p.4\n");

        assert_eq!(parsed.content, "yes");
        assert_eq!(parsed.sources, "- a.pdf p.1\n- b.pdf p.4");
    }
}

//! Transcript line parsing.

use regex::Regex;

/// Parses chat-transcript lines into messages.
///
/// An exported line looks like `[09.09.23, 14:35:02] ~ john_doe: Hello!`.
/// Everything after the sender separator is the message. Lines without the
/// bracketed prefix fall back to their first whitespace-delimited token.
#[derive(Debug, Clone)]
pub struct TranscriptParser {
    prefixed: Regex,
}

impl TranscriptParser {
    pub fn new() -> Self {
        // Bracketed timestamp, optional tilde, sender up to the first colon.
        let prefixed = Regex::new(r"^\[[^\]]*\]\s*~?\s*[^:]*:\s*(.*)$")
            .expect("transcript line pattern is valid");
        Self { prefixed }
    }

    /// Extract the message from one transcript line.
    ///
    /// Returns `None` when the line holds no token at all; an empty message
    /// after a recognized prefix is returned as-is so the caller can decide
    /// how to treat it.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        if let Some(captures) = self.prefixed.captures(line) {
            return captures.get(1).map(|m| m.as_str());
        }
        line.split_whitespace().next()
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_line_yields_full_message() {
        let parser = TranscriptParser::new();
        assert_eq!(
            parser.parse_line("[09.09.23, 14:35:02] ~ john_doe: Hello world!"),
            Some("Hello world!")
        );
    }

    #[test]
    fn test_prefixed_line_without_tilde() {
        let parser = TranscriptParser::new();
        assert_eq!(
            parser.parse_line("[09.09.23, 14:35] dana: on my way"),
            Some("on my way")
        );
    }

    #[test]
    fn test_unprefixed_line_yields_first_token() {
        let parser = TranscriptParser::new();
        assert_eq!(parser.parse_line("hello world"), Some("hello"));
    }

    #[test]
    fn test_empty_line_is_a_parse_failure() {
        let parser = TranscriptParser::new();
        assert_eq!(parser.parse_line(""), None);
        assert_eq!(parser.parse_line("   \t"), None);
    }

    #[test]
    fn test_empty_message_after_prefix_is_kept() {
        let parser = TranscriptParser::new();
        assert_eq!(parser.parse_line("[09.09.23, 14:35:02] ~ john_doe:"), Some(""));
    }

    #[test]
    fn test_message_may_contain_colons() {
        let parser = TranscriptParser::new();
        assert_eq!(
            parser.parse_line("[09.09.23, 14:35:02] ~ john_doe: see: this link"),
            Some("see: this link")
        );
    }

    #[test]
    fn test_non_ascii_message() {
        let parser = TranscriptParser::new();
        assert_eq!(
            parser.parse_line("[09.09.23, 14:35:02] ~ דנה: שלום עולם"),
            Some("שלום עולם")
        );
    }
}

//! Text clean-up for model output

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Trim and collapse every whitespace run to a single space
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_mixed_whitespace() {
        assert_eq!(normalize_whitespace("a   b\n\tc"), "a b c");
        assert_eq!(normalize_whitespace("  Bonjour\r\n le   monde  "), "Bonjour le monde");
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
        assert_eq!(normalize_whitespace("word"), "word");
        // non-breaking space counts as whitespace
        assert_eq!(normalize_whitespace("a\u{00A0}\u{00A0}b"), "a b");
    }

    #[test]
    fn test_idempotent() {
        for s in ["", "  x  ", "a\n\nb\tc", "już\u{2003} gotowe ", "one two"] {
            let once = normalize_whitespace(s);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }
}

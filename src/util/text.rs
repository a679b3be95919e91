use unicode_segmentation::UnicodeSegmentation;

/// Keep at most `max` grapheme clusters of `s`. Returns the kept prefix and
/// whether anything was cut.
pub fn truncate_graphemes(s: &str, max: usize) -> (&str, bool) {
    match s.grapheme_indices(true).nth(max) {
        Some((cut, _)) => (&s[..cut], true),
        None => (s, false),
    }
}

/// Fold line breaks into spaces so the text fits on one table row.
pub fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_is_untouched() {
        assert_eq!(truncate_graphemes("hello", 10), ("hello", false));
        assert_eq!(truncate_graphemes("hello", 5), ("hello", false));
        assert_eq!(truncate_graphemes("", 0), ("", false));
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_graphemes("hello world", 5), ("hello", true));
    }

    #[test]
    fn truncate_never_splits_a_grapheme() {
        // family emoji is one grapheme made of several code points
        let s = "a👨‍👩‍👧b";
        assert_eq!(truncate_graphemes(s, 2), ("a👨‍👩‍👧", true));
        // e + combining acute
        assert_eq!(truncate_graphemes("e\u{0301}x", 1), ("e\u{0301}", true));
    }

    #[test]
    fn single_line_folds_breaks() {
        assert_eq!(single_line("a\nb\r\nc\rd"), "a b c d");
    }
}

//! Match highlighting for result display strings.

use regex::RegexBuilder;

/// Wrap every case-insensitive literal occurrence of `query` in `text` with
/// `<strong>` markers, preserving the original casing of the matched text.
///
/// The query is escaped before matching, so regex metacharacters in user
/// input match literally. Non-matching text is returned byte-for-byte; the
/// renderer is responsible for structural sanitization of `text`, this
/// function only adds emphasis markers.
pub fn highlight(text: &str, query: &str) -> String {
    if query.is_empty() {
        return text.to_string();
    }
    let pattern = regex::escape(query);
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        // Escaped literals only fail on pathological size limits; show the
        // text unhighlighted rather than dropping it.
        Err(_) => return text.to_string(),
    };
    re.replace_all(text, |caps: &regex::Captures| {
        format!("<strong>{}</strong>", &caps[0])
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match_preserves_original() {
        assert_eq!(
            highlight("Terminal.app", "term"),
            "<strong>Term</strong>inal.app"
        );
    }

    #[test]
    fn test_empty_query_returns_text_unchanged() {
        assert_eq!(highlight("Terminal.app", ""), "Terminal.app");
    }

    #[test]
    fn test_all_occurrences_wrapped() {
        assert_eq!(
            highlight("banana", "an"),
            "b<strong>an</strong><strong>an</strong>a"
        );
    }

    #[test]
    fn test_metacharacters_match_literally() {
        assert_eq!(highlight("a.b c", "."), "a<strong>.</strong>b c");
        assert_eq!(highlight("f(x) = y", "(x)"), "f<strong>(x)</strong> = y");
    }

    #[test]
    fn test_no_match_leaves_text_alone() {
        assert_eq!(highlight("firefox", "zzz"), "firefox");
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(highlight("Café Notes", "café"), "<strong>Café</strong> Notes");
    }
}

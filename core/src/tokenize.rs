//! Splitting a single command-line string into tokens.

use std::sync::LazyLock;

use regex::Regex;

// A double-quoted run (no escapes) or a maximal run of anything but ASCII
// whitespace (space, \t, \n, \x0B, \x0C, \r).
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|([^ \t\n\x0B\x0C\r]+)"#).expect("static regex must compile")
});

/// Splits `input` into tokens.
///
/// Double-quoted runs become one token with the quotes stripped; anything
/// else splits on ASCII whitespace; Unicode spaces such as U+00A0 stay
/// inside tokens. There is no escape handling, and an unterminated quote is
/// kept as part of an ordinary token.
///
/// # Examples
///
/// ```
/// use cla_core::tokenize;
///
/// assert_eq!(
///     tokenize(r#"-title "Hello  world" -n 3"#),
///     vec!["-title", "Hello  world", "-n", "3"]
/// );
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_words() {
        assert_eq!(tokenize("-a  b\tc\n"), vec!["-a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_splits_on_ascii_whitespace_only() {
        assert_eq!(
            tokenize("a\u{a0}b\u{3000}c\x0Bd\x0Ce"),
            vec!["a\u{a0}b\u{3000}c", "d", "e"]
        );
    }

    #[test]
    fn test_tokenize_empty_quotes() {
        assert_eq!(tokenize(r#"-name """#), vec!["-name", ""]);
    }

    #[test]
    fn test_tokenize_quote_inside_word() {
        // The quoted alternative only applies at a token start.
        assert_eq!(tokenize(r#"a"b c""#), vec![r#"a"b"#, r#"c""#]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        assert_eq!(tokenize(r#""open ended"#), vec![r#""open"#, "ended"]);
    }

    #[test]
    fn test_tokenize_adjacent_quoted_runs() {
        assert_eq!(tokenize(r#""a b""c d""#), vec!["a b", "c d"]);
    }
}

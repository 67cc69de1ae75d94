//! Splits template text into literal runs and brace-delimited tokens.

use regex::Regex;
use std::sync::LazyLock;

static BRACE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // constant pattern
    Regex::new(r"\\?\{.*?\}").unwrap()
});

/// One piece of tokenized template text, borrowing from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text between placeholders
    Literal(&'a str),
    /// `\{...}\` with the wrapping backslashes stripped; never looked up
    Escaped(&'a str),
    /// Brace-delimited text to look up verbatim (may carry a leading backslash)
    Placeholder(&'a str),
}

/// Tokenizes `text` in order. Empty literal runs are not emitted.
///
/// A brace token wrapped in a leading and a trailing backslash is escaped.
/// A token with only a leading backslash stays a placeholder candidate and,
/// since no registered token starts with a backslash, passes through as-is.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for found in BRACE_TOKEN.find_iter(text) {
        // A previous escape may have consumed the backslash this match starts with
        let start = found.start().max(cursor);
        if start > cursor {
            tokens.push(Token::Literal(&text[cursor..start]));
        }

        let raw = &text[start..found.end()];
        let closed_by_backslash = text[found.end()..].starts_with('\\');
        if raw.starts_with('\\') && closed_by_backslash {
            tokens.push(Token::Escaped(&raw[1..]));
            cursor = found.end() + 1;
        } else {
            tokens.push(Token::Placeholder(raw));
            cursor = found.end();
        }
    }

    if cursor < text.len() {
        tokens.push(Token::Literal(&text[cursor..]));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(tokenize("hello world"), vec![Token::Literal("hello world")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_interleaved_tokens_keep_order() {
        assert_eq!(
            tokenize("A{space}B{newline}C"),
            vec![
                Token::Literal("A"),
                Token::Placeholder("{space}"),
                Token::Literal("B"),
                Token::Placeholder("{newline}"),
                Token::Literal("C"),
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(
            tokenize("{user}{guild}"),
            vec![Token::Placeholder("{user}"), Token::Placeholder("{guild}")]
        );
    }

    #[test]
    fn test_escaped_token() {
        assert_eq!(
            tokenize(r"say \{user.id}\ now"),
            vec![
                Token::Literal("say "),
                Token::Escaped("{user.id}"),
                Token::Literal(" now"),
            ]
        );
    }

    #[test]
    fn test_escape_closing_backslash_is_not_reused() {
        assert_eq!(
            tokenize(r"\{a}\{b}"),
            vec![Token::Escaped("{a}"), Token::Placeholder("{b}")]
        );
    }

    #[test]
    fn test_half_escaped_token_is_placeholder_candidate() {
        assert_eq!(
            tokenize(r"\{user.id}"),
            vec![Token::Placeholder(r"\{user.id}")]
        );
        assert_eq!(
            tokenize(r"{user.id}\"),
            vec![Token::Placeholder("{user.id}"), Token::Literal(r"\")]
        );
    }

    #[test]
    fn test_non_greedy_match_and_unclosed_brace() {
        assert_eq!(
            tokenize("{a} and {b"),
            vec![
                Token::Placeholder("{a}"),
                Token::Literal(" and {b"),
            ]
        );
    }

    #[test]
    fn test_braces_do_not_span_lines() {
        assert_eq!(
            tokenize("{a\nb}"),
            vec![Token::Literal("{a\nb}")]
        );
    }
}

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A word token is a run of word characters; anything else that is not
    // whitespace is emitted as a single-character punctuation token.
    static ref TOKEN_RE: Regex = Regex::new(r"\w+|[^\w\s]").expect("invalid token regex");
}

/// Splits text into word-level tokens.
///
/// Runs of word characters form one token each; punctuation characters are
/// separated into their own tokens; whitespace only delimits. The pattern is
/// Unicode-aware, so accented and non-Latin words tokenize as single units.
///
/// # Example
/// ```
/// use shortclass::tokenize::word_tokenize;
///
/// let tokens = word_tokenize("Hello, world!");
/// assert_eq!(tokens, vec!["Hello", ",", "world", "!"]);
/// ```
pub fn word_tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(word_tokenize("two words"), vec!["two", "words"]);
    }

    #[test]
    fn test_separates_punctuation() {
        assert_eq!(
            word_tokenize("wait... what?!"),
            vec!["wait", ".", ".", ".", "what", "?", "!"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(word_tokenize("").is_empty());
        assert!(word_tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(word_tokenize("café olé"), vec!["café", "olé"]);
    }

    #[test]
    fn test_digits_are_word_tokens() {
        assert_eq!(word_tokenize("room 101"), vec!["room", "101"]);
    }
}

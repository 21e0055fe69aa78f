//! Stop filter implementation.
//!
//! Removes common English words before label expansion so they neither end
//! up in the index nor occupy slots of the label window. A removed token's
//! position increment is carried over to the next kept token, which keeps
//! phrase gaps intact.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::token_filter::Filter;
//! use sarissa_skos::analysis::token_filter::stop::StopFilter;
//! use sarissa_skos::analysis::token::Token;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![Token::new("the", 0), Token::new("weapons", 1)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "weapons");
//! assert_eq!(result[0].position_increment, 2);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that drops stop words from the token stream.
///
/// Matching is exact, so the filter belongs after
/// [`LowercaseFilter`](crate::analysis::token_filter::lowercase::LowercaseFilter).
/// Injected synonyms and URI tokens are never dropped.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// A stop filter with the default English stop words.
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_ENGLISH_STOP_WORDS_SET.clone())
    }

    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// # Examples
    ///
    /// ```
    /// use sarissa_skos::analysis::token_filter::stop::StopFilter;
    ///
    /// let filter = StopFilter::from_words(vec!["of", "for"]);
    /// assert_eq!(filter.len(), 2);
    /// assert!(filter.is_stop_word("of"));
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_stop_words(words.into_iter().map(Into::into).collect())
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }

    fn is_stopped(&self, token: &Token) -> bool {
        !matches!(
            token.token_type(),
            Some(TokenType::Synonym) | Some(TokenType::Uri)
        ) && self.is_stop_word(&token.text)
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filter = self.clone();
        let mut skipped = 0;
        Ok(Box::new(tokens.filter_map(move |mut token| {
            if filter.is_stopped(&token) {
                skipped += token.position_increment;
                return None;
            }
            token.position_increment += skipped;
            skipped = 0;
            Some(token)
        })))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::IntoTokenStream;
    use crate::config::SkosType;

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::new();
        let tokens = vec![
            Token::new("weapons", 0),
            Token::new("of", 1),
            Token::new("the", 2),
            Token::new("world", 3),
        ];

        let result: Vec<Token> = filter.filter(tokens.into_token_stream()).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "weapons");
        assert_eq!(result[0].position_increment, 1);
        assert_eq!(result[1].text, "world");
        assert_eq!(result[1].position, 3);
        assert_eq!(result[1].position_increment, 3);
    }

    #[test]
    fn test_custom_words_and_trailing_stop_words() {
        let filter = StopFilter::from_words(vec!["depot"]);
        let tokens = vec![Token::new("the", 0), Token::new("depot", 1)];

        let result: Vec<Token> = filter.filter(tokens.into_token_stream()).unwrap().collect();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "the");
    }

    #[test]
    fn test_synonyms_and_uris_are_kept() {
        let filter = StopFilter::new();
        let weapons = Token::new("weapons", 0);
        let tokens = vec![
            weapons.clone(),
            weapons.synonym("the", SkosType::Alt),
            Token::new("a", 1).with_token_type(TokenType::Uri),
        ];

        let result: Vec<Token> = filter.filter(tokens.into_token_stream()).unwrap().collect();
        assert_eq!(result.len(), 3);
        assert!(result[1].is_synonym());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
        assert!(!StopFilter::new().is_empty());
    }
}

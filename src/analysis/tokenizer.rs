//! Tokenizers: the first step of an analysis pipeline.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//! - [`keyword::KeywordTokenizer`] - Emits the whole (trimmed) input as one token
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::tokenizer::Tokenizer;
//! use sarissa_skos::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("arms  race").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[1].start_offset, 6);
//! ```

use crate::analysis::token::{TokenStream, TokenType};
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Classify a word by its characters.
pub(crate) fn detect_token_type(word: &str) -> TokenType {
    if word.is_empty() {
        TokenType::Other
    } else if word.chars().all(char::is_numeric) {
        TokenType::Num
    } else if looks_like_uri(word) {
        TokenType::Uri
    } else if word.chars().any(char::is_alphabetic) {
        TokenType::Word
    } else {
        TokenType::Other
    }
}

/// `scheme:rest`, with an RFC 3986 scheme.
pub(crate) fn looks_like_uri(text: &str) -> bool {
    let Some((scheme, rest)) = text.split_once(':') else {
        return false;
    };
    !rest.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

pub mod keyword;
pub mod unicode_word;
pub mod whitespace;

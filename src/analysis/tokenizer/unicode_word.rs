//! Unicode word tokenizer implementation.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and keeps only
//! segments containing at least one alphanumeric character.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::tokenizer::Tokenizer;
//! use sarissa_skos::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Arms, weapons & Waffen!").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "Arms");
//! assert_eq!(tokens[1].text, "weapons");
//! assert_eq!(tokens[2].text, "Waffen");
//! assert_eq!(tokens[2].position, 2);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::{Tokenizer, detect_token_type};
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split_word_bound_indices()
            .filter(|(_, word)| word.chars().any(char::is_alphanumeric))
            .enumerate()
            .map(|(position, (start, word))| {
                Token::with_offsets(word, position, start, start + word.len())
                    .with_token_type(detect_token_type(word))
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

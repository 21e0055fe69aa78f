//! Keyword tokenizer implementation.

use super::{Tokenizer, detect_token_type};

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that emits the whole input, minus surrounding whitespace,
/// as a single token.
///
/// Used for fields holding one concept URI per value.
#[derive(Clone, Debug, Default)]
pub struct KeywordTokenizer;

impl KeywordTokenizer {
    pub fn new() -> Self {
        KeywordTokenizer
    }
}

impl Tokenizer for KeywordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }
        let start = text.len() - text.trim_start().len();
        let token = Token::with_offsets(trimmed, 0, start, start + trimmed.len())
            .with_token_type(detect_token_type(trimmed));
        Ok(Box::new(std::iter::once(token)))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

//! Whitespace tokenizer implementation.

use super::{Tokenizer, detect_token_type};

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
///
/// Offsets are byte offsets into the input, so repeated words each get
/// their own span.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut start = None;

        for (offset, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(begin)) => {
                    tokens.push(word_token(text, begin, offset, tokens.len()));
                    start = None;
                }
                (false, None) => start = Some(offset),
                _ => {}
            }
        }
        if let Some(begin) = start {
            tokens.push(word_token(text, begin, text.len(), tokens.len()));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

fn word_token(text: &str, start: usize, end: usize, position: usize) -> Token {
    let word = &text[start..end];
    Token::with_offsets(word, position, start, end).with_token_type(detect_token_type(word))
}

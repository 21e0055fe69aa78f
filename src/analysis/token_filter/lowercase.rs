//! Lowercase filter implementation.
//!
//! Concept labels are stored lower-cased, so label expansion runs after this
//! filter.

use crate::analysis::token::{TokenStream, TokenType};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts token text to lowercase.
///
/// URI tokens are left alone: concept URIs are matched byte for byte.
///
/// # Examples
///
/// ```
/// use sarissa_skos::analysis::token_filter::Filter;
/// use sarissa_skos::analysis::token_filter::lowercase::LowercaseFilter;
/// use sarissa_skos::analysis::token::Token;
///
/// let filter = LowercaseFilter::new();
/// let tokens = vec![Token::new("Military", 0), Token::new("EQUIPMENT", 1)];
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .collect();
///
/// assert_eq!(result[0].text, "military");
/// assert_eq!(result[1].text, "equipment");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            if token.token_type() != Some(TokenType::Uri) {
                token.text = token.text.to_lowercase();
            }
            token
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

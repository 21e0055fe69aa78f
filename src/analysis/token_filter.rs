//! Token filters transforming token streams.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes English stop words
//! - [`label_expansion::LabelExpansionFilter`] - Matches multi-word concept
//!   labels and stacks their expansions on the matched span
//! - [`uri_expansion::UriExpansionFilter`] - Treats tokens as concept URIs and
//!   stacks their labels on them
//! - [`skos::ExpansionFilter`] - Either expansion filter, picked by
//!   configuration
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Lowercase → Stop → Label Expansion → Index
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// Filters are pull-based: `filter` wraps the upstream stream and returns
/// immediately, work happens as the returned stream is consumed.
///
/// # Examples
///
/// ```
/// use sarissa_skos::analysis::token::{Token, TokenStream};
/// use sarissa_skos::analysis::token_filter::Filter;
/// use sarissa_skos::error::Result;
///
/// struct ReverseFilter;
///
/// impl Filter for ReverseFilter {
///     fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
///         Ok(Box::new(tokens.map(|mut t| {
///             t.text = t.text.chars().rev().collect();
///             t
///         })))
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
///
/// let tokens = vec![Token::new("arms", 0)];
/// let out: Vec<_> = ReverseFilter.filter(Box::new(tokens.into_iter())).unwrap().collect();
/// assert_eq!(out[0].text, "smra");
/// ```
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod label_expansion;
pub mod lowercase;
pub mod skos;
pub mod stop;
pub mod uri_expansion;

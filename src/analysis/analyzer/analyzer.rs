//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index / Query
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::analyzer::analyzer::Analyzer;
//! use sarissa_skos::analysis::token::TokenStream;
//! use sarissa_skos::error::Result;
//!
//! struct EmptyAnalyzer;
//!
//! impl Analyzer for EmptyAnalyzer {
//!     fn analyze(&self, _text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "empty"
//!     }
//! }
//!
//! assert_eq!(EmptyAnalyzer.analyze("arms").unwrap().count(), 0);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analyzers are shared between indexing and query threads, hence
/// `Send + Sync`.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

//! Token types flowing through the analysis pipeline.
//!
//! # Token Graphs
//!
//! Expansion terms are stacked on the token they expand through
//! `position_increment = 0`, the same way any synonym is:
//!
//! ```text
//! Input: "arms race"
//! Expansion of "arms": "weapons"
//!
//!   Position 0: "arms"    (pos_inc=1)
//!   Position 0: "weapons" (pos_inc=0, type=Synonym)
//!   Position 1: "race"    (pos_inc=1)
//! ```
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::token::{Token, TokenType};
//! use sarissa_skos::config::SkosType;
//!
//! let token = Token::with_offsets("arms", 0, 0, 4);
//! let synonym = token
//!     .with_text("weapons")
//!     .with_position_increment(0)
//!     .with_token_type(TokenType::Synonym)
//!     .with_skos_type(SkosType::Pref);
//!
//! assert!(synonym.is_synonym());
//! assert_eq!(synonym.skos_type(), Some(SkosType::Pref));
//! assert_eq!(synonym.start_offset, 0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SkosType;

/// A single unit of analyzed text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,

    /// Position in the token stream (0-based).
    pub position: usize,

    /// Byte offset where the token starts in the original text.
    pub start_offset: usize,

    /// Byte offset where the token ends in the original text.
    pub end_offset: usize,

    /// Position relative to the previous token (default: 1).
    ///
    /// - 1: next position
    /// - 0: same position as the previous token (stacked synonyms)
    pub position_increment: usize,

    /// How many positions this token spans (default: 1).
    pub position_length: usize,

    pub metadata: Option<TokenMetadata>,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Letters, possibly mixed with digits
    Word,
    /// Numeric values
    Num,
    /// An IRI or URL
    Uri,
    /// An injected expansion term
    Synonym,
    Other,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Word => "word",
            TokenType::Num => "num",
            TokenType::Uri => "uri",
            TokenType::Synonym => "synonym",
            TokenType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Additional metadata attached to tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub token_type: Option<TokenType>,

    /// The relation kind an expansion term was produced by.
    pub skos_type: Option<SkosType>,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token::with_offsets(text, position, 0, 0)
    }

    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            position_increment: 1,
            position_length: 1,
            metadata: None,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    pub fn with_position_length(mut self, length: usize) -> Self {
        self.position_length = length;
        self
    }

    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.metadata
            .get_or_insert_with(TokenMetadata::default)
            .token_type = Some(token_type);
        self
    }

    pub fn with_skos_type(mut self, kind: SkosType) -> Self {
        self.metadata
            .get_or_insert_with(TokenMetadata::default)
            .skos_type = Some(kind);
        self
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.metadata.as_ref().and_then(|m| m.token_type)
    }

    pub fn skos_type(&self) -> Option<SkosType> {
        self.metadata.as_ref().and_then(|m| m.skos_type)
    }

    pub fn is_synonym(&self) -> bool {
        self.token_type() == Some(TokenType::Synonym)
    }

    /// Build an expansion term stacked on this token.
    pub fn synonym<S: Into<String>>(&self, text: S, kind: SkosType) -> Self {
        let mut token = self.with_text(text).with_position_increment(0);
        token.position_length = 1;
        token
            .with_token_type(TokenType::Synonym)
            .with_skos_type(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}

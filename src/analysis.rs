//! Text analysis: tokenizers, token filters and the analyzers combining them.
//!
//! The SKOS expansion filters live in [`token_filter`]; [`analyzer::skos`]
//! wires them into ready-made analysis chains.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

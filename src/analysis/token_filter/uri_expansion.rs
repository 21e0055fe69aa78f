//! URI expansion filter.
//!
//! Every token is taken verbatim as a concept URI. The token itself is
//! always passed through; the expansion terms of each configured relation
//! kind follow it at the same position.

use std::sync::Arc;

use tracing::warn;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::config::SkosType;
use crate::engine::ConceptQueryEngine;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct UriExpansionFilter {
    engine: Arc<ConceptQueryEngine>,
    kinds: Vec<SkosType>,
}

impl UriExpansionFilter {
    pub fn new(engine: Arc<ConceptQueryEngine>, kinds: Vec<SkosType>) -> Self {
        UriExpansionFilter { engine, kinds }
    }

    pub fn kinds(&self) -> &[SkosType] {
        &self.kinds
    }

    /// The token followed by its expansion terms.
    pub fn expand(&self, token: Token) -> Vec<Token> {
        let mut tokens = Vec::new();
        for kind in &self.kinds {
            match self.engine.expansions(&token.text, *kind) {
                Ok(terms) => {
                    tokens.extend(terms.into_iter().map(|term| token.synonym(term, *kind)))
                }
                Err(e) => warn!(uri = %token.text, kind = %kind, error = %e, "expansion lookup failed"),
            }
        }
        tokens.insert(0, token);
        tokens
    }
}

impl Filter for UriExpansionFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filter = self.clone();
        Ok(Box::new(tokens.flat_map(move |token| filter.expand(token))))
    }

    fn name(&self) -> &'static str {
        "skos_uri_expansion"
    }
}

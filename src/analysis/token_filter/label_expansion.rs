//! Label expansion filter.
//!
//! Treats the token stream as free text. Up to `buffer_size` tokens are
//! buffered in a window; the longest buffered prefix whose space-joined text
//! is a concept label wins, and the expansion terms of the matched concepts
//! are stacked on the last token of that span:
//!
//! ```text
//! window:  [military] [equipment] [for] [sale]     buffer_size = 4
//! tries:   "military equipment for sale"  miss
//!          "military equipment for"       miss
//!          "military equipment"           hit
//! emits:   military, equipment, <materiel @ equipment>, ...
//! ```
//!
//! A window with no matching prefix releases its first token unchanged and
//! slides by one. Lookup failures count as misses; they never end the
//! stream.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::config::SkosType;
use crate::engine::ConceptQueryEngine;
use crate::error::{Result, SkosError};

/// Expands multi-word concept labels found in free text.
#[derive(Clone, Debug)]
pub struct LabelExpansionFilter {
    engine: Arc<ConceptQueryEngine>,
    kinds: Vec<SkosType>,
    buffer_size: usize,
}

impl LabelExpansionFilter {
    pub fn new(
        engine: Arc<ConceptQueryEngine>,
        kinds: Vec<SkosType>,
        buffer_size: usize,
    ) -> Result<Self> {
        if buffer_size < 1 {
            return Err(SkosError::configuration(
                "'bufferSize' must be a positive (small) integer",
            ));
        }
        Ok(LabelExpansionFilter {
            engine,
            kinds,
            buffer_size,
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn kinds(&self) -> &[SkosType] {
        &self.kinds
    }

    /// Wrap an upstream stream without boxing it.
    pub fn stream(&self, upstream: TokenStream) -> LabelExpansionStream {
        LabelExpansionStream {
            upstream,
            upstream_done: false,
            engine: Arc::clone(&self.engine),
            kinds: self.kinds.clone(),
            buffer_size: self.buffer_size,
            window: VecDeque::new(),
            pending: VecDeque::new(),
            state: State::Filling,
        }
    }
}

impl Filter for LabelExpansionFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(self.stream(tokens)))
    }

    fn name(&self) -> &'static str {
        "skos_label_expansion"
    }
}

/// Where a [`LabelExpansionStream`] is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Pulling upstream tokens until the window is full.
    Filling,
    /// Looking up the window prefixes.
    Matching,
    /// Releasing tokens produced by the last match step.
    Emitting,
    /// Upstream is exhausted; matching what is left in the window.
    Draining,
    Exhausted,
}

/// The pull-based state machine behind [`LabelExpansionFilter`].
pub struct LabelExpansionStream {
    upstream: TokenStream,
    upstream_done: bool,
    engine: Arc<ConceptQueryEngine>,
    kinds: Vec<SkosType>,
    buffer_size: usize,
    window: VecDeque<Token>,
    pending: VecDeque<Token>,
    state: State,
}

impl LabelExpansionStream {
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of tokens currently waiting in the window.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    fn fill(&mut self) {
        while !self.upstream_done && self.window.len() < self.buffer_size {
            match self.upstream.next() {
                Some(token) => self.window.push_back(token),
                None => self.upstream_done = true,
            }
        }
    }

    /// One match step: consume the longest matching prefix, or release the
    /// first token unchanged.
    fn match_window(&mut self) {
        for len in (1..=self.window.len()).rev() {
            let label = self
                .window
                .iter()
                .take(len)
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            let concepts = match self.engine.find_concepts(&label) {
                Ok(concepts) => concepts,
                Err(e) => {
                    warn!(label = %label, error = %e, "label lookup failed");
                    continue;
                }
            };
            if concepts.is_empty() {
                continue;
            }

            debug!(label = %label, concepts = concepts.len(), "matched concept label");
            self.pending.extend(self.window.drain(..len));
            if let Some(last) = self.pending.back().cloned() {
                self.push_synonyms(&last, &concepts);
            }
            return;
        }

        if let Some(token) = self.window.pop_front() {
            self.pending.push_back(token);
        }
    }

    fn push_synonyms(&mut self, last: &Token, concepts: &[String]) {
        for uri in concepts {
            for kind in &self.kinds {
                match self.engine.expansions(uri, *kind) {
                    Ok(terms) => self
                        .pending
                        .extend(terms.into_iter().map(|term| last.synonym(term, *kind))),
                    Err(e) => warn!(uri = %uri, kind = %kind, error = %e, "expansion lookup failed"),
                }
            }
        }
    }
}

impl Iterator for LabelExpansionStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            match self.state {
                State::Emitting => {
                    if let Some(token) = self.pending.pop_front() {
                        return Some(token);
                    }
                    self.state = if self.upstream_done {
                        State::Draining
                    } else {
                        State::Filling
                    };
                }
                State::Filling => {
                    self.fill();
                    self.state = if self.window.is_empty() {
                        State::Exhausted
                    } else {
                        State::Matching
                    };
                }
                State::Matching => {
                    self.match_window();
                    self.state = State::Emitting;
                }
                State::Draining => {
                    self.state = if self.window.is_empty() {
                        State::Exhausted
                    } else {
                        State::Matching
                    };
                }
                State::Exhausted => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{IntoTokenStream, TokenType};
    use crate::analysis::tokenizer::Tokenizer;
    use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
    use crate::engine::testing;

    fn expand(text: &str, kinds: &[SkosType], buffer_size: usize) -> Vec<Token> {
        let filter =
            LabelExpansionFilter::new(Arc::new(testing::engine()), kinds.to_vec(), buffer_size)
                .unwrap();
        let tokens = WhitespaceTokenizer::new().tokenize(text).unwrap();
        filter.filter(tokens).unwrap().collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_single_token_label() {
        let tokens = expand("weapons race", &[SkosType::Alt], 4);

        assert_eq!(texts(&tokens), vec!["weapons", "arms", "waffen", "race"]);
        let arms = &tokens[1];
        assert_eq!(arms.position, 0);
        assert_eq!(arms.position_increment, 0);
        assert_eq!(arms.token_type(), Some(TokenType::Synonym));
        assert_eq!(arms.skos_type(), Some(SkosType::Alt));
        assert_eq!(tokens[3].position, 1);
        assert_eq!(tokens[3].position_increment, 1);
    }

    #[test]
    fn test_longest_match_wins_and_stacks_on_last_token() {
        let tokens = expand("old military equipment", &[SkosType::Alt], 4);

        assert_eq!(texts(&tokens), vec!["old", "military", "equipment", "materiel"]);
        assert_eq!(tokens[3].position, 2);
        assert_eq!(tokens[3].start_offset, tokens[2].start_offset);
    }

    #[test]
    fn test_relation_kinds_in_configured_order() {
        let tokens = expand("weapons", &[SkosType::Broader, SkosType::Pref], 4);
        assert_eq!(
            texts(&tokens),
            vec!["weapons", "military equipment", "materiel", "weapons"]
        );
        assert_eq!(tokens[1].skos_type(), Some(SkosType::Broader));
        assert_eq!(tokens[3].skos_type(), Some(SkosType::Pref));
    }

    #[test]
    fn test_label_of_exactly_buffer_size_matches() {
        let tokens = expand("main battle tank", &[SkosType::Alt], 3);
        assert_eq!(texts(&tokens), vec!["main", "battle", "tank", "mbt"]);
    }

    #[test]
    fn test_label_longer_than_buffer_does_not_match() {
        let tokens = expand("main battle tank", &[SkosType::Alt], 2);
        assert_eq!(texts(&tokens), vec!["main", "battle", "tank"]);
        assert!(tokens.iter().all(|t| !t.is_synonym()));
    }

    #[test]
    fn test_remaining_buffer_is_matched_on_exhaustion() {
        // the match sits in the last, partially filled window
        let tokens = expand("a b c d e arms", &[SkosType::Pref], 4);
        assert_eq!(
            texts(&tokens),
            vec!["a", "b", "c", "d", "e", "arms", "weapons", "firearms"]
        );
    }

    #[test]
    fn test_hidden_label_matches() {
        let tokens = expand("ARMS", &[SkosType::Alt], 4);
        // "ARMS" is found case-insensitively; upstream text is kept as is
        assert_eq!(texts(&tokens), vec!["ARMS", "arms", "waffen", "guns"]);
    }

    #[test]
    fn test_no_kinds_emits_originals_only() {
        let tokens = expand("weapons", &[], 4);
        assert_eq!(texts(&tokens), vec!["weapons"]);
    }

    #[test]
    fn test_state_machine_walk() {
        let filter =
            LabelExpansionFilter::new(Arc::new(testing::engine()), vec![SkosType::Alt], 2)
                .unwrap();
        let upstream = vec![Token::new("x", 0), Token::new("weapons", 1)].into_token_stream();
        let mut stream = filter.stream(upstream);

        assert_eq!(stream.state(), State::Filling);
        assert_eq!(stream.next().unwrap().text, "x");
        assert_eq!(stream.state(), State::Emitting);
        assert_eq!(stream.buffered(), 1);

        assert_eq!(stream.next().unwrap().text, "weapons");
        assert_eq!(stream.next().unwrap().text, "arms");
        assert_eq!(stream.next().unwrap().text, "waffen");
        assert!(stream.next().is_none());
        assert_eq!(stream.state(), State::Exhausted);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_lookup_failures_degrade_to_no_match() {
        use crate::engine::StoreIdentity;
        use crate::store::memory::MemoryConceptStore;

        let engine = ConceptQueryEngine::new(
            Arc::new(MemoryConceptStore::new()),
            StoreIdentity::new("missing", None),
        );
        let filter = LabelExpansionFilter::new(Arc::new(engine), SkosType::ALL.to_vec(), 4).unwrap();
        let tokens: Vec<_> = filter
            .filter(vec![Token::new("weapons", 0), Token::new("race", 1)].into_token_stream())
            .unwrap()
            .collect();
        assert_eq!(texts(&tokens), vec!["weapons", "race"]);
    }

    #[test]
    fn test_huge_buffer_grows_with_input() {
        let tokens = expand("weapons race", &[SkosType::Alt], usize::MAX);
        assert_eq!(texts(&tokens), vec!["weapons", "arms", "waffen", "race"]);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err =
            LabelExpansionFilter::new(Arc::new(testing::engine()), vec![], 0).unwrap_err();
        assert!(matches!(err, SkosError::Configuration(_)));
    }
}

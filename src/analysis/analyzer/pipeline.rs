//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! Filters are applied in the order they were added.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::analyzer::analyzer::Analyzer;
//! use sarissa_skos::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use sarissa_skos::analysis::token_filter::lowercase::LowercaseFilter;
//! use sarissa_skos::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//!
//! let tokens: Vec<_> = analyzer.analyze("Military Equipment").unwrap().collect();
//! assert_eq!(tokens[0].text, "military");
//! assert_eq!(tokens[1].text, "equipment");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the end of the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|filter| filter.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

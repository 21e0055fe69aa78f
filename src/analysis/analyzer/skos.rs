//! Analyzer with SKOS expansion.
//!
//! - LABEL: unicode words, lowercased, English stop words removed, then
//!   label expansion
//! - URI: the whole trimmed input as one URI token, then URI expansion

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::skos::{ExpansionFilter, SkosFilterFactory};
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::keyword::KeywordTokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::config::{ExpansionConfig, ExpansionType};
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct SkosAnalyzer {
    expansion_type: ExpansionType,
    pipeline: PipelineAnalyzer,
}

impl SkosAnalyzer {
    /// Wrap an already created expansion filter.
    pub fn new(filter: ExpansionFilter) -> Self {
        let expansion_type = filter.expansion_type();
        let pipeline = match expansion_type {
            ExpansionType::Label => PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
                .add_filter(Arc::new(LowercaseFilter::new()))
                .add_filter(Arc::new(StopFilter::new())),
            ExpansionType::Uri => PipelineAnalyzer::new(Arc::new(KeywordTokenizer::new())),
        }
        .add_filter(Arc::new(filter));

        SkosAnalyzer {
            expansion_type,
            pipeline,
        }
    }

    /// Create the expansion filter through `factory` and wrap it.
    pub fn from_config(factory: &SkosFilterFactory, config: &ExpansionConfig) -> Result<Self> {
        Ok(SkosAnalyzer::new(factory.create(config)?))
    }

    pub fn expansion_type(&self) -> ExpansionType {
        self.expansion_type
    }

    pub fn pipeline(&self) -> &PipelineAnalyzer {
        &self.pipeline
    }
}

impl Analyzer for SkosAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        match self.expansion_type {
            ExpansionType::Label => "skos_label",
            ExpansionType::Uri => "skos_uri",
        }
    }
}

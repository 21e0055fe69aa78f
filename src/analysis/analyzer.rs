//! Analyzers combining a tokenizer with token filters.
//!
//! - [`analyzer::Analyzer`] - the analyzer trait
//! - [`pipeline::PipelineAnalyzer`] - tokenizer + filter chain
//! - [`skos::SkosAnalyzer`] - the pipeline matching an expansion type

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod pipeline;
pub mod skos;

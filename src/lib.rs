//! # Sarissa SKOS
//!
//! SKOS-based term expansion for the Sarissa text analysis pipeline.
//!
//! A SKOS vocabulary is loaded into an in-memory [`graph::Graph`], concept
//! types are completed, and every concept is written to a searchable
//! [`store::ConceptStore`]. Two token filters then expand token streams
//! with related terms:
//!
//! - label expansion matches runs of tokens against concept labels and
//!   stacks the related labels on the matched span
//! - URI expansion treats each token as a concept URI
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::analyzer::analyzer::Analyzer;
//! use sarissa_skos::analysis::analyzer::skos::SkosAnalyzer;
//! use sarissa_skos::analysis::token_filter::skos::SkosFilterFactory;
//! use sarissa_skos::config::{ExpansionConfig, ExpansionType, SkosType};
//! use sarissa_skos::engine::EngineRegistry;
//! use sarissa_skos::store::file::FileConceptStore;
//!
//! let store = FileConceptStore::open("skos-stores").unwrap();
//! let factory = SkosFilterFactory::new(Arc::new(store), Arc::new(EngineRegistry::new()));
//!
//! let config = ExpansionConfig::new("vocab/ukat.n3", ExpansionType::Label)
//!     .with_skos_types(vec![SkosType::Alt, SkosType::Broader]);
//! let analyzer = SkosAnalyzer::from_config(&factory, &config).unwrap();
//!
//! for token in analyzer.analyze("weapons of the world").unwrap() {
//!     println!("{} @ {}", token.text, token.position);
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod store;

pub mod prelude {
    pub use crate::analysis::analyzer::analyzer::Analyzer;
    pub use crate::analysis::analyzer::skos::SkosAnalyzer;
    pub use crate::analysis::token::{Token, TokenStream, TokenType};
    pub use crate::analysis::token_filter::Filter;
    pub use crate::analysis::token_filter::skos::{ExpansionFilter, SkosFilterFactory};
    pub use crate::config::{ExpansionConfig, ExpansionType, SkosType};
    pub use crate::engine::{ConceptQueryEngine, EngineRegistry};
    pub use crate::error::{Result, SkosError};
    pub use crate::store::ConceptStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

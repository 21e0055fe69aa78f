//! Configuration-driven expansion filters.
//!
//! [`SkosFilterFactory`] turns an [`ExpansionConfig`] into a ready-to-use
//! [`ExpansionFilter`]. The first filter created for a store identity loads
//! the vocabulary, completes concept types and builds the concept store;
//! every later filter with the same identity reuses the engine held by the
//! [`EngineRegistry`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::token::Token;
//! use sarissa_skos::analysis::token_filter::Filter;
//! use sarissa_skos::analysis::token_filter::skos::SkosFilterFactory;
//! use sarissa_skos::config::{ExpansionConfig, ExpansionType, SkosType};
//! use sarissa_skos::engine::EngineRegistry;
//! use sarissa_skos::store::memory::MemoryConceptStore;
//!
//! let factory = SkosFilterFactory::new(
//!     Arc::new(MemoryConceptStore::new()),
//!     Arc::new(EngineRegistry::new()),
//! );
//! let config = ExpansionConfig::new("vocab/ukat.n3", ExpansionType::Label)
//!     .with_skos_types(vec![SkosType::Alt, SkosType::Broader]);
//!
//! let filter = factory.create(&config).unwrap();
//! let tokens = vec![Token::new("weapons", 0)];
//! let expanded: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::label_expansion::LabelExpansionFilter;
use crate::analysis::token_filter::uri_expansion::UriExpansionFilter;
use crate::config::{ExpansionConfig, ExpansionType};
use crate::engine::builder::{DEFAULT_BATCH_SIZE, DEFAULT_READY_TIMEOUT};
use crate::engine::{ConceptQueryEngine, ConceptStoreBuilder, EngineRegistry};
use crate::error::Result;
use crate::graph::entailment;
use crate::graph::loader::{self, VocabularySource};
use crate::store::ConceptStore;

/// One of the two expansion filters, selected by `expansionType`.
#[derive(Clone, Debug)]
pub enum ExpansionFilter {
    Label(LabelExpansionFilter),
    Uri(UriExpansionFilter),
}

impl ExpansionFilter {
    /// Build the filter variant `config` asks for on top of `engine`.
    pub fn new(engine: Arc<ConceptQueryEngine>, config: &ExpansionConfig) -> Result<Self> {
        let kinds = config.effective_skos_types();
        Ok(match config.expansion_type {
            ExpansionType::Label => ExpansionFilter::Label(LabelExpansionFilter::new(
                engine,
                kinds,
                config.buffer_size,
            )?),
            ExpansionType::Uri => ExpansionFilter::Uri(UriExpansionFilter::new(engine, kinds)),
        })
    }

    pub fn expansion_type(&self) -> ExpansionType {
        match self {
            ExpansionFilter::Label(_) => ExpansionType::Label,
            ExpansionFilter::Uri(_) => ExpansionType::Uri,
        }
    }
}

impl Filter for ExpansionFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        match self {
            ExpansionFilter::Label(filter) => filter.filter(tokens),
            ExpansionFilter::Uri(filter) => filter.filter(tokens),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExpansionFilter::Label(filter) => filter.name(),
            ExpansionFilter::Uri(filter) => filter.name(),
        }
    }
}

/// Creates expansion filters, building concept stores on demand.
#[derive(Clone, Debug)]
pub struct SkosFilterFactory {
    store: Arc<dyn ConceptStore>,
    registry: Arc<EngineRegistry>,
    batch_size: usize,
    ready_timeout: Duration,
}

impl SkosFilterFactory {
    pub fn new(store: Arc<dyn ConceptStore>, registry: Arc<EngineRegistry>) -> Self {
        SkosFilterFactory {
            store,
            registry,
            batch_size: DEFAULT_BATCH_SIZE,
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    /// The engine for `config`'s store identity, building the store first
    /// when this process has not seen the identity yet.
    pub fn engine(&self, config: &ExpansionConfig) -> Result<Arc<ConceptQueryEngine>> {
        config.validate()?;
        let builder = ConceptStoreBuilder::new(
            Arc::clone(&self.store),
            &config.index_name,
            config.languages.as_ref(),
        )
        .with_batch_size(self.batch_size)
        .with_ready_timeout(self.ready_timeout);
        let identity = builder.identity().clone();

        self.registry.get_or_try_insert_with(&identity, || {
            builder.wait_until_ready()?;
            if self.store.exists(identity.as_str())? {
                info!(store = identity.as_str(), "reusing existing concept store");
                return Ok(ConceptQueryEngine::new(
                    Arc::clone(&self.store),
                    identity.clone(),
                ));
            }

            let mut graph = loader::load(&VocabularySource::locator(config.skos_file.as_str()))?;
            entailment::complete_concept_types(&mut graph);
            let report = builder.build(&graph)?;
            info!(
                store = identity.as_str(),
                vocabulary = %config.skos_file,
                created = report.created,
                concepts = report.concepts,
                "concept engine ready"
            );
            Ok(ConceptQueryEngine::new(
                Arc::clone(&self.store),
                identity.clone(),
            ))
        })
    }

    pub fn create(&self, config: &ExpansionConfig) -> Result<ExpansionFilter> {
        let engine = self.engine(config)?;
        ExpansionFilter::new(engine, config)
    }

    /// Create a filter from flat host settings.
    pub fn create_from_settings(&self, settings: &HashMap<String, String>) -> Result<ExpansionFilter> {
        self.create(&ExpansionConfig::from_settings(settings)?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::analysis::token::{IntoTokenStream, Token};
    use crate::config::SkosType;
    use crate::error::SkosError;
    use crate::store::memory::MemoryConceptStore;
    use crate::store::{
        BulkResponse, ConceptRecord, CreateOutcome, Readiness, SearchHits, StoreQuery,
    };

    const VOCABULARY: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://example.org/> .

ex:weapons skos:prefLabel "Weapons"@en ;
    skos:altLabel "Arms"@en ;
    skos:broader ex:equipment .
ex:equipment skos:prefLabel "Military equipment"@en .
"#;

    fn vocabulary(dir: &TempDir) -> String {
        let path = dir.path().join("weapons.ttl");
        fs::write(&path, VOCABULARY).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn factory() -> SkosFilterFactory {
        SkosFilterFactory::new(
            Arc::new(MemoryConceptStore::new()),
            Arc::new(EngineRegistry::new()),
        )
    }

    #[test]
    fn test_label_filter_from_config() {
        let dir = TempDir::new().unwrap();
        let config = ExpansionConfig::new(vocabulary(&dir), ExpansionType::Label)
            .with_skos_types(vec![SkosType::Alt, SkosType::Broader]);

        let filter = factory().create(&config).unwrap();
        assert_eq!(filter.expansion_type(), ExpansionType::Label);
        assert_eq!(filter.name(), "skos_label_expansion");

        let texts: Vec<String> = filter
            .filter(vec![Token::new("weapons", 0)].into_token_stream())
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["weapons", "arms", "military equipment"]);
    }

    #[test]
    fn test_uri_filter_from_settings() {
        let dir = TempDir::new().unwrap();
        let settings: HashMap<String, String> = [
            ("skosFile", vocabulary(&dir)),
            ("expansionType", "URI".to_string()),
            ("skosType", "PREF".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let filter = factory().create_from_settings(&settings).unwrap();
        assert_eq!(filter.name(), "skos_uri_expansion");

        let texts: Vec<String> = filter
            .filter(vec![Token::new("http://example.org/weapons", 0)].into_token_stream())
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["http://example.org/weapons", "weapons"]);
    }

    #[test]
    fn test_engine_shared_per_identity() {
        let dir = TempDir::new().unwrap();
        let factory = factory();
        let label = ExpansionConfig::new(vocabulary(&dir), ExpansionType::Label);
        let uri = ExpansionConfig::new(vocabulary(&dir), ExpansionType::Uri);
        let english = label.clone().with_languages(["en"]);

        let a = factory.engine(&label).unwrap();
        let b = factory.engine(&uri).unwrap();
        let c = factory.engine(&english).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.identity().as_str(), "skos-en");
        assert_eq!(factory.registry().len(), 2);
    }

    #[test]
    fn test_setup_errors_are_fatal() {
        let factory = factory();

        let missing = ExpansionConfig::new("/nonexistent/vocab.ttl", ExpansionType::Label);
        let err = factory.create(&missing).unwrap_err();
        assert!(matches!(err, SkosError::Load { .. }), "{err}");
        assert!(factory.registry().is_empty());

        let unsupported = ExpansionConfig::new("vocab.jsonld", ExpansionType::Label);
        assert!(matches!(
            factory.create(&unsupported).unwrap_err(),
            SkosError::Format(_)
        ));
    }

    #[test]
    fn test_cached_engine_ignores_vocabulary_changes() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryConceptStore::new());
        let factory = SkosFilterFactory::new(store.clone(), Arc::new(EngineRegistry::new()));
        let config = ExpansionConfig::new(vocabulary(&dir), ExpansionType::Uri);

        let first = factory.engine(&config).unwrap();
        fs::write(
            &config.skos_file,
            r#"<http://example.org/weapons> <http://www.w3.org/2004/02/skos/core#altLabel> "Guns" ."#,
        )
        .unwrap();

        let second = factory.engine(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            second.alt_labels("http://example.org/weapons").unwrap(),
            vec!["arms"]
        );

        // a new process-level registry still finds the built store
        let fresh = SkosFilterFactory::new(store, Arc::new(EngineRegistry::new()));
        assert_eq!(
            fresh
                .engine(&config)
                .unwrap()
                .alt_labels("http://example.org/weapons")
                .unwrap(),
            vec!["arms"]
        );
    }

    /// A backend whose stores exist but which never reports ready.
    #[derive(Debug, Default)]
    struct Starting {
        inner: MemoryConceptStore,
    }

    impl ConceptStore for Starting {
        fn wait_until_ready(&self, _timeout: Duration) -> Result<Readiness> {
            Ok(Readiness::TimedOut {
                status: "initializing".to_string(),
            })
        }
        fn exists(&self, name: &str) -> Result<bool> {
            self.inner.exists(name)
        }
        fn create(&self, name: &str) -> Result<CreateOutcome> {
            self.inner.create(name)
        }
        fn bulk(&self, name: &str, records: Vec<ConceptRecord>) -> Result<BulkResponse> {
            self.inner.bulk(name, records)
        }
        fn refresh(&self, name: &str) -> Result<()> {
            self.inner.refresh(name)
        }
        fn search(&self, name: &str, query: &StoreQuery, size: usize) -> Result<SearchHits> {
            self.inner.search(name, query, size)
        }
        fn count(&self, name: &str) -> Result<usize> {
            self.inner.count(name)
        }
        fn delete(&self, name: &str) -> Result<()> {
            self.inner.delete(name)
        }
    }

    #[test]
    fn test_existing_store_still_waits_for_readiness() {
        let store = Starting::default();
        store.create("skos").unwrap();
        store.refresh("skos").unwrap();

        let factory = SkosFilterFactory::new(Arc::new(store), Arc::new(EngineRegistry::new()))
            .with_ready_timeout(Duration::from_millis(1));
        let config = ExpansionConfig::new("/nonexistent/vocab.ttl", ExpansionType::Label);

        let err = factory.engine(&config).unwrap_err();
        assert!(matches!(err, SkosError::Build(_)), "{err}");
        assert!(factory.registry().is_empty());
    }
}

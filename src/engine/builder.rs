//! Concept store builder.
//!
//! Turns a type-completed [`Graph`] into one [`ConceptRecord`] per concept
//! and bulk indexes them into a named store. The store is created at most
//! once per identity: when it already exists the build is a no-op.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SkosError};
use crate::graph::entailment;
use crate::graph::vocab;
use crate::graph::{Graph, Node};
use crate::store::{ConceptField, ConceptRecord, ConceptStore, CreateOutcome, Readiness};

/// Records per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// How long to wait for the store to accept writes.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(15);

/// Store name derived from an index name and a language set.
///
/// `"skos"` with languages `{en, de}` becomes `"skos-de-en"`; tags are
/// lower-cased and joined in sorted order, so equal configurations always
/// resolve to the same store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StoreIdentity(String);

impl StoreIdentity {
    pub fn new(base: &str, languages: Option<&BTreeSet<String>>) -> Self {
        let mut name = base.to_string();
        for language in normalize_languages(languages).iter().flatten() {
            name.push('-');
            name.push_str(language);
        }
        StoreIdentity(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_languages(languages: Option<&BTreeSet<String>>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = languages?
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Summary of one [`ConceptStoreBuilder::build`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub store: String,
    /// `false` when the store already existed and nothing was indexed.
    pub created: bool,
    pub concepts: usize,
    pub batches: usize,
    /// Relation values dropped because they were not named resources.
    pub skipped_relations: usize,
    /// Concepts dropped because they were blank nodes.
    pub skipped_concepts: usize,
}

/// Builds a concept store from a graph.
#[derive(Debug)]
pub struct ConceptStoreBuilder {
    store: Arc<dyn ConceptStore>,
    identity: StoreIdentity,
    languages: Option<BTreeSet<String>>,
    batch_size: usize,
    ready_timeout: Duration,
}

impl ConceptStoreBuilder {
    pub fn new(
        store: Arc<dyn ConceptStore>,
        index_name: &str,
        languages: Option<&BTreeSet<String>>,
    ) -> Self {
        ConceptStoreBuilder {
            store,
            identity: StoreIdentity::new(index_name, languages),
            languages: normalize_languages(languages),
            batch_size: DEFAULT_BATCH_SIZE,
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn identity(&self) -> &StoreIdentity {
        &self.identity
    }

    /// Block until the backend accepts requests. A timeout is a build error.
    pub fn wait_until_ready(&self) -> Result<()> {
        match self
            .store
            .wait_until_ready(self.ready_timeout)
            .map_err(|e| SkosError::build(format!("concept store unavailable: {e}")))?
        {
            Readiness::Ready => Ok(()),
            Readiness::TimedOut { status } => Err(SkosError::build(format!(
                "concept store not ready after {:?}: {status}",
                self.ready_timeout
            ))),
        }
    }

    /// Index every concept of `graph`, unless the store already exists.
    ///
    /// On failure the partially built store is deleted so a later attempt
    /// starts from scratch.
    pub fn build(&self, graph: &Graph) -> Result<BuildReport> {
        let name = self.identity.as_str();
        let mut report = BuildReport {
            store: name.to_string(),
            ..Default::default()
        };

        self.wait_until_ready()?;

        let outcome = self
            .store
            .create(name)
            .map_err(|e| SkosError::build(format!("can't create store '{name}': {e}")))?;
        if outcome == CreateOutcome::AlreadyExists {
            info!(store = name, "concept store already exists, reusing it");
            return Ok(report);
        }
        report.created = true;

        if let Err(e) = self.index_concepts(graph, &mut report) {
            if let Err(cleanup) = self.store.delete(name) {
                warn!(store = name, error = %cleanup, "failed to delete partial concept store");
            }
            return Err(e);
        }

        info!(
            store = name,
            concepts = report.concepts,
            batches = report.batches,
            "built concept store"
        );
        Ok(report)
    }

    fn index_concepts(&self, graph: &Graph, report: &mut BuildReport) -> Result<()> {
        let name = self.identity.as_str();
        let mut batch = Vec::with_capacity(self.batch_size);

        for concept in entailment::concepts(graph) {
            let Some(record) = self.concept_record(graph, &concept, report) else {
                continue;
            };
            batch.push(record);
            report.concepts += 1;
            if batch.len() >= self.batch_size {
                self.flush(&mut batch, report)?;
            }
        }
        if !batch.is_empty() {
            self.flush(&mut batch, report)?;
        }

        self.store
            .refresh(name)
            .map_err(|e| SkosError::build(format!("can't commit store '{name}': {e}")))
    }

    fn flush(&self, batch: &mut Vec<ConceptRecord>, report: &mut BuildReport) -> Result<()> {
        let name = self.identity.as_str();
        let records = std::mem::take(batch);
        let size = records.len();

        let response = self
            .store
            .bulk(name, records)
            .map_err(|e| SkosError::build(format!("can't index SKOS: {e}")))?;
        if response.has_failures() {
            return Err(SkosError::build(format!(
                "can't index SKOS: {}",
                response.failure_message()
            )));
        }
        report.batches += 1;
        debug!(store = name, records = size, "indexed batch");
        Ok(())
    }

    /// The stored form of one concept. `None` for blank nodes.
    pub fn concept_record(
        &self,
        graph: &Graph,
        concept: &Node,
        report: &mut BuildReport,
    ) -> Option<ConceptRecord> {
        let Some(uri) = concept.as_iri() else {
            warn!(concept = %concept, "skipping concept without a URI");
            report.skipped_concepts += 1;
            return None;
        };
        let mut record = ConceptRecord::new(uri);

        for (field, property) in [
            (ConceptField::Pref, vocab::SKOS_PREF_LABEL),
            (ConceptField::Alt, vocab::SKOS_ALT_LABEL),
            (ConceptField::Hidden, vocab::SKOS_HIDDEN_LABEL),
        ] {
            let labels = self.labels(graph, concept, property);
            if let Some(values) = record.values_mut(field) {
                *values = labels;
            }
        }

        for (field, property) in [
            (ConceptField::Broader, vocab::SKOS_BROADER),
            (ConceptField::Narrower, vocab::SKOS_NARROWER),
            (ConceptField::BroaderTransitive, vocab::SKOS_BROADER_TRANSITIVE),
            (ConceptField::NarrowerTransitive, vocab::SKOS_NARROWER_TRANSITIVE),
            (ConceptField::Related, vocab::SKOS_RELATED),
        ] {
            let targets = relations(graph, concept, property, report);
            if let Some(values) = record.values_mut(field) {
                *values = targets;
            }
        }

        Some(record)
    }

    /// Lower-cased labels of `concept`, restricted to the language set.
    fn labels(&self, graph: &Graph, concept: &Node, property: &str) -> Vec<String> {
        let mut labels = Vec::new();
        for value in graph.values(concept, property) {
            let Some(literal) = value.as_literal() else {
                warn!(concept = %concept, value = %value, "skipping non-literal label");
                continue;
            };
            if let Some(languages) = &self.languages {
                let tag = literal.language.as_deref().unwrap_or("").to_lowercase();
                if !languages.contains(&tag) {
                    continue;
                }
            }
            labels.push(literal.lexical.to_lowercase());
        }
        labels
    }
}

fn relations(graph: &Graph, concept: &Node, property: &str, report: &mut BuildReport) -> Vec<String> {
    let mut targets = Vec::new();
    for value in graph.values(concept, property) {
        match value.as_iri() {
            Some(iri) => targets.push(iri.to_string()),
            None => {
                warn!(
                    concept = %concept,
                    value = %value,
                    "error when indexing relationship of concept"
                );
                report.skipped_relations += 1;
            }
        }
    }
    targets
}

//! Concept query engine.
//!
//! Answers the lookups the expansion filters need against a built concept
//! store: "which concepts carry this label", "what are the values of field F
//! of concept U", and "what are the labels of the concepts U points to".
//!
//! Unknown concepts are not errors. A URI that resolves to zero (or, for a
//! corrupted store, several) records is logged and yields no values.

pub mod builder;
pub mod registry;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SkosType;
use crate::error::Result;
use crate::store::{ConceptField, ConceptStore, StoreQuery};

pub use self::builder::{BuildReport, ConceptStoreBuilder, StoreIdentity};
pub use self::registry::EngineRegistry;

/// Maximum number of concepts a label lookup returns.
pub const MAX_CONCEPT_HITS: usize = 100;

/// Read-only view over one built concept store.
#[derive(Clone, Debug)]
pub struct ConceptQueryEngine {
    store: Arc<dyn ConceptStore>,
    identity: StoreIdentity,
}

impl ConceptQueryEngine {
    pub fn new(store: Arc<dyn ConceptStore>, identity: StoreIdentity) -> Self {
        ConceptQueryEngine { store, identity }
    }

    pub fn identity(&self) -> &StoreIdentity {
        &self.identity
    }

    /// URIs of the concepts having `label` as a pref, alt or hidden label.
    /// The label is lower-cased before matching; at most
    /// [`MAX_CONCEPT_HITS`] URIs are returned.
    pub fn find_concepts(&self, label: &str) -> Result<Vec<String>> {
        let label = label.to_lowercase();
        let query = StoreQuery::DisMax(
            ConceptField::LABELS
                .iter()
                .map(|field| StoreQuery::term(*field, label.as_str()))
                .collect(),
        );
        let hits = self
            .store
            .search(self.identity.as_str(), &query, MAX_CONCEPT_HITS)?;
        Ok(hits.records.into_iter().map(|record| record.uri).collect())
    }

    /// Values of `field` on the concept identified by `uri`.
    pub fn field_values(&self, uri: &str, field: ConceptField) -> Result<Vec<String>> {
        let query = StoreQuery::term(ConceptField::Uri, uri);
        let hits = self.store.search(self.identity.as_str(), &query, 1)?;
        if hits.total != 1 {
            warn!(
                store = self.identity.as_str(),
                uri,
                matches = hits.total,
                "unknown concept"
            );
            return Ok(Vec::new());
        }
        Ok(hits
            .records
            .into_iter()
            .next()
            .map(|record| record.values(field).to_vec())
            .unwrap_or_default())
    }

    /// Pref and alt labels of every concept linked to `uri` through the
    /// relation `field`, in relation order.
    pub fn labels_via_relation(&self, uri: &str, field: ConceptField) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for target in self.field_values(uri, field)? {
            labels.extend(self.pref_labels(&target)?);
            labels.extend(self.alt_labels(&target)?);
        }
        Ok(labels)
    }

    /// Alt labels of every concept carrying `label`. Lookup failures are
    /// logged and contribute nothing.
    pub fn alt_terms_for_label(&self, label: &str) -> Vec<String> {
        let concepts = match self.find_concepts(label) {
            Ok(concepts) => concepts,
            Err(e) => {
                warn!(label, error = %e, "concept lookup failed");
                return Vec::new();
            }
        };
        let mut terms = Vec::new();
        for uri in concepts {
            match self.alt_labels(&uri) {
                Ok(labels) => terms.extend(labels),
                Err(e) => warn!(uri = %uri, error = %e, "alt label lookup failed"),
            }
        }
        terms
    }

    /// Expansion terms of one relation kind for `uri`: the concept's own
    /// labels for label kinds, the labels of the linked concepts otherwise.
    pub fn expansions(&self, uri: &str, kind: SkosType) -> Result<Vec<String>> {
        let terms = if kind.is_label() {
            self.field_values(uri, kind.field())?
        } else {
            self.labels_via_relation(uri, kind.field())?
        };
        debug!(uri, kind = %kind, terms = terms.len(), "resolved expansions");
        Ok(terms)
    }

    pub fn pref_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Pref)
    }

    pub fn alt_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Alt)
    }

    pub fn hidden_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Hidden)
    }

    pub fn broader_concepts(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Broader)
    }

    pub fn narrower_concepts(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Narrower)
    }

    pub fn broader_transitive_concepts(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::BroaderTransitive)
    }

    pub fn narrower_transitive_concepts(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::NarrowerTransitive)
    }

    pub fn related_concepts(&self, uri: &str) -> Result<Vec<String>> {
        self.field_values(uri, ConceptField::Related)
    }

    pub fn broader_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.labels_via_relation(uri, ConceptField::Broader)
    }

    pub fn narrower_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.labels_via_relation(uri, ConceptField::Narrower)
    }

    pub fn broader_transitive_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.labels_via_relation(uri, ConceptField::BroaderTransitive)
    }

    pub fn narrower_transitive_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.labels_via_relation(uri, ConceptField::NarrowerTransitive)
    }

    pub fn related_labels(&self, uri: &str) -> Result<Vec<String>> {
        self.labels_via_relation(uri, ConceptField::Related)
    }
}

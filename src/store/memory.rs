//! In-memory concept store.
//!
//! Every named store keeps a list of staged records and an immutable,
//! shared [`ConceptIndex`] snapshot. A refresh folds the staged records into
//! a new snapshot; searches never see records that were not refreshed.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, SkosError};
use crate::store::index::ConceptIndex;
use crate::store::{
    BulkFailure, BulkResponse, ConceptRecord, ConceptStore, CreateOutcome, Readiness, SearchHits,
    StoreQuery, validate_store_name,
};

#[derive(Debug, Default)]
struct StoreState {
    staged: Vec<ConceptRecord>,
    searchable: Arc<ConceptIndex>,
}

/// A concept store living entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryConceptStore {
    stores: RwLock<AHashMap<String, StoreState>>,
}

impl MemoryConceptStore {
    pub fn new() -> Self {
        MemoryConceptStore::default()
    }

    /// Names of all stores, sorted.
    pub fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// The searchable snapshot of a store.
    pub fn snapshot(&self, name: &str) -> Result<Arc<ConceptIndex>> {
        self.stores
            .read()
            .get(name)
            .map(|state| Arc::clone(&state.searchable))
            .ok_or_else(|| missing(name))
    }

    /// Register an already committed index under `name`, replacing any
    /// existing store.
    pub(crate) fn install(&self, name: &str, index: ConceptIndex) {
        self.stores.write().insert(
            name.to_string(),
            StoreState {
                staged: Vec::new(),
                searchable: Arc::new(index),
            },
        );
    }
}

fn missing(name: &str) -> SkosError {
    SkosError::store(format!("no such concept store '{name}'"))
}

impl ConceptStore for MemoryConceptStore {
    fn wait_until_ready(&self, _timeout: Duration) -> Result<Readiness> {
        Ok(Readiness::Ready)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.stores.read().contains_key(name))
    }

    fn create(&self, name: &str) -> Result<CreateOutcome> {
        validate_store_name(name)?;
        let mut stores = self.stores.write();
        if stores.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        stores.insert(name.to_string(), StoreState::default());
        debug!(store = name, "created concept store");
        Ok(CreateOutcome::Created)
    }

    fn bulk(&self, name: &str, records: Vec<ConceptRecord>) -> Result<BulkResponse> {
        let mut stores = self.stores.write();
        let state = stores.get_mut(name).ok_or_else(|| missing(name))?;

        let mut response = BulkResponse::default();
        for (position, record) in records.into_iter().enumerate() {
            if record.uri.trim().is_empty() {
                response.failures.push(BulkFailure {
                    position,
                    uri: record.uri,
                    reason: "record has no uri".to_string(),
                });
                continue;
            }
            state.staged.push(record);
            response.indexed += 1;
        }
        Ok(response)
    }

    fn refresh(&self, name: &str) -> Result<()> {
        let mut stores = self.stores.write();
        let state = stores.get_mut(name).ok_or_else(|| missing(name))?;
        if state.staged.is_empty() {
            return Ok(());
        }

        let mut index = ConceptIndex::clone(&state.searchable);
        for record in state.staged.drain(..) {
            index.add(record);
        }
        debug!(store = name, records = index.len(), "refreshed concept store");
        state.searchable = Arc::new(index);
        Ok(())
    }

    fn search(&self, name: &str, query: &StoreQuery, size: usize) -> Result<SearchHits> {
        let snapshot = self.snapshot(name)?;
        Ok(snapshot.search(query, size))
    }

    fn count(&self, name: &str) -> Result<usize> {
        Ok(self.snapshot(name)?.len())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.stores
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| missing(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConceptField;

    fn weapons() -> ConceptRecord {
        let mut record = ConceptRecord::new("urn:weapons");
        record.pref.push("weapons".to_string());
        record
    }

    #[test]
    fn test_create_once() {
        let store = MemoryConceptStore::new();
        assert_eq!(store.create("skos").unwrap(), CreateOutcome::Created);
        assert_eq!(store.create("skos").unwrap(), CreateOutcome::AlreadyExists);
        assert!(store.exists("skos").unwrap());
        assert!(!store.exists("other").unwrap());
        assert!(store.create("../escape").is_err());
    }

    #[test]
    fn test_records_visible_after_refresh_only() {
        let store = MemoryConceptStore::new();
        store.create("skos").unwrap();
        let response = store.bulk("skos", vec![weapons()]).unwrap();
        assert_eq!(response.indexed, 1);

        let query = StoreQuery::term(ConceptField::Pref, "weapons");
        assert_eq!(store.search("skos", &query, 10).unwrap().total, 0);
        assert_eq!(store.count("skos").unwrap(), 0);

        store.refresh("skos").unwrap();
        assert_eq!(store.search("skos", &query, 10).unwrap().total, 1);
        assert_eq!(store.count("skos").unwrap(), 1);
    }

    #[test]
    fn test_bulk_reports_invalid_records() {
        let store = MemoryConceptStore::new();
        store.create("skos").unwrap();
        let response = store
            .bulk("skos", vec![weapons(), ConceptRecord::new("")])
            .unwrap();

        assert_eq!(response.indexed, 1);
        assert!(response.has_failures());
        assert_eq!(response.failures[0].position, 1);
    }

    #[test]
    fn test_missing_store_errors() {
        let store = MemoryConceptStore::new();
        let query = StoreQuery::term(ConceptField::Uri, "urn:x");
        assert!(matches!(
            store.search("nope", &query, 1).unwrap_err(),
            SkosError::Store(_)
        ));
        assert!(store.bulk("nope", vec![weapons()]).is_err());
        assert!(store.delete("nope").is_err());
    }

    #[test]
    fn test_delete() {
        let store = MemoryConceptStore::new();
        store.create("skos").unwrap();
        store.delete("skos").unwrap();
        assert!(!store.exists("skos").unwrap());
        assert!(store.store_names().is_empty());
    }
}

//! Keyword term index over concept records.

use ahash::AHashMap;

use crate::store::{ConceptField, ConceptRecord, SearchHits, StoreQuery};

/// Exact-match postings for every field of a set of records.
#[derive(Clone, Debug, Default)]
pub struct ConceptIndex {
    records: Vec<ConceptRecord>,
    postings: AHashMap<ConceptField, AHashMap<String, Vec<u32>>>,
}

impl ConceptIndex {
    pub fn new() -> Self {
        ConceptIndex::default()
    }

    pub fn from_records(records: Vec<ConceptRecord>) -> Self {
        let mut index = ConceptIndex::new();
        for record in records {
            index.add(record);
        }
        index
    }

    pub fn add(&mut self, record: ConceptRecord) {
        let doc = self.records.len() as u32;
        for field in ConceptField::ALL {
            let terms = self.postings.entry(field).or_default();
            for value in record.values(field) {
                let docs = terms.entry(value.clone()).or_default();
                // a value repeated within one record is posted once
                if docs.last() != Some(&doc) {
                    docs.push(doc);
                }
            }
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ConceptRecord] {
        &self.records
    }

    /// Matching records in insertion order, truncated to `size`.
    pub fn search(&self, query: &StoreQuery, size: usize) -> SearchHits {
        let docs = self.matching(query);
        SearchHits {
            total: docs.len(),
            records: docs
                .into_iter()
                .take(size)
                .map(|doc| self.records[doc as usize].clone())
                .collect(),
        }
    }

    fn matching(&self, query: &StoreQuery) -> Vec<u32> {
        match query {
            StoreQuery::Term { field, value } => self
                .postings
                .get(field)
                .and_then(|terms| terms.get(value))
                .cloned()
                .unwrap_or_default(),
            StoreQuery::DisMax(queries) => {
                let mut docs: Vec<u32> = queries.iter().flat_map(|q| self.matching(q)).collect();
                docs.sort_unstable();
                docs.dedup();
                docs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uri: &str, pref: &[&str], alt: &[&str]) -> ConceptRecord {
        let mut record = ConceptRecord::new(uri);
        record.pref = pref.iter().map(|s| s.to_string()).collect();
        record.alt = alt.iter().map(|s| s.to_string()).collect();
        record
    }

    #[test]
    fn test_term_query() {
        let index = ConceptIndex::from_records(vec![
            record("urn:weapons", &["weapons"], &["arms"]),
            record("urn:arms", &["arms"], &[]),
        ]);

        let hits = index.search(&StoreQuery::term(ConceptField::Alt, "arms"), 10);
        assert_eq!(hits.total, 1);
        assert_eq!(hits.records[0].uri, "urn:weapons");

        let hits = index.search(&StoreQuery::term(ConceptField::Uri, "urn:arms"), 10);
        assert_eq!(hits.total, 1);

        // keyword matching: no case folding, no partial matches
        assert_eq!(
            index
                .search(&StoreQuery::term(ConceptField::Pref, "Weapons"), 10)
                .total,
            0
        );
        assert_eq!(
            index
                .search(&StoreQuery::term(ConceptField::Pref, "weapon"), 10)
                .total,
            0
        );
    }

    #[test]
    fn test_dismax_unions_without_duplicates() {
        let index = ConceptIndex::from_records(vec![
            record("urn:a", &["arms"], &["arms"]),
            record("urn:b", &[], &["arms"]),
            record("urn:c", &["other"], &[]),
        ]);
        let query = StoreQuery::DisMax(
            ConceptField::LABELS
                .iter()
                .map(|field| StoreQuery::term(*field, "arms"))
                .collect(),
        );

        let hits = index.search(&query, 100);
        assert_eq!(hits.total, 2);
        let uris: Vec<_> = hits.records.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["urn:a", "urn:b"]);
    }

    #[test]
    fn test_size_truncates_records_not_total() {
        let index = ConceptIndex::from_records(
            (0..5)
                .map(|i| record(&format!("urn:{i}"), &["same"], &[]))
                .collect(),
        );
        let hits = index.search(&StoreQuery::term(ConceptField::Pref, "same"), 2);
        assert_eq!(hits.total, 5);
        assert_eq!(hits.records.len(), 2);
    }
}

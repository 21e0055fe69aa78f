//! Concept store abstraction.
//!
//! The concept store is the backing search system the expansion engine is
//! built on. It holds one [`ConceptRecord`] per concept in a named store and
//! offers the handful of primitives the builder and the query engine need:
//! readiness, create-once, bulk indexing, refresh (commit), search and
//! delete.
//!
//! All fields are keyword-indexed: a term query matches a value exactly.
//! Labels are lower-cased before they are written, so label lookups are
//! case-insensitive by construction.
//!
//! # Backends
//!
//! - [`memory::MemoryConceptStore`] - in-process, for tests and short-lived
//!   pipelines
//! - [`file::FileConceptStore`] - persists every committed store as a
//!   checksummed segment file so later processes reuse it

pub mod file;
pub mod index;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkosError};

/// A field of the concept store schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConceptField {
    #[serde(rename = "uri")]
    Uri,
    #[serde(rename = "pref")]
    Pref,
    #[serde(rename = "alt")]
    Alt,
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "broader")]
    Broader,
    #[serde(rename = "narrower")]
    Narrower,
    #[serde(rename = "broaderTransitive")]
    BroaderTransitive,
    #[serde(rename = "narrowerTransitive")]
    NarrowerTransitive,
    #[serde(rename = "related")]
    Related,
}

impl ConceptField {
    pub const ALL: [ConceptField; 9] = [
        ConceptField::Uri,
        ConceptField::Pref,
        ConceptField::Alt,
        ConceptField::Hidden,
        ConceptField::Broader,
        ConceptField::Narrower,
        ConceptField::BroaderTransitive,
        ConceptField::NarrowerTransitive,
        ConceptField::Related,
    ];

    /// Label fields a concept can be found by.
    pub const LABELS: [ConceptField; 3] =
        [ConceptField::Pref, ConceptField::Alt, ConceptField::Hidden];

    pub fn as_str(self) -> &'static str {
        match self {
            ConceptField::Uri => "uri",
            ConceptField::Pref => "pref",
            ConceptField::Alt => "alt",
            ConceptField::Hidden => "hidden",
            ConceptField::Broader => "broader",
            ConceptField::Narrower => "narrower",
            ConceptField::BroaderTransitive => "broaderTransitive",
            ConceptField::NarrowerTransitive => "narrowerTransitive",
            ConceptField::Related => "related",
        }
    }

    /// Whether the field holds URIs of other concepts.
    pub fn is_relation(self) -> bool {
        matches!(
            self,
            ConceptField::Broader
                | ConceptField::Narrower
                | ConceptField::BroaderTransitive
                | ConceptField::NarrowerTransitive
                | ConceptField::Related
        )
    }
}

impl FromStr for ConceptField {
    type Err = SkosError;

    fn from_str(s: &str) -> Result<Self> {
        ConceptField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SkosError::other(format!("unknown concept field '{s}'")))
    }
}

impl fmt::Display for ConceptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concept as stored in the backing store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub uri: String,
    pub pref: Vec<String>,
    pub alt: Vec<String>,
    pub hidden: Vec<String>,
    pub broader: Vec<String>,
    pub narrower: Vec<String>,
    #[serde(rename = "broaderTransitive")]
    pub broader_transitive: Vec<String>,
    #[serde(rename = "narrowerTransitive")]
    pub narrower_transitive: Vec<String>,
    pub related: Vec<String>,
}

impl ConceptRecord {
    pub fn new<S: Into<String>>(uri: S) -> Self {
        ConceptRecord {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Values of a multi-valued field. `uri` is single-valued and is
    /// returned as a one-element slice.
    pub fn values(&self, field: ConceptField) -> &[String] {
        match field {
            ConceptField::Uri => std::slice::from_ref(&self.uri),
            ConceptField::Pref => &self.pref,
            ConceptField::Alt => &self.alt,
            ConceptField::Hidden => &self.hidden,
            ConceptField::Broader => &self.broader,
            ConceptField::Narrower => &self.narrower,
            ConceptField::BroaderTransitive => &self.broader_transitive,
            ConceptField::NarrowerTransitive => &self.narrower_transitive,
            ConceptField::Related => &self.related,
        }
    }

    /// Mutable access to a multi-valued field. `None` for `uri`.
    pub fn values_mut(&mut self, field: ConceptField) -> Option<&mut Vec<String>> {
        match field {
            ConceptField::Uri => None,
            ConceptField::Pref => Some(&mut self.pref),
            ConceptField::Alt => Some(&mut self.alt),
            ConceptField::Hidden => Some(&mut self.hidden),
            ConceptField::Broader => Some(&mut self.broader),
            ConceptField::Narrower => Some(&mut self.narrower),
            ConceptField::BroaderTransitive => Some(&mut self.broader_transitive),
            ConceptField::NarrowerTransitive => Some(&mut self.narrower_transitive),
            ConceptField::Related => Some(&mut self.related),
        }
    }
}

/// A query against one store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreQuery {
    /// Exact match of one value of `field`.
    Term { field: ConceptField, value: String },
    /// Records matching any of the sub-queries.
    DisMax(Vec<StoreQuery>),
}

impl StoreQuery {
    pub fn term<S: Into<String>>(field: ConceptField, value: S) -> Self {
        StoreQuery::Term {
            field,
            value: value.into(),
        }
    }
}

/// The result of a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchHits {
    /// Number of matching records, regardless of the requested size.
    pub total: usize,
    /// At most `size` matching records.
    pub records: Vec<ConceptRecord>,
}

/// Outcome of a readiness wait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut { status: String },
}

/// Outcome of a create request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// A record rejected by a bulk request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    /// Position of the record within the request.
    pub position: usize,
    pub uri: String,
    pub reason: String,
}

/// Per-request bulk indexing result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BulkResponse {
    pub indexed: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkResponse {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failure_message(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}: {}", f.position, f.uri, f.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// The backing store collaborator.
///
/// Implementations must be safe to query concurrently once a store has been
/// refreshed.
pub trait ConceptStore: Send + Sync + fmt::Debug {
    /// Block until the backend can accept writes, or until `timeout`.
    fn wait_until_ready(&self, timeout: Duration) -> Result<Readiness>;

    /// Whether a store with this name exists (committed or not).
    fn exists(&self, name: &str) -> Result<bool>;

    /// Create an empty store, unless one with that name already exists.
    fn create(&self, name: &str) -> Result<CreateOutcome>;

    /// Stage records for indexing. Staged records become searchable on the
    /// next [`refresh`](Self::refresh).
    fn bulk(&self, name: &str, records: Vec<ConceptRecord>) -> Result<BulkResponse>;

    /// Make every staged record searchable.
    fn refresh(&self, name: &str) -> Result<()>;

    fn search(&self, name: &str, query: &StoreQuery, size: usize) -> Result<SearchHits>;

    /// Number of searchable records.
    fn count(&self, name: &str) -> Result<usize>;

    /// Drop a store and everything in it.
    fn delete(&self, name: &str) -> Result<()>;
}

/// Reject names that cannot be used as a store identity.
pub(crate) fn validate_store_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_whitespace)
    {
        return Err(SkosError::store(format!("invalid store name '{name}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        for field in ConceptField::ALL {
            assert_eq!(field.as_str().parse::<ConceptField>().unwrap(), field);
        }
        assert_eq!(
            "BROADERTRANSITIVE".parse::<ConceptField>().unwrap(),
            ConceptField::BroaderTransitive
        );
        assert!("label".parse::<ConceptField>().is_err());
        assert!(ConceptField::Related.is_relation());
        assert!(!ConceptField::Pref.is_relation());
    }

    #[test]
    fn test_record_json_schema() {
        let mut record = ConceptRecord::new("http://example.org/weapons");
        record.alt.push("arms".to_string());
        record.broader_transitive.push("http://example.org/things".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["uri"], "http://example.org/weapons");
        assert_eq!(json["alt"][0], "arms");
        assert_eq!(json["broaderTransitive"][0], "http://example.org/things");
        assert!(json["narrowerTransitive"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_record_values() {
        let mut record = ConceptRecord::new("urn:a");
        record
            .values_mut(ConceptField::Related)
            .unwrap()
            .push("urn:b".to_string());

        assert_eq!(record.values(ConceptField::Uri), ["urn:a".to_string()]);
        assert_eq!(record.values(ConceptField::Related), ["urn:b".to_string()]);
        assert!(record.values_mut(ConceptField::Uri).is_none());
    }

    #[test]
    fn test_bulk_failure_message() {
        let response = BulkResponse {
            indexed: 1,
            failures: vec![BulkFailure {
                position: 3,
                uri: String::new(),
                reason: "record has no uri".to_string(),
            }],
        };
        assert!(response.has_failures());
        assert_eq!(response.failure_message(), "[3] : record has no uri");
    }

    #[test]
    fn test_store_names() {
        assert!(validate_store_name("skos-de-en").is_ok());
        assert!(validate_store_name("").is_err());
        assert!(validate_store_name("../skos").is_err());
        assert!(validate_store_name("a b").is_err());
    }
}

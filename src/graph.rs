//! In-memory RDF graph model.
//!
//! The graph stores every term once in an arena and refers to it by a
//! [`TermId`]; triples are plain id tuples. Concepts that point at each other
//! through `broader`/`narrower`/`related` cycles therefore never own one
//! another.
//!
//! Only the two reads the concept store builder needs are indexed:
//! "which subjects carry property P" and "what are the values of P on
//! subject S".

pub mod entailment;
pub mod loader;

use std::fmt;

use ahash::{AHashMap, AHashSet};

/// Well-known IRIs.
pub mod vocab {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
    pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    pub const SKOS_BROADER_TRANSITIVE: &str =
        "http://www.w3.org/2004/02/skos/core#broaderTransitive";
    pub const SKOS_NARROWER_TRANSITIVE: &str =
        "http://www.w3.org/2004/02/skos/core#narrowerTransitive";
    pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";

    /// The three label properties, in pref/alt/hidden order.
    pub const LABEL_PROPERTIES: [&str; 3] = [SKOS_PREF_LABEL, SKOS_ALT_LABEL, SKOS_HIDDEN_LABEL];
}

/// A literal value with an optional language tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub lexical: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn simple<S: Into<String>>(lexical: S) -> Self {
        Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn lang<S: Into<String>, L: Into<String>>(lexical: S, language: L) -> Self {
        Literal {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }
}

/// A node of the graph: a resource (IRI or blank node) or a literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Node {
    pub fn iri<S: Into<String>>(iri: S) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank<S: Into<String>>(id: S) -> Self {
        Node::Blank(id.into())
    }

    /// Whether the node can stand as a resource (subject position).
    pub fn is_resource(&self) -> bool {
        matches!(self, Node::Iri(_) | Node::Blank(_))
    }

    /// The IRI of a named resource.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(id) => write!(f, "_:{id}"),
            Node::Literal(Literal {
                lexical,
                language: Some(lang),
                ..
            }) => write!(f, "\"{lexical}\"@{lang}"),
            Node::Literal(Literal { lexical, .. }) => write!(f, "\"{lexical}\""),
        }
    }
}

/// Index of a term in the graph arena.
pub type TermId = u32;

/// An in-memory set of triples.
#[derive(Debug, Default)]
pub struct Graph {
    terms: Vec<Node>,
    ids: AHashMap<Node, TermId>,
    triples: AHashSet<(TermId, TermId, TermId)>,
    // predicate -> subjects in first-seen order
    subjects_by_predicate: AHashMap<TermId, Vec<TermId>>,
    // (subject, predicate) -> objects in insertion order
    objects: AHashMap<(TermId, TermId), Vec<TermId>>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    fn intern(&mut self, node: Node) -> TermId {
        if let Some(id) = self.ids.get(&node) {
            return *id;
        }
        let id = self.terms.len() as TermId;
        self.terms.push(node.clone());
        self.ids.insert(node, id);
        id
    }

    fn lookup(&self, node: &Node) -> Option<TermId> {
        self.ids.get(node).copied()
    }

    fn predicate_id(&self, property: &str) -> Option<TermId> {
        self.lookup(&Node::Iri(property.to_string()))
    }

    /// Add a triple. Returns `false` when it was already present.
    pub fn insert(&mut self, subject: Node, property: &str, object: Node) -> bool {
        let s = self.intern(subject);
        let p = self.intern(Node::Iri(property.to_string()));
        let o = self.intern(object);
        if !self.triples.insert((s, p, o)) {
            return false;
        }
        let values = self.objects.entry((s, p)).or_default();
        if values.is_empty() {
            self.subjects_by_predicate.entry(p).or_default().push(s);
        }
        values.push(o);
        true
    }

    pub fn contains(&self, subject: &Node, property: &str, object: &Node) -> bool {
        match (
            self.lookup(subject),
            self.predicate_id(property),
            self.lookup(object),
        ) {
            (Some(s), Some(p), Some(o)) => self.triples.contains(&(s, p, o)),
            _ => false,
        }
    }

    /// Subjects having at least one value for `property`, in first-seen order.
    pub fn subjects_with_property(&self, property: &str) -> Vec<&Node> {
        self.predicate_id(property)
            .and_then(|p| self.subjects_by_predicate.get(&p))
            .map(|ids| ids.iter().map(|id| &self.terms[*id as usize]).collect())
            .unwrap_or_default()
    }

    /// Subjects carrying exactly `(property, value)`.
    pub fn subjects_with_value(&self, property: &str, value: &Node) -> Vec<&Node> {
        let (Some(p), Some(o)) = (self.predicate_id(property), self.lookup(value)) else {
            return Vec::new();
        };
        self.subjects_by_predicate
            .get(&p)
            .map(|ids| {
                ids.iter()
                    .filter(|s| self.triples.contains(&(**s, p, o)))
                    .map(|id| &self.terms[*id as usize])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All values of `property` on `subject`, in insertion order.
    pub fn values(&self, subject: &Node, property: &str) -> Vec<&Node> {
        let (Some(s), Some(p)) = (self.lookup(subject), self.predicate_id(property)) else {
            return Vec::new();
        };
        self.objects
            .get(&(s, p))
            .map(|ids| ids.iter().map(|id| &self.terms[*id as usize]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::vocab::*;
    use super::*;

    #[test]
    fn test_insert_and_read_back() {
        let mut graph = Graph::new();
        let weapons = Node::iri("http://example.org/weapons");

        assert!(graph.insert(
            weapons.clone(),
            SKOS_ALT_LABEL,
            Node::Literal(Literal::lang("Arms", "en"))
        ));
        assert!(graph.insert(
            weapons.clone(),
            SKOS_ALT_LABEL,
            Node::Literal(Literal::simple("Guns"))
        ));
        assert!(!graph.insert(
            weapons.clone(),
            SKOS_ALT_LABEL,
            Node::Literal(Literal::simple("Guns"))
        ));

        assert_eq!(graph.len(), 2);
        let values = graph.values(&weapons, SKOS_ALT_LABEL);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].as_literal().unwrap().lexical, "Arms");
        assert_eq!(values[1].as_literal().unwrap().language, None);
    }

    #[test]
    fn test_subject_queries() {
        let mut graph = Graph::new();
        let a = Node::iri("http://example.org/a");
        let b = Node::iri("http://example.org/b");
        graph.insert(a.clone(), SKOS_BROADER, b.clone());
        graph.insert(b.clone(), SKOS_NARROWER, a.clone());
        graph.insert(a.clone(), RDF_TYPE, Node::iri(SKOS_CONCEPT));

        assert_eq!(graph.subjects_with_property(SKOS_BROADER), vec![&a]);
        assert_eq!(
            graph.subjects_with_value(RDF_TYPE, &Node::iri(SKOS_CONCEPT)),
            vec![&a]
        );
        assert!(graph.contains(&b, SKOS_NARROWER, &a));
        assert!(graph.values(&a, SKOS_RELATED).is_empty());
        assert!(graph.subjects_with_property("http://example.org/none").is_empty());
    }

    #[test]
    fn test_node_display() {
        assert_eq!(Node::iri("urn:x").to_string(), "<urn:x>");
        assert_eq!(Node::blank("b0").to_string(), "_:b0");
        assert_eq!(
            Node::Literal(Literal::lang("Arms", "en")).to_string(),
            "\"Arms\"@en"
        );
    }
}

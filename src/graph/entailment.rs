//! Type completion over a loaded vocabulary.
//!
//! One rule is applied: every subject with a `skos:prefLabel`,
//! `skos:altLabel` or `skos:hiddenLabel` is typed `skos:Concept`. Nothing
//! else is inferred; transitive relations are taken from the source as-is.

use tracing::debug;

use crate::graph::vocab::{LABEL_PROPERTIES, RDF_TYPE, SKOS_CONCEPT};
use crate::graph::{Graph, Node};

/// Tag every labelled subject as a concept. Returns the number of
/// `rdf:type skos:Concept` triples that were added.
pub fn complete_concept_types(graph: &mut Graph) -> usize {
    let labelled: Vec<Node> = LABEL_PROPERTIES
        .iter()
        .flat_map(|property| graph.subjects_with_property(property))
        .cloned()
        .collect();

    let concept = Node::iri(SKOS_CONCEPT);
    let added = labelled
        .into_iter()
        .filter(|subject| graph.insert(subject.clone(), RDF_TYPE, concept.clone()))
        .count();

    debug!(added, "completed skos:Concept types");
    added
}

/// Resources typed `skos:Concept`, in first-seen order.
pub fn concepts(graph: &Graph) -> Vec<Node> {
    graph
        .subjects_with_value(RDF_TYPE, &Node::iri(SKOS_CONCEPT))
        .into_iter()
        .cloned()
        .collect()
}

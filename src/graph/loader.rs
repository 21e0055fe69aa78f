//! Vocabulary loading.
//!
//! A vocabulary is read from a file path, a `file://` or `http(s)://` URI, or
//! an in-memory buffer, in one of three serializations:
//!
//! - N3 (`.n3`), read with the Turtle grammar, which covers the N3 subset
//!   thesauri are published in
//! - RDF/XML (`.rdf`)
//! - Turtle (`.ttl`)
//!
//! A locator ending in `.zip` is unwrapped first: the archive member named
//! like the archive without its `.zip` suffix is parsed, with its format
//! inferred from its own extension (`ukat.n3.zip` -> `ukat.n3` -> N3).
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::graph::loader::{load, RdfFormat, VocabularySource};
//! use sarissa_skos::graph::vocab::SKOS_PREF_LABEL;
//!
//! let turtle = r#"
//!     @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
//!     <http://example.org/weapons> skos:prefLabel "Weapons"@en .
//! "#;
//! let source = VocabularySource::bytes(turtle, RdfFormat::Turtle);
//! let graph = load(&source).unwrap();
//! assert_eq!(graph.subjects_with_property(SKOS_PREF_LABEL).len(), 1);
//! ```

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use rio_api::model::{Literal as RioLiteral, Subject, Term, Triple};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};
use rio_xml::{RdfXmlError, RdfXmlParser};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Result, SkosError};
use crate::graph::{Graph, Literal, Node};

const ZIP_EXTENSION: &str = "zip";

/// Accepted vocabulary serializations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RdfFormat {
    N3,
    RdfXml,
    Turtle,
}

impl RdfFormat {
    /// Infer the serialization from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "n3" => Some(RdfFormat::N3),
            "rdf" => Some(RdfFormat::RdfXml),
            "ttl" => Some(RdfFormat::Turtle),
            _ => None,
        }
    }

    /// Infer the serialization from a file name or URI.
    pub fn from_locator(locator: &str) -> Result<Self> {
        extension(locator)
            .and_then(RdfFormat::from_extension)
            .ok_or_else(|| unsupported(locator))
    }

    /// Reject locators whose extension is neither a supported serialization
    /// nor a zip archive.
    pub fn check_locator(locator: &str) -> Result<()> {
        match extension(locator) {
            Some(ext) if ext.eq_ignore_ascii_case(ZIP_EXTENSION) => Ok(()),
            Some(ext) if RdfFormat::from_extension(ext).is_some() => Ok(()),
            _ => Err(unsupported(locator)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::N3 => "N3",
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "TURTLE",
        }
    }
}

impl FromStr for RdfFormat {
    type Err = SkosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N3" => Ok(RdfFormat::N3),
            "RDF/XML" => Ok(RdfFormat::RdfXml),
            "TURTLE" => Ok(RdfFormat::Turtle),
            other => Err(SkosError::format(format!(
                "invalid RDF serialization format '{other}', expected N3, RDF/XML or TURTLE"
            ))),
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn unsupported(locator: &str) -> SkosError {
    SkosError::format(format!(
        "unsupported vocabulary '{locator}': allowed file suffixes are \
         .n3 (N3), .rdf (RDF/XML), .ttl (Turtle) and .zip (zip)"
    ))
}

/// Where a vocabulary comes from.
#[derive(Clone, Debug)]
pub enum VocabularySource {
    /// A file path or URI, with an optional declared serialization.
    Locator {
        locator: String,
        format: Option<RdfFormat>,
    },
    /// An in-memory serialization.
    Bytes { data: Vec<u8>, format: RdfFormat },
}

impl VocabularySource {
    /// A path or URI whose serialization is inferred from its extension.
    pub fn locator<S: Into<String>>(locator: S) -> Self {
        VocabularySource::Locator {
            locator: locator.into(),
            format: None,
        }
    }

    /// A path or URI read with a declared serialization.
    pub fn locator_as<S: Into<String>>(locator: S, format: RdfFormat) -> Self {
        VocabularySource::Locator {
            locator: locator.into(),
            format: Some(format),
        }
    }

    pub fn bytes<B: Into<Vec<u8>>>(data: B, format: RdfFormat) -> Self {
        VocabularySource::Bytes {
            data: data.into(),
            format,
        }
    }
}

/// Load a vocabulary into a fresh graph.
pub fn load(source: &VocabularySource) -> Result<Graph> {
    let mut graph = Graph::new();
    match source {
        VocabularySource::Bytes { data, format } => {
            parse_into(&mut graph, Cursor::new(data.as_slice()), *format)?;
        }
        VocabularySource::Locator { locator, format } => {
            let (name, data) = fetch(locator)?;
            let (name, data) = if is_zip(&name) {
                unwrap_archive(&name, data)?
            } else {
                (name, data)
            };
            let format = match format {
                Some(format) => *format,
                None => RdfFormat::from_locator(&name)?,
            };
            parse_into(&mut graph, Cursor::new(data), format)?;
        }
    }
    info!(triples = graph.len(), "vocabulary loaded");
    Ok(graph)
}

/// Parse a serialization from any buffered reader into `graph`.
pub fn parse_into<R: BufRead>(graph: &mut Graph, reader: R, format: RdfFormat) -> Result<()> {
    debug!(%format, "parsing vocabulary");
    match format {
        RdfFormat::N3 | RdfFormat::Turtle => {
            let mut parser = TurtleParser::new(reader, None);
            parser
                .parse_all(&mut |triple| -> std::result::Result<(), TurtleError> {
                    add_triple(graph, &triple);
                    Ok(())
                })
                .map_err(|e| SkosError::load(format!("cannot parse {format} vocabulary"), e))
        }
        RdfFormat::RdfXml => {
            let mut parser = RdfXmlParser::new(reader, None);
            parser
                .parse_all(&mut |triple| -> std::result::Result<(), RdfXmlError> {
                    add_triple(graph, &triple);
                    Ok(())
                })
                .map_err(|e| SkosError::load(format!("cannot parse {format} vocabulary"), e))
        }
    }
}

fn add_triple(graph: &mut Graph, triple: &Triple<'_>) {
    let subject = match &triple.subject {
        Subject::NamedNode(node) => Node::Iri(node.iri.to_string()),
        Subject::BlankNode(node) => Node::Blank(node.id.to_string()),
        // quoted triples carry no SKOS data
        _ => return,
    };
    let object = match &triple.object {
        Term::NamedNode(node) => Node::Iri(node.iri.to_string()),
        Term::BlankNode(node) => Node::Blank(node.id.to_string()),
        Term::Literal(RioLiteral::Simple { value }) => {
            Node::Literal(Literal::simple(value.to_string()))
        }
        Term::Literal(RioLiteral::LanguageTaggedString { value, language }) => {
            Node::Literal(Literal::lang(value.to_string(), language.to_string()))
        }
        Term::Literal(RioLiteral::Typed { value, datatype }) => Node::Literal(Literal {
            lexical: value.to_string(),
            language: None,
            datatype: Some(datatype.iri.to_string()),
        }),
        _ => return,
    };
    graph.insert(subject, triple.predicate.iri, object);
}

/// Resolve a locator to (file name, bytes).
fn fetch(locator: &str) -> Result<(String, Vec<u8>)> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        debug!(locator, "fetching remote vocabulary");
        let data = reqwest::blocking::get(locator)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| SkosError::load(format!("cannot fetch vocabulary '{locator}'"), e))?;
        let path = locator.split(['?', '#']).next().unwrap_or(locator);
        return Ok((file_name(path).to_string(), data.to_vec()));
    }

    let path = locator.strip_prefix("file://").unwrap_or(locator);
    let data = fs::read(path)
        .map_err(|e| SkosError::load(format!("cannot read vocabulary '{path}'"), e))?;
    Ok((file_name(path).to_string(), data))
}

/// Extract the member named like the archive minus its `.zip` suffix.
fn unwrap_archive(name: &str, data: Vec<u8>) -> Result<(String, Vec<u8>)> {
    let inner = strip_extension(name).to_string();
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| SkosError::load(format!("cannot open archive '{name}'"), e))?;

    let member = archive
        .file_names()
        .find(|candidate| *candidate == inner || file_name(candidate) == inner)
        .map(str::to_string)
        .ok_or_else(|| {
            SkosError::load(
                format!("archive '{name}' has no member '{inner}'"),
                format!("missing zip member '{inner}'"),
            )
        })?;

    let mut buffer = Vec::new();
    let entry = archive
        .by_name(&member)
        .map_err(|e| SkosError::load(format!("cannot open '{member}' in '{name}'"), e))?;
    BufReader::new(entry)
        .read_to_end(&mut buffer)
        .map_err(|e| SkosError::load(format!("cannot read '{member}' in '{name}'"), e))?;

    debug!(archive = name, member, bytes = buffer.len(), "unwrapped archive");
    Ok((inner, buffer))
}

fn is_zip(name: &str) -> bool {
    extension(name).is_some_and(|ext| ext.eq_ignore_ascii_case(ZIP_EXTENSION))
}

fn file_name(locator: &str) -> &str {
    locator.rsplit(['/', '\\']).next().unwrap_or(locator)
}

fn extension(locator: &str) -> Option<&str> {
    Path::new(file_name(locator))
        .extension()
        .and_then(|ext| ext.to_str())
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}

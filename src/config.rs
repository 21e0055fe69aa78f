//! Expansion configuration.
//!
//! The host search engine resolves named filter settings into a flat
//! key/value map; [`ExpansionConfig::from_settings`] turns that map into a
//! validated configuration. The recognized keys are:
//!
//! | key             | required | meaning                                          |
//! |-----------------|----------|--------------------------------------------------|
//! | `skosFile`      | yes      | vocabulary locator (path, URI, `.zip` archive)   |
//! | `expansionType` | yes      | `LABEL` or `URI`                                 |
//! | `language`      | no       | whitespace-separated language tags               |
//! | `skosType`      | no       | relation kinds used for expansion                |
//! | `bufferSize`    | no       | label window size in tokens (default 4)          |
//! | `indexName`     | no       | store identity root (falls back to `path`, then `skos`) |
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use sarissa_skos::config::{ExpansionConfig, ExpansionType, SkosType};
//!
//! let mut settings = HashMap::new();
//! settings.insert("skosFile".to_string(), "vocab/ukat.n3".to_string());
//! settings.insert("expansionType".to_string(), "label".to_string());
//! settings.insert("skosType".to_string(), "ALT BROADER".to_string());
//!
//! let config = ExpansionConfig::from_settings(&settings).unwrap();
//! assert_eq!(config.expansion_type, ExpansionType::Label);
//! assert_eq!(config.skos_types, vec![SkosType::Alt, SkosType::Broader]);
//! assert_eq!(config.buffer_size, 4);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkosError};
use crate::graph::loader::RdfFormat;
use crate::store::ConceptField;

/// Default label window, in tokens.
pub const DEFAULT_BUFFER_SIZE: usize = 4;

/// Default store identity root.
pub const DEFAULT_INDEX_NAME: &str = "skos";

/// Which expansion filter runs over the token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpansionType {
    /// Tokens are free text matched against concept labels.
    Label,
    /// Tokens are concept URIs.
    Uri,
}

impl FromStr for ExpansionType {
    type Err = SkosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LABEL" => Ok(ExpansionType::Label),
            "URI" => Ok(ExpansionType::Uri),
            other => Err(SkosError::configuration(format!(
                "'expansionType' must be LABEL or URI, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExpansionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionType::Label => write!(f, "LABEL"),
            ExpansionType::Uri => write!(f, "URI"),
        }
    }
}

/// A relation kind used to pick expansion terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkosType {
    Pref,
    Alt,
    Hidden,
    Broader,
    Narrower,
    BroaderTransitive,
    NarrowerTransitive,
    Related,
}

impl SkosType {
    /// Every kind, in declaration order.
    pub const ALL: [SkosType; 8] = [
        SkosType::Pref,
        SkosType::Alt,
        SkosType::Hidden,
        SkosType::Broader,
        SkosType::Narrower,
        SkosType::BroaderTransitive,
        SkosType::NarrowerTransitive,
        SkosType::Related,
    ];

    /// The concept store field backing this kind.
    pub fn field(self) -> ConceptField {
        match self {
            SkosType::Pref => ConceptField::Pref,
            SkosType::Alt => ConceptField::Alt,
            SkosType::Hidden => ConceptField::Hidden,
            SkosType::Broader => ConceptField::Broader,
            SkosType::Narrower => ConceptField::Narrower,
            SkosType::BroaderTransitive => ConceptField::BroaderTransitive,
            SkosType::NarrowerTransitive => ConceptField::NarrowerTransitive,
            SkosType::Related => ConceptField::Related,
        }
    }

    /// Label kinds read literal values off the concept itself; the others
    /// follow a link to related concepts.
    pub fn is_label(self) -> bool {
        matches!(self, SkosType::Pref | SkosType::Alt | SkosType::Hidden)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkosType::Pref => "PREF",
            SkosType::Alt => "ALT",
            SkosType::Hidden => "HIDDEN",
            SkosType::Broader => "BROADER",
            SkosType::Narrower => "NARROWER",
            SkosType::BroaderTransitive => "BROADERTRANSITIVE",
            SkosType::NarrowerTransitive => "NARROWERTRANSITIVE",
            SkosType::Related => "RELATED",
        }
    }

    /// Parse a `skosType` setting value. Tokens may be separated by
    /// whitespace or commas; duplicates are dropped keeping first occurrence.
    pub fn parse_list(value: &str) -> Result<Vec<SkosType>> {
        let mut kinds = Vec::new();
        for token in value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let kind = token.parse::<SkosType>()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl FromStr for SkosType {
    type Err = SkosError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        SkosType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| {
                SkosError::configuration(format!(
                    "'skosType' must be one of PREF, ALT, HIDDEN, BROADER, NARROWER, \
                     BROADERTRANSITIVE, NARROWERTRANSITIVE, RELATED, got '{s}'"
                ))
            })
    }
}

impl fmt::Display for SkosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved configuration of one SKOS expansion filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionConfig {
    /// Vocabulary locator.
    pub skos_file: String,

    pub expansion_type: ExpansionType,

    /// Relation kinds to expand with. Empty means every kind.
    #[serde(default, rename = "skosType")]
    pub skos_types: Vec<SkosType>,

    /// Language filter for labels. `None` or empty keeps all labels.
    #[serde(default, rename = "language")]
    pub languages: Option<BTreeSet<String>>,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

impl ExpansionConfig {
    /// Create a configuration with defaults for everything but the two
    /// mandatory settings.
    pub fn new<S: Into<String>>(skos_file: S, expansion_type: ExpansionType) -> Self {
        ExpansionConfig {
            skos_file: skos_file.into(),
            expansion_type,
            skos_types: Vec::new(),
            languages: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }

    pub fn with_skos_types(mut self, kinds: Vec<SkosType>) -> Self {
        self.skos_types = kinds;
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_index_name<S: Into<String>>(mut self, index_name: S) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// Build a configuration from resolved host settings.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        let skos_file = settings
            .get("skosFile")
            .ok_or_else(|| SkosError::configuration("mandatory parameter 'skosFile' missing"))?;
        let expansion_type = settings
            .get("expansionType")
            .ok_or_else(|| {
                SkosError::configuration("mandatory parameter 'expansionType' missing")
            })?
            .parse::<ExpansionType>()?;

        let mut config = ExpansionConfig::new(skos_file.clone(), expansion_type);

        if let Some(value) = settings.get("bufferSize") {
            config.buffer_size = value.trim().parse::<usize>().map_err(|_| {
                SkosError::configuration(format!(
                    "'bufferSize' must be a positive (small) integer, got '{value}'"
                ))
            })?;
        }

        if let Some(value) = settings.get("skosType") {
            config.skos_types = SkosType::parse_list(value)?;
        }

        if let Some(value) = settings.get("language") {
            config.languages = Some(value.split_whitespace().map(str::to_string).collect());
        }

        if let Some(name) = settings.get("indexName").or_else(|| settings.get("path")) {
            config.index_name = name.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file using the same key names as the
    /// settings map.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ExpansionConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.skos_file.trim().is_empty() {
            return Err(SkosError::configuration(
                "mandatory parameter 'skosFile' missing",
            ));
        }
        if self.buffer_size < 1 {
            return Err(SkosError::configuration(
                "'bufferSize' must be a positive (small) integer",
            ));
        }
        if self.index_name.trim().is_empty() {
            return Err(SkosError::configuration("'indexName' must not be empty"));
        }
        RdfFormat::check_locator(&self.skos_file)?;
        Ok(())
    }

    /// The relation kinds actually applied: the configured ones, or every
    /// kind when none are configured.
    pub fn effective_skos_types(&self) -> Vec<SkosType> {
        if self.skos_types.is_empty() {
            SkosType::ALL.to_vec()
        } else {
            self.skos_types.clone()
        }
    }
}

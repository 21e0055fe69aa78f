//! Command line argument parsing for the sarissa-skos CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ExpansionConfig, ExpansionType, SkosType};
use crate::error::{Result, SkosError};

/// sarissa-skos - SKOS concept expansion for Sarissa analysis pipelines
#[derive(Parser, Debug, Clone)]
#[command(name = "sarissa-skos")]
#[command(about = "Build SKOS concept stores and expand terms with them")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SkosArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the concept store segments
    #[arg(
        short = 'd',
        long = "store-dir",
        env = "SARISSA_SKOS_STORE_DIR",
        default_value = "skos-stores",
        global = true
    )]
    pub store_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SkosArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load a vocabulary and build its concept store
    Build(BuildArgs),

    /// Find the concepts carrying a label
    Concepts(ConceptsArgs),

    /// Show one field of a concept
    Field(FieldArgs),

    /// List the alternative labels of the concepts carrying a label
    #[command(name = "alt-terms")]
    AltTerms(AltTermsArgs),

    /// Run text through the expansion analyzer
    Expand(ExpandArgs),

    /// List the concept stores in the store directory
    List,
}

/// Options selecting and configuring the expansion filter.
#[derive(Args, Debug, Clone, Default)]
pub struct ExpansionArgs {
    /// JSON configuration file using the filter setting names
    #[arg(short = 'c', long = "config")]
    pub config_file: Option<PathBuf>,

    /// Vocabulary locator (file path, URL, or .zip archive)
    #[arg(short = 's', long = "skos-file")]
    pub skos_file: Option<String>,

    /// LABEL or URI
    #[arg(short = 't', long = "expansion-type")]
    pub expansion_type: Option<String>,

    /// Relation kinds used for expansion, e.g. "ALT BROADER"
    #[arg(long = "skos-type")]
    pub skos_type: Option<String>,

    /// Language tag to keep; may be repeated
    #[arg(short = 'l', long = "language")]
    pub languages: Vec<String>,

    /// Label window size in tokens
    #[arg(long = "buffer-size")]
    pub buffer_size: Option<usize>,

    /// Store identity root
    #[arg(long = "index-name")]
    pub index_name: Option<String>,
}

impl ExpansionArgs {
    /// Resolve the configuration file, if any, and the command line
    /// overrides into a validated configuration.
    pub fn to_config(&self) -> Result<ExpansionConfig> {
        let mut config = match &self.config_file {
            Some(path) => ExpansionConfig::from_json_file(path)?,
            None => {
                let skos_file = self.skos_file.as_deref().ok_or_else(|| {
                    SkosError::configuration(
                        "mandatory parameter 'skosFile' missing (use --skos-file or --config)",
                    )
                })?;
                ExpansionConfig::new(skos_file, ExpansionType::Label)
            }
        };

        if let Some(skos_file) = &self.skos_file {
            config.skos_file = skos_file.clone();
        }
        if let Some(expansion_type) = &self.expansion_type {
            config.expansion_type = expansion_type.parse()?;
        }
        if let Some(skos_type) = &self.skos_type {
            config.skos_types = SkosType::parse_list(skos_type)?;
        }
        if !self.languages.is_empty() {
            config = config.with_languages(self.languages.iter().cloned());
        }
        if let Some(buffer_size) = self.buffer_size {
            config.buffer_size = buffer_size;
        }
        if let Some(index_name) = &self.index_name {
            config.index_name = index_name.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for building a concept store
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub expansion: ExpansionArgs,

    /// Drop an existing store with the same identity first
    #[arg(long)]
    pub force: bool,

    /// Records per bulk request
    #[arg(long = "batch-size", default_value_t = crate::engine::builder::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Arguments for label lookups
#[derive(Args, Debug, Clone)]
pub struct ConceptsArgs {
    /// Label to look up (case-insensitive)
    pub label: String,

    #[command(flatten)]
    pub expansion: ExpansionArgs,
}

/// Arguments for field lookups
#[derive(Args, Debug, Clone)]
pub struct FieldArgs {
    /// Concept URI
    pub uri: String,

    /// Field name: uri, pref, alt, hidden, broader, narrower,
    /// broaderTransitive, narrowerTransitive or related
    pub field: String,

    #[command(flatten)]
    pub expansion: ExpansionArgs,
}

/// Arguments for alternative term lookups
#[derive(Args, Debug, Clone)]
pub struct AltTermsArgs {
    pub label: String,

    #[command(flatten)]
    pub expansion: ExpansionArgs,
}

/// Arguments for running the analyzer
#[derive(Args, Debug, Clone)]
pub struct ExpandArgs {
    /// Text to analyze; a concept URI for URI expansion
    pub text: String,

    #[command(flatten)]
    pub expansion: ExpansionArgs,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

//! Command implementations for the sarissa-skos CLI.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::skos::SkosAnalyzer;
use crate::analysis::token_filter::skos::SkosFilterFactory;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ExpansionConfig;
use crate::engine::{ConceptQueryEngine, ConceptStoreBuilder, EngineRegistry, StoreIdentity};
use crate::error::Result;
use crate::graph::entailment;
use crate::graph::loader::{self, VocabularySource};
use crate::store::file::FileConceptStore;
use crate::store::{ConceptField, ConceptStore};

/// Execute a CLI command.
pub fn execute_command(args: SkosArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_store(build_args, &args),
        Command::Concepts(concepts_args) => find_concepts(concepts_args, &args),
        Command::Field(field_args) => show_field(field_args, &args),
        Command::AltTerms(alt_args) => alt_terms(alt_args, &args),
        Command::Expand(expand_args) => expand_text(expand_args, &args),
        Command::List => list_stores(&args),
    }
}

fn open_store(cli_args: &SkosArgs) -> Result<Arc<dyn ConceptStore>> {
    Ok(Arc::new(FileConceptStore::open(&cli_args.store_dir)?))
}

fn factory(cli_args: &SkosArgs) -> Result<SkosFilterFactory> {
    Ok(SkosFilterFactory::new(
        open_store(cli_args)?,
        Arc::new(EngineRegistry::new()),
    ))
}

/// The engine for `config`, building its store on first use.
fn engine(config: &ExpansionConfig, cli_args: &SkosArgs) -> Result<Arc<ConceptQueryEngine>> {
    factory(cli_args)?.engine(config)
}

/// Load a vocabulary and build its concept store.
fn build_store(args: &BuildArgs, cli_args: &SkosArgs) -> Result<()> {
    let config = args.expansion.to_config()?;
    let store = open_store(cli_args)?;
    let builder = ConceptStoreBuilder::new(
        Arc::clone(&store),
        &config.index_name,
        config.languages.as_ref(),
    )
    .with_batch_size(args.batch_size);
    let identity = builder.identity().clone();

    if args.force && store.exists(identity.as_str())? {
        info!(store = identity.as_str(), "dropping existing concept store");
        store.delete(identity.as_str())?;
    }

    let start = Instant::now();
    let mut graph = loader::load(&VocabularySource::locator(config.skos_file.as_str()))?;
    let completed = entailment::complete_concept_types(&mut graph);
    info!(
        vocabulary = %config.skos_file,
        statements = graph.len(),
        completed,
        "vocabulary loaded"
    );

    let report = builder.build(&graph)?;
    info!(
        store = identity.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build finished"
    );

    let message = if report.created {
        format!("Built concept store '{identity}'")
    } else {
        format!("Concept store '{identity}' already exists; use --force to rebuild")
    };
    output_result(&message, &report, cli_args)
}

fn find_concepts(args: &ConceptsArgs, cli_args: &SkosArgs) -> Result<()> {
    let config = args.expansion.to_config()?;
    let engine = engine(&config, cli_args)?;
    let concepts = engine.find_concepts(&args.label)?;

    let result = ConceptsResult {
        store: engine.identity().to_string(),
        label: args.label.clone(),
        concepts,
    };
    output_result(
        &format!("Concepts labelled '{}'", args.label),
        &result,
        cli_args,
    )
}

fn show_field(args: &FieldArgs, cli_args: &SkosArgs) -> Result<()> {
    let field: ConceptField = args.field.parse()?;
    let config = args.expansion.to_config()?;
    let engine = engine(&config, cli_args)?;
    let values = engine.field_values(&args.uri, field)?;

    let result = FieldResult {
        store: engine.identity().to_string(),
        uri: args.uri.clone(),
        field: field.to_string(),
        values,
    };
    output_result(
        &format!("Field '{field}' of <{}>", args.uri),
        &result,
        cli_args,
    )
}

fn alt_terms(args: &AltTermsArgs, cli_args: &SkosArgs) -> Result<()> {
    let config = args.expansion.to_config()?;
    let engine = engine(&config, cli_args)?;

    let result = AltTermsResult {
        store: engine.identity().to_string(),
        label: args.label.clone(),
        terms: engine.alt_terms_for_label(&args.label),
    };
    output_result(
        &format!("Alternative terms for '{}'", args.label),
        &result,
        cli_args,
    )
}

fn expand_text(args: &ExpandArgs, cli_args: &SkosArgs) -> Result<()> {
    let config = args.expansion.to_config()?;
    let factory = factory(cli_args)?;
    let analyzer = SkosAnalyzer::from_config(&factory, &config)?;
    let store = StoreIdentity::new(&config.index_name, config.languages.as_ref()).to_string();

    let tokens: Vec<TokenRow> = analyzer
        .analyze(&args.text)?
        .map(|token| TokenRow::from(&token))
        .collect();

    let result = ExpansionResult {
        store,
        analyzer: analyzer.name().to_string(),
        text: args.text.clone(),
        tokens,
    };
    output_result(
        &format!("{} expansion of '{}'", config.expansion_type, args.text),
        &result,
        cli_args,
    )
}

fn list_stores(cli_args: &SkosArgs) -> Result<()> {
    let store = FileConceptStore::open(&cli_args.store_dir)?;
    let result = StoreList {
        directory: store.directory().display().to_string(),
        stores: store.list()?,
    };
    output_result("Concept stores", &result, cli_args)
}

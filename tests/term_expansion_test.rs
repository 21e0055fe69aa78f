//! End-to-end expansion: documents are indexed through a SKOS analyzer and
//! searched with plain term queries.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use sarissa_skos::analysis::analyzer::analyzer::Analyzer;
use sarissa_skos::analysis::analyzer::pipeline::PipelineAnalyzer;
use sarissa_skos::analysis::analyzer::skos::SkosAnalyzer;
use sarissa_skos::analysis::token::{Token, TokenType};
use sarissa_skos::analysis::token_filter::Filter;
use sarissa_skos::analysis::token_filter::lowercase::LowercaseFilter;
use sarissa_skos::analysis::token_filter::skos::SkosFilterFactory;
use sarissa_skos::analysis::tokenizer::Tokenizer;
use sarissa_skos::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use sarissa_skos::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use sarissa_skos::config::{ExpansionConfig, ExpansionType, SkosType};
use sarissa_skos::engine::EngineRegistry;
use sarissa_skos::error::SkosError;
use sarissa_skos::store::memory::MemoryConceptStore;

const WEAPONS: &str = "http://www.ukat.org.uk/thesaurus/concept/859";

fn vocabulary() -> String {
    format!(
        "{}/tests/resources/ukat_examples.n3",
        env!("CARGO_MANIFEST_DIR")
    )
}

fn factory() -> SkosFilterFactory {
    SkosFilterFactory::new(
        Arc::new(MemoryConceptStore::new()),
        Arc::new(EngineRegistry::new()),
    )
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// A one-field inverted index: term -> document ids.
#[derive(Default)]
struct SubjectIndex {
    postings: HashMap<String, BTreeSet<u32>>,
}

impl SubjectIndex {
    fn add(&mut self, analyzer: &dyn Analyzer, id: u32, subject: &str) {
        for token in analyzer.analyze(subject).unwrap() {
            self.postings.entry(token.text).or_default().insert(id);
        }
    }

    fn search(&self, term: &str) -> Vec<u32> {
        self.postings
            .get(term)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn plain_analyzer() -> PipelineAnalyzer {
    PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
        .add_filter(Arc::new(LowercaseFilter::new()))
}

#[test]
fn test_no_expansion_without_skos() {
    let mut index = SubjectIndex::default();
    index.add(&plain_analyzer(), 1, "weapons");

    assert_eq!(index.search("weapons"), vec![1]);
    assert!(index.search("arms").is_empty());
}

#[test]
fn test_label_term_expansion() {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Label)
        .with_skos_types(vec![SkosType::Alt, SkosType::Broader]);
    let analyzer = SkosAnalyzer::from_config(&factory(), &config).unwrap();

    let mut index = SubjectIndex::default();
    index.add(&analyzer, 1, "weapons");
    index.add(&analyzer, 2, "Gardening tools");

    // alt label of the matched concept
    assert_eq!(index.search("arms"), vec![1]);
    // pref label of the broader concept
    assert_eq!(index.search("military equipment"), vec![1]);
    assert_eq!(index.search("tools"), vec![2]);
    // narrower and related kinds are not configured
    assert!(index.search("nuclear weapons").is_empty());
    assert!(index.search("armed forces").is_empty());
}

#[test]
fn test_all_kinds_when_none_configured() {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Label);
    let analyzer = SkosAnalyzer::from_config(&factory(), &config).unwrap();

    let mut index = SubjectIndex::default();
    index.add(&analyzer, 1, "Weapons");

    for term in [
        "weapons",
        "arms",
        "materiel",
        "military equipment",
        "nuclear weapons",
        "atomic weapons",
        "armed forces",
    ] {
        assert_eq!(index.search(term), vec![1], "{term}");
    }
    // hidden labels of related concepts are never expansion terms
    assert!(index.search("armies").is_empty());
}

#[test]
fn test_uri_term_expansion() {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Uri)
        .with_skos_types(vec![SkosType::Pref, SkosType::Alt, SkosType::Broader]);
    let analyzer = SkosAnalyzer::from_config(&factory(), &config).unwrap();

    let mut index = SubjectIndex::default();
    index.add(&analyzer, 1, WEAPONS);
    index.add(&analyzer, 2, "http://www.ukat.org.uk/thesaurus/concept/0");

    assert_eq!(index.search("arms"), vec![1]);
    assert_eq!(index.search("military equipment"), vec![1]);
    // not configured
    assert!(index.search("armed forces").is_empty());
    // unknown concepts only index themselves
    assert_eq!(
        index.search("http://www.ukat.org.uk/thesaurus/concept/0"),
        vec![2]
    );
}

#[test]
fn test_synonyms_are_stacked_and_marked() {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Label)
        .with_skos_types(vec![SkosType::Alt, SkosType::Broader]);
    let analyzer = SkosAnalyzer::from_config(&factory(), &config).unwrap();

    let tokens: Vec<Token> = analyzer.analyze("old weapons depot").unwrap().collect();
    assert_eq!(
        texts(&tokens),
        vec![
            "old",
            "weapons",
            "arms",
            "weaponry",
            "waffen",
            "military equipment",
            "materiel",
            "depot"
        ]
    );

    let weapons = &tokens[1];
    for synonym in &tokens[2..7] {
        assert_eq!(synonym.position, weapons.position);
        assert_eq!(synonym.position_increment, 0);
        assert_eq!(synonym.start_offset, weapons.start_offset);
        assert_eq!(synonym.end_offset, weapons.end_offset);
        assert_eq!(synonym.token_type(), Some(TokenType::Synonym));
    }
    assert_eq!(tokens[2].skos_type(), Some(SkosType::Alt));
    assert_eq!(tokens[5].skos_type(), Some(SkosType::Broader));
    assert_eq!(tokens[7].position, weapons.position + 1);
    assert_eq!(tokens[7].position_increment, 1);
}

fn label_filter(kinds: Vec<SkosType>, buffer_size: usize) -> impl Filter {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Label)
        .with_skos_types(kinds)
        .with_buffer_size(buffer_size);
    factory().create(&config).unwrap()
}

fn expand(filter: &impl Filter, text: &str) -> Vec<Token> {
    let tokens = WhitespaceTokenizer::new().tokenize(text).unwrap();
    filter.filter(tokens).unwrap().collect()
}

#[test]
fn test_multi_word_label_within_buffer() {
    let filter = label_filter(vec![SkosType::Alt], 3);

    let tokens = expand(&filter, "the main battle tanks");
    assert_eq!(
        texts(&tokens),
        vec!["the", "main", "battle", "tanks", "mbt"]
    );
    assert_eq!(tokens[4].position, tokens[3].position);
}

#[test]
fn test_multi_word_label_beyond_buffer() {
    let filter = label_filter(vec![SkosType::Alt], 2);

    let tokens = expand(&filter, "main battle tanks");
    assert_eq!(texts(&tokens), vec!["main", "battle", "tanks"]);
    assert!(tokens.iter().all(|t| !t.is_synonym()));
}

#[test]
fn test_longest_label_wins() {
    let filter = label_filter(vec![SkosType::Alt], 4);

    // "nuclear weapons" is preferred over the shorter "weapons"
    let tokens = expand(&filter, "nuclear weapons");
    assert_eq!(texts(&tokens), vec!["nuclear", "weapons", "atomic weapons"]);

    let tokens = expand(&filter, "weapons nuclear");
    assert_eq!(
        texts(&tokens),
        vec!["weapons", "arms", "weaponry", "waffen", "nuclear"]
    );
}

#[test]
fn test_buffer_size_one_matches_single_tokens() {
    let filter = label_filter(vec![SkosType::Pref], 1);

    let tokens = expand(&filter, "arms nuclear weapons");
    assert_eq!(
        texts(&tokens),
        vec!["arms", "weapons", "nuclear", "weapons", "weapons"]
    );
}

#[test]
fn test_invalid_settings_are_rejected() {
    let mut settings: HashMap<String, String> = HashMap::new();
    settings.insert("skosFile".to_string(), vocabulary());
    settings.insert("expansionType".to_string(), "LABEL".to_string());
    settings.insert("bufferSize".to_string(), "0".to_string());

    let err = factory().create_from_settings(&settings).unwrap_err();
    assert!(matches!(err, SkosError::Configuration(_)), "{err}");

    settings.insert("bufferSize".to_string(), "2".to_string());
    settings.insert("skosType".to_string(), "ALT COUSIN".to_string());
    let err = factory().create_from_settings(&settings).unwrap_err();
    assert!(matches!(err, SkosError::Configuration(_)), "{err}");

    settings.remove("skosType");
    settings.insert("expansionType".to_string(), "THESAURUS".to_string());
    let err = factory().create_from_settings(&settings).unwrap_err();
    assert!(err.is_setup_error());
}

#[test]
fn test_very_large_buffer_size_from_settings() {
    let mut settings: HashMap<String, String> = HashMap::new();
    settings.insert("skosFile".to_string(), vocabulary());
    settings.insert("expansionType".to_string(), "LABEL".to_string());
    settings.insert("skosType".to_string(), "ALT".to_string());
    settings.insert("bufferSize".to_string(), usize::MAX.to_string());

    let filter = factory().create_from_settings(&settings).unwrap();
    let tokens = expand(&filter, "weapons");
    assert_eq!(texts(&tokens), vec!["weapons", "arms", "weaponry", "waffen"]);
}

#[test]
fn test_stop_words_are_not_indexed() {
    let config = ExpansionConfig::new(vocabulary(), ExpansionType::Label)
        .with_skos_types(vec![SkosType::Alt]);
    let analyzer = SkosAnalyzer::from_config(&factory(), &config).unwrap();

    let mut index = SubjectIndex::default();
    index.add(&analyzer, 1, "The weapons");

    assert!(index.search("the").is_empty());
    assert_eq!(index.search("weapons"), vec![1]);
    assert_eq!(index.search("arms"), vec![1]);
}

//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::cli::args::{OutputFormat, SkosArgs};
use crate::config::SkosType;
use crate::error::Result;

/// Concepts found for a label.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConceptsResult {
    pub store: String,
    pub label: String,
    pub concepts: Vec<String>,
}

/// Values of one concept field.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldResult {
    pub store: String,
    pub uri: String,
    pub field: String,
    pub values: Vec<String>,
}

/// Alternative labels found for a label.
#[derive(Debug, Serialize, Deserialize)]
pub struct AltTermsResult {
    pub store: String,
    pub label: String,
    pub terms: Vec<String>,
}

/// One token of an analyzed text.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRow {
    pub text: String,
    pub position: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub synonym: bool,
    pub skos_type: Option<SkosType>,
}

impl From<&Token> for TokenRow {
    fn from(token: &Token) -> Self {
        TokenRow {
            text: token.text.clone(),
            position: token.position,
            start_offset: token.start_offset,
            end_offset: token.end_offset,
            synonym: token.is_synonym(),
            skos_type: token.skos_type(),
        }
    }
}

/// The token stream produced for a text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpansionResult {
    pub store: String,
    pub analyzer: String,
    pub text: String,
    pub tokens: Vec<TokenRow>,
}

/// Stores found in the store directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreList {
    pub directory: String,
    pub stores: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SkosArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SkosArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value.get("tokens").and_then(|t| t.as_array()) {
        Some(tokens) => output_tokens_human(tokens),
        None => output_generic_human(&value),
    }
    Ok(())
}

/// Output a token stream, one line per token, synonyms indented under the
/// token they were stacked on.
fn output_tokens_human(tokens: &[serde_json::Value]) {
    println!("{:>4}  {:<9}  term", "pos", "offsets");
    println!("────  ─────────  ────");
    for token in tokens {
        let text = token.get("text").and_then(|t| t.as_str()).unwrap_or_default();
        let position = token.get("position").and_then(|p| p.as_u64()).unwrap_or(0);
        let start = token.get("start_offset").and_then(|s| s.as_u64()).unwrap_or(0);
        let end = token.get("end_offset").and_then(|e| e.as_u64()).unwrap_or(0);
        let offsets = format!("{start}-{end}");

        if token.get("synonym").and_then(|s| s.as_bool()).unwrap_or(false) {
            let kind = token
                .get("skos_type")
                .and_then(|k| k.as_str())
                .unwrap_or("SYNONYM");
            println!("{position:>4}  {offsets:<9}    + {text} ({kind})");
        } else {
            println!("{position:>4}  {offsets:<9}  {text}");
        }
    }
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Array(items) if !items.is_empty() => {
                        println!("{key}:");
                        for item in items {
                            println!("  - {}", format_value(item));
                        }
                    }
                    _ => println!("{key}: {}", format_value(val)),
                }
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SkosArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::Array(arr) if arr.is_empty() => "(none)".to_string(),
        serde_json::Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        serde_json::Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("arms")), "arms");
        assert_eq!(format_value(&json!(3)), "3");
        assert_eq!(format_value(&json!(null)), "-");
        assert_eq!(format_value(&json!([])), "(none)");
        assert_eq!(format_value(&json!(["arms", "waffen"])), "arms, waffen");
    }

    #[test]
    fn test_token_row_marks_synonyms() {
        let original = Token::with_offsets("weapons", 0, 0, 7);
        let synonym = original.synonym("arms", SkosType::Alt);

        let row = TokenRow::from(&synonym);
        assert!(row.synonym);
        assert_eq!(row.skos_type, Some(SkosType::Alt));
        assert_eq!((row.start_offset, row.end_offset), (0, 7));
        assert!(!TokenRow::from(&original).synonym);
    }
}

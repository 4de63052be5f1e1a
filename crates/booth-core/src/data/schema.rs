//! JSON Schema validation for data documents.
//!
//! Each document kind is validated against its schema under `schema/`
//! before it is deserialized. Schemas are embedded at compile time and
//! compiled once per process.

use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

const REPORT_SCHEMA_JSON: &str = include_str!("../../../../schema/report.schema.json");
const FACT_CHECKS_SCHEMA_JSON: &str = include_str!("../../../../schema/fact_checks.schema.json");
const RULES_SCHEMA_JSON: &str = include_str!("../../../../schema/rules.schema.json");

type CompiledSchema = OnceLock<Result<jsonschema::Validator, String>>;

static REPORT_SCHEMA: CompiledSchema = OnceLock::new();
static FACT_CHECKS_SCHEMA: CompiledSchema = OnceLock::new();
static RULES_SCHEMA: CompiledSchema = OnceLock::new();

/// The document kinds that have a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Report,
    FactChecks,
    Rules,
}

impl DocumentKind {
    fn source(&self) -> &'static str {
        match self {
            DocumentKind::Report => REPORT_SCHEMA_JSON,
            DocumentKind::FactChecks => FACT_CHECKS_SCHEMA_JSON,
            DocumentKind::Rules => RULES_SCHEMA_JSON,
        }
    }

    fn cell(&self) -> &'static CompiledSchema {
        match self {
            DocumentKind::Report => &REPORT_SCHEMA,
            DocumentKind::FactChecks => &FACT_CHECKS_SCHEMA,
            DocumentKind::Rules => &RULES_SCHEMA,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Report => "report",
            DocumentKind::FactChecks => "fact-check database",
            DocumentKind::Rules => "rule table",
        };
        f.write_str(s)
    }
}

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load {kind} schema: {message}")]
    LoadError { kind: DocumentKind, message: String },
}

fn get_validator(kind: DocumentKind) -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = kind.cell().get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(kind.source()) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError {
            kind,
            message: e.clone(),
        }),
    }
}

/// Validate a document against the schema for its kind.
///
/// Returns every violation found, each as `"<message> at <pointer>"`.
pub fn validate_document(kind: DocumentKind, value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator(kind).map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a document without collecting messages.
pub fn is_valid_document(kind: DocumentKind, value: &serde_json::Value) -> bool {
    get_validator(kind)
        .map(|v| v.is_valid(value))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_report() -> serde_json::Value {
        json!({
            "metadata": {
                "title": "Test Report",
                "subtitle": "Test Subtitle",
                "date": "2025-01-01",
                "author": "Test Author"
            },
            "keyMetrics": {
                "populationGrowth": 1000,
                "populationGrowthPercent": 2.5,
                "medianHomePrice": 300000,
                "homePriceGrowth": 5.0,
                "consumerSpendingGrowth": 3.0
            },
            "sections": [
                {
                    "id": "test-section",
                    "title": "Test Section",
                    "tldr": "Test summary",
                    "content": ["Test content"]
                }
            ],
            "citations": [
                {
                    "id": 1,
                    "title": "Test Citation",
                    "url": "https://example.com",
                    "context": "Test context"
                }
            ]
        })
    }

    #[test]
    fn test_all_schemas_compile() {
        for kind in [DocumentKind::Report, DocumentKind::FactChecks, DocumentKind::Rules] {
            assert!(get_validator(kind).is_ok(), "{} schema failed to compile", kind);
        }
    }

    #[test]
    fn test_valid_report_passes() {
        assert!(validate_document(DocumentKind::Report, &minimal_report()).is_ok());
    }

    #[test]
    fn test_report_extra_metrics_allowed() {
        let mut report = minimal_report();
        report["keyMetrics"]["unemploymentRate"] = json!("3.4%");
        assert!(validate_document(DocumentKind::Report, &report).is_ok());
    }

    #[test]
    fn test_report_wrong_metric_type_fails() {
        let mut report = minimal_report();
        report["keyMetrics"]["populationGrowth"] = json!("not a number");
        let errors = validate_document(DocumentKind::Report, &report).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("populationGrowth")));
    }

    #[test]
    fn test_report_missing_metadata_fields_fails() {
        let mut report = minimal_report();
        report["metadata"] = json!({ "title": "Only title" });
        assert!(validate_document(DocumentKind::Report, &report).is_err());
    }

    #[test]
    fn test_report_bad_chart_type_fails() {
        let mut report = minimal_report();
        report["sections"][0]["charts"] = json!([
            { "type": "scatter", "title": "Prices", "data": [] }
        ]);
        assert!(validate_document(DocumentKind::Report, &report).is_err());
    }

    #[test]
    fn test_fact_check_database_passes() {
        let value = json!({
            "factChecks": {
                "test-fact": {
                    "claim": "Test claim",
                    "status": "verified",
                    "confidence": 95,
                    "explanation": "Test explanation",
                    "sources": [
                        { "title": "Source", "url": "https://example.com", "excerpt": "Excerpt" }
                    ]
                }
            }
        });
        assert!(validate_document(DocumentKind::FactChecks, &value).is_ok());
    }

    #[test]
    fn test_fact_check_unknown_status_fails() {
        let value = json!({
            "factChecks": {
                "test-fact": {
                    "claim": "Test claim",
                    "status": "disputed",
                    "confidence": 95,
                    "explanation": "Test explanation",
                    "sources": []
                }
            }
        });
        assert!(validate_document(DocumentKind::FactChecks, &value).is_err());
    }

    #[test]
    fn test_fact_check_confidence_out_of_range_fails() {
        let value = json!({
            "factChecks": {
                "test-fact": {
                    "claim": "Test claim",
                    "status": "verified",
                    "confidence": 150,
                    "explanation": "Test explanation",
                    "sources": []
                }
            }
        });
        assert!(validate_document(DocumentKind::FactChecks, &value).is_err());
    }

    #[test]
    fn test_fact_check_bad_url_fails() {
        let value = json!({
            "factChecks": {
                "test-fact": {
                    "claim": "Test claim",
                    "status": "verified",
                    "confidence": 90,
                    "explanation": "Test explanation",
                    "sources": [
                        { "title": "Source", "url": "not a url", "excerpt": "" }
                    ]
                }
            }
        });
        assert!(!is_valid_document(DocumentKind::FactChecks, &value));
    }

    #[test]
    fn test_rules_require_keywords() {
        let value = json!({
            "rules": [
                { "keywords": [], "factCheckId": "x", "priority": 3 }
            ]
        });
        assert!(validate_document(DocumentKind::Rules, &value).is_err());
    }

    #[test]
    fn test_rules_require_positive_priority() {
        let value = json!({
            "rules": [
                { "keywords": ["median"], "factCheckId": "x", "priority": 0 }
            ]
        });
        assert!(validate_document(DocumentKind::Rules, &value).is_err());
    }

    #[test]
    fn test_valid_rules_pass() {
        let value = json!({
            "rules": [
                { "keywords": ["$392,000"], "factCheckId": "home-price-johnson-city", "priority": 10 }
            ]
        });
        assert!(is_valid_document(DocumentKind::Rules, &value));
    }
}

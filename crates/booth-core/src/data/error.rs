//! Errors raised while loading data documents.

use thiserror::Error;

use super::schema::DocumentKind;

/// Errors that can occur when loading the report, fact-check or rule documents.
///
/// Any of these refuses the whole load; callers never see partially
/// shaped data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{kind} failed schema validation: {}", .errors.join("; "))]
    SchemaViolation {
        kind: DocumentKind,
        errors: Vec<String>,
    },

    #[error("{kind} validation failed: {message}")]
    ValidationError { kind: DocumentKind, message: String },

    #[error("Rule {rule_index} references unknown fact-check \"{fact_check_id}\"")]
    DanglingReference {
        rule_index: usize,
        fact_check_id: String,
    },
}

impl DataError {
    pub(crate) fn invalid(kind: DocumentKind, message: impl Into<String>) -> Self {
        DataError::ValidationError {
            kind,
            message: message.into(),
        }
    }
}

//! The fact-check table: record id → authored verdict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use super::error::DataError;
use super::schema::{validate_document, DocumentKind};
use crate::patterns::is_well_formed_url;
use crate::types::FactCheckRecord;

/// Immutable mapping from record id to fact-check record.
///
/// Iteration is ordered by id so reports built from it are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactCheckTable {
    #[serde(rename = "factChecks")]
    records: BTreeMap<String, FactCheckRecord>,
}

impl FactCheckTable {
    /// Build a table from already-typed records without validation.
    pub fn from_records(records: impl IntoIterator<Item = (String, FactCheckRecord)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Parse and validate a fact-check database from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate a fact-check database from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let table = Self::from_json(&contents)?;
        info!(path = %path.display(), records = table.len(), "loaded fact-check database");
        Ok(table)
    }

    /// Validate a JSON value against the schema, then type and check it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DataError> {
        validate_document(DocumentKind::FactChecks, &value).map_err(|errors| {
            DataError::SchemaViolation {
                kind: DocumentKind::FactChecks,
                errors,
            }
        })?;

        let table: FactCheckTable = serde_json::from_value(value)?;
        table.validate()?;
        Ok(table)
    }

    /// Structural checks the schema cannot express.
    fn validate(&self) -> Result<(), DataError> {
        let kind = DocumentKind::FactChecks;

        for (id, record) in &self.records {
            if record.confidence > 100 {
                return Err(DataError::invalid(
                    kind,
                    format!("\"{}\": confidence {} exceeds 100", id, record.confidence),
                ));
            }

            if record.explanation.trim().is_empty() {
                return Err(DataError::invalid(
                    kind,
                    format!("\"{}\": explanation is empty", id),
                ));
            }

            if record.sources.is_empty() && !record.status.is_unverified() {
                return Err(DataError::invalid(
                    kind,
                    format!("\"{}\": status {} requires at least one source", id, record.status),
                ));
            }

            for (index, source) in record.sources.iter().enumerate() {
                if source.title.trim().is_empty() {
                    return Err(DataError::invalid(
                        kind,
                        format!("\"{}\": source {} has no title", id, index + 1),
                    ));
                }
                if !is_well_formed_url(&source.url) {
                    return Err(DataError::invalid(
                        kind,
                        format!("\"{}\": source {} has malformed URL \"{}\"", id, index + 1, source.url),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FactCheckRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactCheckRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FactCheckStatus;

    const VALID_DATABASE: &str = r#"{
        "factChecks": {
            "home-price-johnson-city": {
                "claim": "Johnson City median home price reached $392,000",
                "status": "verified",
                "confidence": 92,
                "explanation": "Consistent with the regional MLS median sale price for the quarter.",
                "sources": [
                    {
                        "title": "Northeast Tennessee Association of Realtors",
                        "url": "https://www.netar.us/market-data",
                        "excerpt": "Median sale price: $392,000"
                    }
                ]
            },
            "regional-diversity": {
                "claim": "The regional economy is diversified",
                "status": "unverified",
                "confidence": 0,
                "explanation": "Qualitative statement awaiting sourcing.",
                "sources": []
            }
        }
    }"#;

    #[test]
    fn test_parse_valid_database() {
        let table = FactCheckTable::from_json(VALID_DATABASE).unwrap();
        assert_eq!(table.len(), 2);

        let record = table.get("home-price-johnson-city").unwrap();
        assert_eq!(record.status, FactCheckStatus::Verified);
        assert_eq!(record.confidence, 92);
        assert_eq!(record.sources[0].excerpt, "Median sale price: $392,000");
    }

    #[test]
    fn test_ids_are_ordered() {
        let table = FactCheckTable::from_json(VALID_DATABASE).unwrap();
        let ids: Vec<&str> = table.ids().collect();
        assert_eq!(ids, vec!["home-price-johnson-city", "regional-diversity"]);
    }

    #[test]
    fn test_missing_wrapper_rejected() {
        let result = FactCheckTable::from_json(r#"{"records": {}}"#);
        assert!(matches!(result, Err(DataError::SchemaViolation { .. })));
    }

    #[test]
    fn test_sources_required_unless_unverified() {
        let json = r#"{
            "factChecks": {
                "claim-without-sources": {
                    "claim": "Claim",
                    "status": "verified",
                    "confidence": 90,
                    "explanation": "Looks right.",
                    "sources": []
                }
            }
        }"#;
        let result = FactCheckTable::from_json(json);
        assert!(matches!(result, Err(DataError::ValidationError { .. })));
    }

    #[test]
    fn test_blank_explanation_rejected() {
        let json = r#"{
            "factChecks": {
                "blank": {
                    "claim": "Claim",
                    "status": "unverified",
                    "confidence": 0,
                    "explanation": "   ",
                    "sources": []
                }
            }
        }"#;
        assert!(FactCheckTable::from_json(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let result = FactCheckTable::from_json("{ not json");
        assert!(matches!(result, Err(DataError::JsonError(_))));
    }
}

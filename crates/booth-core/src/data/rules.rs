//! The rule table: keyword triggers pointing at fact-check records.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::error::DataError;
use super::fact_checks::FactCheckTable;
use super::schema::{validate_document, DocumentKind};
use crate::matcher::fold_keywords;
use crate::types::MatchRule;

/// A rule whose `factCheckId` has no record behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Position of the rule in the table
    pub rule_index: usize,
    pub fact_check_id: String,
}

/// Ordered, immutable list of match rules.
///
/// Order matters: on equal scores the earlier rule wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawRuleTable")]
pub struct RuleTable {
    rules: Vec<MatchRule>,

    /// Lower-cased keywords, parallel to `rules`
    #[serde(skip)]
    folded: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct RawRuleTable {
    rules: Vec<MatchRule>,
}

impl From<RawRuleTable> for RuleTable {
    fn from(raw: RawRuleTable) -> Self {
        Self::from_rules(raw.rules)
    }
}

impl RuleTable {
    /// Build a table from already-typed rules without validation.
    pub fn from_rules(rules: impl IntoIterator<Item = MatchRule>) -> Self {
        let rules: Vec<MatchRule> = rules.into_iter().collect();
        let folded = rules.iter().map(fold_keywords).collect();
        Self { rules, folded }
    }

    /// Parse and validate a rule table from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse and validate a rule table from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a rule table, choosing YAML or JSON by file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let table = if is_yaml {
            Self::from_yaml(&contents)?
        } else {
            Self::from_json(&contents)?
        };

        info!(path = %path.display(), rules = table.len(), "loaded rule table");
        Ok(table)
    }

    /// Validate a JSON value against the schema, then type and check it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DataError> {
        validate_document(DocumentKind::Rules, &value).map_err(|errors| {
            DataError::SchemaViolation {
                kind: DocumentKind::Rules,
                errors,
            }
        })?;

        let table: RuleTable = serde_json::from_value(value)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), DataError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.priority == 0 {
                return Err(DataError::invalid(
                    DocumentKind::Rules,
                    format!("rule {}: priority must be positive", index),
                ));
            }
            if rule.keywords.iter().any(|kw| kw.trim().is_empty()) {
                return Err(DataError::invalid(
                    DocumentKind::Rules,
                    format!("rule {} ({}): blank keyword", index, rule.fact_check_id),
                ));
            }
        }
        Ok(())
    }

    /// Rules whose record id is missing from `table`.
    pub fn dangling_references(&self, table: &FactCheckTable) -> Vec<DanglingReference> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !table.contains(&rule.fact_check_id))
            .map(|(rule_index, rule)| DanglingReference {
                rule_index,
                fact_check_id: rule.fact_check_id.clone(),
            })
            .collect()
    }

    /// Cross-check rule ids against the fact-check table.
    ///
    /// With `strict` the first dangling reference is an error; otherwise
    /// each one is logged and the table is accepted.
    pub fn check_references(&self, table: &FactCheckTable, strict: bool) -> Result<(), DataError> {
        let dangling = self.dangling_references(table);

        if strict {
            if let Some(first) = dangling.into_iter().next() {
                return Err(DataError::DanglingReference {
                    rule_index: first.rule_index,
                    fact_check_id: first.fact_check_id,
                });
            }
            return Ok(());
        }

        for reference in &dangling {
            warn!(
                rule_index = reference.rule_index,
                fact_check_id = %reference.fact_check_id,
                "rule references unknown fact-check; passages it matches will show as unverified"
            );
        }
        Ok(())
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Each rule with its lower-cased keywords, in table order.
    pub fn folded_rules(&self) -> impl Iterator<Item = (&MatchRule, &[String])> + '_ {
        self.rules
            .iter()
            .zip(self.folded.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FactCheckRecord, FactCheckStatus};

    const VALID_RULES: &str = r#"
rules:
  - keywords: ["$392,000"]
    factCheckId: "home-price-johnson-city"
    priority: 10
  - keywords: ["economic diversity", "diversified economy"]
    factCheckId: "regional-diversity"
    priority: 4
"#;

    fn table_with(ids: &[&str]) -> FactCheckTable {
        FactCheckTable::from_records(ids.iter().map(|id| {
            (
                id.to_string(),
                FactCheckRecord {
                    claim: "claim".to_string(),
                    status: FactCheckStatus::Unverified,
                    confidence: 0,
                    explanation: "explanation".to_string(),
                    sources: vec![],
                },
            )
        }))
    }

    #[test]
    fn test_parse_yaml_rules() {
        let table = RuleTable::from_yaml(VALID_RULES).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].fact_check_id, "home-price-johnson-city");
        assert_eq!(table.rules()[1].keywords.len(), 2);
    }

    #[test]
    fn test_keywords_folded_at_load() {
        let yaml = r#"
rules:
  - keywords: ["Median Home Price", "$392,000"]
    factCheckId: "home-price-johnson-city"
    priority: 10
"#;
        let table = RuleTable::from_yaml(yaml).unwrap();
        let (rule, folded) = table.folded_rules().next().unwrap();

        assert_eq!(rule.keywords[0], "Median Home Price");
        assert_eq!(folded, ["median home price", "$392,000"]);
        assert_eq!(table.folded_rules().count(), table.len());
    }

    #[test]
    fn test_parse_json_rules() {
        let json = r#"{"rules": [{"keywords": ["median income"], "factCheckId": "median-income", "priority": 8}]}"#;
        let table = RuleTable::from_json(json).unwrap();
        assert_eq!(table.rules()[0].priority, 8);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
rules:
  - keywords: ["median"]
    factCheckId: "x"
    priority: 3
    weight: 2
"#;
        let result = RuleTable::from_yaml(yaml);
        assert!(matches!(result, Err(DataError::SchemaViolation { .. })));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let yaml = r#"
rules:
  - keywords: ["  "]
    factCheckId: "x"
    priority: 3
"#;
        let result = RuleTable::from_yaml(yaml);
        assert!(matches!(result, Err(DataError::ValidationError { .. })));
    }

    #[test]
    fn test_dangling_references_listed() {
        let rules = RuleTable::from_yaml(VALID_RULES).unwrap();
        let table = table_with(&["home-price-johnson-city"]);

        let dangling = rules.dangling_references(&table);
        assert_eq!(
            dangling,
            vec![DanglingReference {
                rule_index: 1,
                fact_check_id: "regional-diversity".to_string(),
            }]
        );
    }

    #[test]
    fn test_lenient_reference_check_accepts() {
        let rules = RuleTable::from_yaml(VALID_RULES).unwrap();
        let table = table_with(&["home-price-johnson-city"]);

        assert!(rules.check_references(&table, false).is_ok());
    }

    #[test]
    fn test_strict_reference_check_rejects() {
        let rules = RuleTable::from_yaml(VALID_RULES).unwrap();
        let table = table_with(&["home-price-johnson-city"]);

        let result = rules.check_references(&table, true);
        assert!(matches!(
            result,
            Err(DataError::DanglingReference { rule_index: 1, .. })
        ));
    }

    #[test]
    fn test_strict_check_passes_when_complete() {
        let rules = RuleTable::from_yaml(VALID_RULES).unwrap();
        let table = table_with(&["home-price-johnson-city", "regional-diversity"]);

        assert!(rules.check_references(&table, true).is_ok());
    }
}

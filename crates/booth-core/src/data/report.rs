//! The report document: sections, SWOT lists, charts and citations.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use super::error::DataError;
use super::schema::{validate_document, DocumentKind};
use crate::types::{PassageLocation, SwotQuadrant};

lazy_static! {
    /// Inline citation markers such as "[3]"
    static ref CITATION_MARKER: Regex = Regex::new(r"\[(\d+)\]").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub title: String,
    pub subtitle: String,
    /// Free-form display date, e.g. "October 19, 2026"
    pub date: String,
    pub author: String,
}

/// Headline figures shown in the hero section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub population_growth: f64,
    pub population_growth_percent: f64,
    pub median_home_price: f64,
    pub home_price_growth: f64,
    pub consumer_spending_growth: f64,

    /// Metrics added by data refreshes (e.g. `unemploymentRate`)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl Swot {
    /// Quadrants in display order with their bullets.
    pub fn quadrants(&self) -> [(SwotQuadrant, &[String]); 4] {
        [
            (SwotQuadrant::Strengths, self.strengths.as_slice()),
            (SwotQuadrant::Weaknesses, self.weaknesses.as_slice()),
            (SwotQuadrant::Opportunities, self.opportunities.as_slice()),
            (SwotQuadrant::Threats, self.threats.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// One-line summary
    pub tldr: String,
    /// Paragraphs in display order
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<Chart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swot: Option<Swot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub context: String,
}

/// One unit of displayed text and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage<'a> {
    pub location: PassageLocation,
    pub text: &'a str,
}

/// The full report, loaded once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub key_metrics: KeyMetrics,
    pub sections: Vec<Section>,
    pub citations: Vec<Citation>,
}

impl ReportDocument {
    /// Parse and validate a report from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate a report from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let report = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            sections = report.sections.len(),
            citations = report.citations.len(),
            "loaded report"
        );
        Ok(report)
    }

    /// Validate a JSON value against the schema, then type and check it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DataError> {
        validate_document(DocumentKind::Report, &value).map_err(|errors| {
            DataError::SchemaViolation {
                kind: DocumentKind::Report,
                errors,
            }
        })?;

        let report: ReportDocument = serde_json::from_value(value)?;
        report.validate()?;
        Ok(report)
    }

    fn validate(&self) -> Result<(), DataError> {
        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(DataError::invalid(
                    DocumentKind::Report,
                    format!("Duplicate section ID: {}", section.id),
                ));
            }
        }

        let mut citation_ids = HashSet::new();
        for citation in &self.citations {
            if !citation_ids.insert(citation.id) {
                return Err(DataError::invalid(
                    DocumentKind::Report,
                    format!("Duplicate citation ID: {}", citation.id),
                ));
            }
        }

        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn citation(&self, id: u32) -> Option<&Citation> {
        self.citations.iter().find(|c| c.id == id)
    }

    /// Every passage the fact-checker looks at, in document order.
    ///
    /// Section paragraphs always; SWOT bullets only when `include_swot`.
    pub fn passages(&self, include_swot: bool) -> Vec<Passage<'_>> {
        let mut passages = Vec::new();

        for section in &self.sections {
            for (index, paragraph) in section.content.iter().enumerate() {
                passages.push(Passage {
                    location: PassageLocation::Paragraph {
                        section_id: section.id.clone(),
                        index,
                    },
                    text: paragraph,
                });
            }

            if !include_swot {
                continue;
            }
            if let Some(swot) = &section.swot {
                for (quadrant, bullets) in swot.quadrants() {
                    for (index, bullet) in bullets.iter().enumerate() {
                        passages.push(Passage {
                            location: PassageLocation::Swot {
                                section_id: section.id.clone(),
                                quadrant,
                                index,
                            },
                            text: bullet,
                        });
                    }
                }
            }
        }

        passages
    }

    /// Inline "[n]" markers whose citation id does not exist.
    pub fn unresolved_citation_markers(&self) -> Vec<(PassageLocation, u32)> {
        let mut unresolved = Vec::new();

        for passage in self.passages(true) {
            for caps in CITATION_MARKER.captures_iter(passage.text) {
                let Ok(id) = caps[1].parse::<u32>() else {
                    continue;
                };
                if self.citation(id).is_none() {
                    unresolved.push((passage.location.clone(), id));
                }
            }
        }

        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "metadata": {
            "title": "Tri-Cities Market Report",
            "subtitle": "Residential Real Estate",
            "date": "October 19, 2026",
            "author": "BOOTH Research Team"
        },
        "keyMetrics": {
            "populationGrowth": 12000,
            "populationGrowthPercent": 2.4,
            "medianHomePrice": 392000,
            "homePriceGrowth": 6.1,
            "consumerSpendingGrowth": 3.2,
            "unemploymentRate": "3.4%"
        },
        "sections": [
            {
                "id": "housing-market",
                "title": "Residential Real Estate",
                "tldr": "Prices keep climbing.",
                "content": [
                    "Johnson City's median home price reached $392,000 this quarter [1].",
                    "Inventory remains tight [7]."
                ],
                "charts": [
                    { "type": "line", "title": "Median price", "data": [{ "month": "Jan", "value": 380000 }] }
                ],
                "swot": {
                    "strengths": ["Low property taxes"],
                    "weaknesses": [],
                    "opportunities": ["Remote worker migration"],
                    "threats": ["Rising insurance premiums"]
                }
            }
        ],
        "citations": [
            { "id": 1, "title": "NETAR", "url": "https://www.netar.us", "context": "MLS data" }
        ]
    }"#;

    #[test]
    fn test_parse_report() {
        let report = ReportDocument::from_json(REPORT).unwrap();
        assert_eq!(report.metadata.author, "BOOTH Research Team");
        assert_eq!(report.key_metrics.median_home_price, 392000.0);
        assert_eq!(
            report.key_metrics.extra.get("unemploymentRate"),
            Some(&serde_json::json!("3.4%"))
        );
        let section = report.section("housing-market").unwrap();
        assert_eq!(section.charts.as_ref().unwrap()[0].chart_type, ChartType::Line);
    }

    #[test]
    fn test_passages_with_and_without_swot() {
        let report = ReportDocument::from_json(REPORT).unwrap();

        assert_eq!(report.passages(false).len(), 2);

        let all = report.passages(true);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].text, "Rising insurance premiums");
        assert_eq!(all[4].location.to_string(), "housing-market.swot.threats[0]");
    }

    #[test]
    fn test_unresolved_citation_markers() {
        let report = ReportDocument::from_json(REPORT).unwrap();
        let unresolved = report.unresolved_citation_markers();

        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].1, 7);
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(REPORT).unwrap();
        let section = value["sections"][0].clone();
        value["sections"].as_array_mut().unwrap().push(section);

        let result = ReportDocument::from_value(value);
        assert!(matches!(result, Err(DataError::ValidationError { .. })));
    }

    #[test]
    fn test_schema_violation_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(REPORT).unwrap();
        value["citations"][0]["url"] = serde_json::json!("not-a-url");

        let result = ReportDocument::from_value(value);
        assert!(matches!(result, Err(DataError::SchemaViolation { .. })));
    }
}

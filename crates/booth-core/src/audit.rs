//! Quality audit of fact-check data.
//!
//! Load-time validation refuses malformed documents outright. The audit
//! goes further and grades well-formed data:
//!
//! | Level | Meaning |
//! |-------|---------|
//! | **error** | The record cannot be shown as-is |
//! | **warning** | Something is missing or points nowhere |
//! | **suggestion** | The record is usable but looks weak |

use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::data::{FactCheckTable, ReportDocument, RuleTable};
use crate::patterns::is_well_formed_url;
use crate::types::FactCheckRecord;

/// Confidence below which a `verified` status looks suspicious.
pub const LOW_VERIFIED_CONFIDENCE: u8 = 50;

/// Confidence above which a record is expected to cite sources.
pub const HIGH_UNSOURCED_CONFIDENCE: u8 = 70;

/// Explanations shorter than this (in characters) get a suggestion.
pub const SHORT_EXPLANATION_CHARS: usize = 50;

/// Findings of an audit, grouped by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AuditReport {
    /// No errors. Warnings and suggestions do not invalidate.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }

    pub fn merge(&mut self, other: AuditReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
    }
}

/// Audit a single record.
pub fn audit_record(id: &str, record: &FactCheckRecord) -> AuditReport {
    let mut report = AuditReport::default();

    if record.claim.trim().is_empty() {
        report
            .errors
            .push(format!("Fact-check \"{}\": missing or empty claim", id));
    }

    if record.explanation.trim().is_empty() {
        report
            .errors
            .push(format!("Fact-check \"{}\": missing or empty explanation", id));
    }

    if record.confidence > 100 {
        report.errors.push(format!(
            "Fact-check \"{}\": confidence must be between 0 and 100 (got {})",
            id, record.confidence
        ));
    }

    for (index, source) in record.sources.iter().enumerate() {
        if source.title.trim().is_empty() {
            report.errors.push(format!(
                "Fact-check \"{}\": source {} missing title",
                id,
                index + 1
            ));
        }
        if !is_well_formed_url(&source.url) {
            report.errors.push(format!(
                "Fact-check \"{}\": source {} missing or invalid URL",
                id,
                index + 1
            ));
        }
        if source.excerpt.trim().is_empty() {
            report.warnings.push(format!(
                "Fact-check \"{}\": source {} missing excerpt",
                id,
                index + 1
            ));
        }
    }

    if record.status.is_verified() && record.confidence < LOW_VERIFIED_CONFIDENCE {
        report.suggestions.push(format!(
            "Fact-check \"{}\": low confidence ({}%) for verified status",
            id, record.confidence
        ));
    }

    if record.sources.is_empty() && record.confidence > HIGH_UNSOURCED_CONFIDENCE {
        report.suggestions.push(format!(
            "Fact-check \"{}\": high confidence ({}%) but no sources provided",
            id, record.confidence
        ));
    }

    if record.explanation.chars().count() < SHORT_EXPLANATION_CHARS {
        report.suggestions.push(format!(
            "Fact-check \"{}\": explanation is quite short, consider adding more detail",
            id
        ));
    }

    report
}

/// Audit every record in the table.
pub fn audit_table(table: &FactCheckTable) -> AuditReport {
    let mut report = AuditReport::default();
    for (id, record) in table.iter() {
        report.merge(audit_record(id, record));
    }
    report
}

/// Cross-check the rule table against the fact-check table.
pub fn audit_rules(rules: &RuleTable, table: &FactCheckTable) -> AuditReport {
    let mut report = AuditReport::default();

    for reference in rules.dangling_references(table) {
        report.warnings.push(format!(
            "Rule {}: references unknown fact-check \"{}\"",
            reference.rule_index, reference.fact_check_id
        ));
    }

    let referenced: HashSet<&str> = rules
        .rules()
        .iter()
        .map(|r| r.fact_check_id.as_str())
        .collect();
    for id in table.ids().filter(|id| !referenced.contains(id)) {
        report.suggestions.push(format!(
            "Fact-check \"{}\": no rule references it, so it is never shown",
            id
        ));
    }

    report
}

/// Check inline citation markers in the report.
pub fn audit_citations(document: &ReportDocument) -> AuditReport {
    let mut report = AuditReport::default();
    for (location, id) in document.unresolved_citation_markers() {
        report
            .warnings
            .push(format!("{}: citation [{}] does not exist", location, id));
    }
    report
}

/// Run every audit and log the outcome.
pub fn audit_all(document: &ReportDocument, rules: &RuleTable, table: &FactCheckTable) -> AuditReport {
    let mut report = audit_table(table);
    report.merge(audit_rules(rules, table));
    report.merge(audit_citations(document));

    for message in &report.errors {
        warn!(target: "booth::audit", "{}", message);
    }
    for message in &report.warnings {
        warn!(target: "booth::audit", "{}", message);
    }

    report
}

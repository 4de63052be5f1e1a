//! Fact-check coverage of a report.
//!
//! Walks every passage that carries a factual claim, runs the matcher on
//! it and records whether a real fact-check record backs it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::data::{FactCheckTable, ReportDocument, RuleTable};
use crate::matcher::ClaimMatcher;
use crate::patterns::contains_factual_claim;
use crate::types::PassageLocation;

/// Characters of passage text kept in a missing-coverage entry.
const EXCERPT_CHARS: usize = 100;

/// A factual passage with no fact-check behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFactCheck {
    pub location: PassageLocation,
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub total_claims: usize,
    pub fact_checked_claims: usize,
    /// Two decimals; 100 when there are no claims
    pub coverage_percentage: f64,
    pub missing: Vec<MissingFactCheck>,
    /// Records no passage resolved to, in id order
    pub unused_fact_checks: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Compute coverage of `report` by `rules` and `table`.
pub fn coverage(
    report: &ReportDocument,
    rules: &RuleTable,
    table: &FactCheckTable,
    include_swot: bool,
) -> CoverageReport {
    let matcher = ClaimMatcher::new();
    let mut total_claims = 0;
    let mut fact_checked_claims = 0;
    let mut missing = Vec::new();
    let mut used: BTreeSet<&str> = BTreeSet::new();

    for passage in report.passages(include_swot) {
        if !contains_factual_claim(passage.text) {
            continue;
        }
        total_claims += 1;

        match matcher.match_table(passage.text, rules) {
            Some(id) if table.contains(id) => {
                fact_checked_claims += 1;
                used.insert(id);
            }
            _ => missing.push(MissingFactCheck {
                location: passage.location,
                excerpt: excerpt(passage.text),
            }),
        }
    }

    let unused_fact_checks = table
        .ids()
        .filter(|id| !used.contains(id))
        .map(str::to_string)
        .collect();

    CoverageReport {
        total_claims,
        fact_checked_claims,
        coverage_percentage: percentage(fact_checked_claims, total_claims),
        missing,
        unused_fact_checks,
        generated_at: Utc::now(),
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut)
}

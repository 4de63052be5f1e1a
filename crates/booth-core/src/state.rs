//! Application state.
//!
//! Everything a consumer needs to fact-check the report, loaded once and
//! handed around explicitly. Nothing in here is mutated after construction,
//! so an `AppState` can be shared across threads behind an `Arc` without
//! locking.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::audit::{audit_all, AuditReport};
use crate::config::{AppConfig, ConfigError};
use crate::coverage::{coverage, CoverageReport};
use crate::data::{DataError, FactCheckTable, ReportDocument, RuleTable};
use crate::matcher::ClaimMatcher;
use crate::patterns::contains_factual_claim;
use crate::resolver::Resolver;
use crate::types::{ConfidenceBand, FactCheckResult, MatchResult, PassageLocation};

/// Errors that can occur while building application state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// A fact-check result together with how it was reached.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedPassage {
    pub location: PassageLocation,
    pub text: String,
    pub band: ConfidenceBand,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub result: FactCheckResult,
}

/// Loaded report, tables and configuration.
#[derive(Debug, Clone)]
pub struct AppState {
    config: AppConfig,
    report: ReportDocument,
    fact_checks: FactCheckTable,
    rules: RuleTable,
    matcher: ClaimMatcher,
    resolver: Resolver,
}

impl AppState {
    /// Load all three documents named in `config`.
    pub fn load(config: AppConfig) -> Result<Self, StateError> {
        let report = ReportDocument::from_json_file(&config.data.report)?;
        let fact_checks = FactCheckTable::from_json_file(&config.data.fact_checks)?;
        let rules = RuleTable::from_file(&config.data.rules)?;
        Self::from_parts(config, report, fact_checks, rules)
    }

    /// Build state from documents that are already loaded.
    ///
    /// Rule references are cross-checked here; whether a dangling
    /// reference is fatal depends on `fact_check.strict_references`.
    pub fn from_parts(
        config: AppConfig,
        report: ReportDocument,
        fact_checks: FactCheckTable,
        rules: RuleTable,
    ) -> Result<Self, StateError> {
        rules.check_references(&fact_checks, config.fact_check.strict_references)?;

        let resolver = Resolver::with_fallback(config.fact_check.fallback_explanation.clone());

        info!(
            sections = report.sections.len(),
            fact_checks = fact_checks.len(),
            rules = rules.len(),
            "application state ready"
        );

        Ok(Self {
            config,
            report,
            fact_checks,
            rules,
            matcher: ClaimMatcher::new(),
            resolver,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn report(&self) -> &ReportDocument {
        &self.report
    }

    pub fn fact_checks(&self) -> &FactCheckTable {
        &self.fact_checks
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Score a passage without resolving it.
    pub fn match_passage(&self, passage: &str) -> MatchResult {
        self.matcher.evaluate_table(passage, &self.rules)
    }

    /// Fact-check one passage.
    ///
    /// Never fails: unmatched passages and dangling references both come
    /// back as the `unverified` fallback.
    pub fn fact_check(&self, passage: &str) -> FactCheckResult {
        if !self.config.fact_check.enabled {
            return self.resolver.fallback();
        }
        let matched = self.match_passage(passage);
        self.resolver
            .resolve(matched.record_id.as_deref(), &self.fact_checks)
    }

    /// Confidence band of a result under the configured thresholds.
    pub fn band(&self, result: &FactCheckResult) -> ConfidenceBand {
        self.config
            .fact_check
            .confidence_thresholds
            .band(result.confidence)
    }

    /// Fact-check every passage of the report that carries a factual claim,
    /// in document order.
    pub fn fact_check_report(&self) -> Vec<CheckedPassage> {
        let include_swot = self.config.fact_check.include_swot;

        self.report
            .passages(include_swot)
            .into_iter()
            .filter(|p| contains_factual_claim(p.text))
            .map(|passage| {
                let match_result = if self.config.fact_check.enabled {
                    self.match_passage(passage.text)
                } else {
                    MatchResult::no_match()
                };
                let result = self
                    .resolver
                    .resolve(match_result.record_id.as_deref(), &self.fact_checks);
                debug!(location = %passage.location, status = %result.status, "checked passage");

                CheckedPassage {
                    band: self.band(&result),
                    location: passage.location,
                    text: passage.text.to_string(),
                    match_result,
                    result,
                }
            })
            .collect()
    }

    pub fn coverage(&self) -> CoverageReport {
        coverage(
            &self.report,
            &self.rules,
            &self.fact_checks,
            self.config.fact_check.include_swot,
        )
    }

    pub fn audit(&self) -> AuditReport {
        audit_all(&self.report, &self.rules, &self.fact_checks)
    }
}

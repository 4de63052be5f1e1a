//! # booth-core
//!
//! Deterministic fact-check matching for BOOTH market reports.
//!
//! Given a passage of report prose, this crate answers:
//! - Which prepared fact-check, if any, is this passage making?
//! - What verdict, confidence and sources go with it?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same passage and rules always select the same record
//! 2. **Total**: Matching never fails; unmatched text resolves to `unverified`
//! 3. **Validated inputs**: Documents are schema-checked before any matching
//! 4. **Shareable**: Loaded state is immutable and `Send + Sync`
//!
//! ## Example
//!
//! ```rust,ignore
//! use booth_core::{AppConfig, AppState};
//!
//! let config = AppConfig::from_yaml_file("booth.yaml")?;
//! let state = AppState::load(config)?;
//!
//! let result = state.fact_check("Johnson City's median home price reached $392,000");
//! println!("{} ({}%)", result.status, result.confidence);
//! ```

pub mod audit;
pub mod config;
pub mod coverage;
pub mod data;
pub mod matcher;
pub mod patterns;
pub mod resolver;
pub mod state;
pub mod types;

// Re-export main types at crate root
pub use audit::AuditReport;
pub use config::{AppConfig, ConfigError};
pub use coverage::CoverageReport;
pub use data::{DataError, FactCheckTable, ReportDocument, RuleTable};
pub use matcher::ClaimMatcher;
pub use resolver::Resolver;
pub use state::{AppState, CheckedPassage, StateError};
pub use types::{
    ConfidenceBand, FactCheckRecord, FactCheckResult, FactCheckStatus, MatchResult, MatchRule,
    PassageLocation, Source, SwotQuadrant,
};

/// Return the fact-check id of the rule that best matches `passage`.
///
/// This is the bare matching step; see [`fact_check`] for a displayable
/// result.
pub fn match_passage<'r>(passage: &str, rules: &'r [MatchRule]) -> Option<&'r str> {
    matcher::match_passage(passage, rules)
}

/// Match `passage` and resolve it against `table` with the default
/// fallback message.
pub fn fact_check(passage: &str, rules: &RuleTable, table: &FactCheckTable) -> FactCheckResult {
    let id = ClaimMatcher::new().match_table(passage, rules);
    Resolver::new().resolve(id, table)
}

//! Resolver: turns a match into something the presentation layer can show.
//!
//! The resolver applies a fixed policy:
//! 1. Matched id present in the table → the record, verbatim
//! 2. No match → the `unverified` fallback
//! 3. Matched id missing from the table → the `unverified` fallback, logged
//!
//! A missing record is a data defect to fix offline, never a render error.

use tracing::warn;

use crate::data::FactCheckTable;
use crate::types::FactCheckResult;

/// Explanation shown when a passage has no prepared fact-check.
pub const DEFAULT_FALLBACK_EXPLANATION: &str = "This statement has not yet been fact-checked. \
No verified sources are available for it at this time.";

/// Resolves matcher output against the fact-check table.
#[derive(Debug, Clone)]
pub struct Resolver {
    fallback_explanation: String,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_fallback(DEFAULT_FALLBACK_EXPLANATION)
    }

    /// Use a custom "not yet fact-checked" message.
    pub fn with_fallback(explanation: impl Into<String>) -> Self {
        Self {
            fallback_explanation: explanation.into(),
        }
    }

    /// Resolve a matched id (or the absence of one).
    pub fn resolve(&self, record_id: Option<&str>, table: &FactCheckTable) -> FactCheckResult {
        let Some(id) = record_id else {
            return self.fallback();
        };

        match table.get(id) {
            Some(record) => FactCheckResult::from_record(id, record),
            None => {
                warn!(record_id = id, "rule references a fact-check record that does not exist");
                self.fallback()
            }
        }
    }

    /// The synthetic result for unmatched passages.
    pub fn fallback(&self) -> FactCheckResult {
        FactCheckResult::unverified(self.fallback_explanation.clone())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

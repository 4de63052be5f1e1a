//! Data loading and validation.
//!
//! The report, the fact-check database and the rule table are structured
//! documents validated against JSON Schema at load time. A document that
//! fails validation is refused as a whole.

mod error;
mod fact_checks;
mod report;
mod rules;
mod schema;

pub use error::DataError;
pub use fact_checks::FactCheckTable;
pub use report::{
    Chart, ChartType, Citation, KeyMetrics, Passage, ReportDocument, ReportMetadata, Section, Swot,
};
pub use rules::{DanglingReference, RuleTable};
pub use schema::{is_valid_document, validate_document, DocumentKind, SchemaError};

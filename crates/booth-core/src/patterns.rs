//! Shared detection patterns.
//!
//! Regexes used to spot factual claims in report prose and to sanity-check
//! source URLs. Used by the coverage walk, the per-paragraph fact-check
//! report and the record audit.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // =========================================================================
    // FACTUAL CLAIM PATTERNS
    // =========================================================================

    /// Percentages, whole or decimal ("12%", "3.5%")
    pub static ref PERCENT_PATTERN: Regex = Regex::new(
        r"\d+(?:\.\d+)?%"
    ).unwrap();

    /// Dollar amounts ("$392,000", "$1,500")
    pub static ref DOLLAR_PATTERN: Regex = Regex::new(
        r"\$[\d,]+"
    ).unwrap();

    /// Comma-grouped numbers ("1,200", "512,000")
    pub static ref GROUPED_NUMBER_PATTERN: Regex = Regex::new(
        r"\d+,\d+"
    ).unwrap();

    /// Statistical vocabulary that signals a checkable claim
    pub static ref STATISTIC_KEYWORDS: Vec<&'static str> = vec![
        "median", "average", "unemployment rate", "population", "growth",
        "employees", "graduation rate", "crime rate", "hospital", "network",
        "spending", "income", "age", "premiums", "appreciation", "forecast",
    ];

    // =========================================================================
    // SOURCE PATTERNS
    // =========================================================================

    /// Absolute http(s) URL with a host
    pub static ref URL_PATTERN: Regex = Regex::new(
        r"^https?://[^\s/$.?#][^\s]*$"
    ).unwrap();
}

/// Check if text contains a percentage.
pub fn contains_percentage(text: &str) -> bool {
    PERCENT_PATTERN.is_match(text)
}

/// Check if text contains a dollar amount.
pub fn contains_dollar_amount(text: &str) -> bool {
    DOLLAR_PATTERN.is_match(text)
}

/// Check if text contains a comma-grouped number.
pub fn contains_grouped_number(text: &str) -> bool {
    GROUPED_NUMBER_PATTERN.is_match(text)
}

/// Check if text mentions any statistical keyword (case-insensitive substring).
pub fn contains_statistic_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    STATISTIC_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Check if text carries something worth fact-checking.
pub fn contains_factual_claim(text: &str) -> bool {
    contains_percentage(text)
        || contains_dollar_amount(text)
        || contains_grouped_number(text)
        || contains_statistic_keyword(text)
}

/// Check if a source URL is well formed.
pub fn is_well_formed_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

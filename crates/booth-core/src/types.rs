//! Core types shared across the fact-check engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict attached to a fact-check record.
///
/// The set is closed; anything else in a data file is a load error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactCheckStatus {
    Verified,
    PartiallyVerified,
    NeedsVerification,
    NeedsContext,
    NeedsClarification,
    NeedsCorrection,
    Inaccurate,
    Unverified,
}

impl FactCheckStatus {
    /// All statuses, in severity order from best to worst.
    pub const ALL: [FactCheckStatus; 8] = [
        FactCheckStatus::Verified,
        FactCheckStatus::PartiallyVerified,
        FactCheckStatus::NeedsVerification,
        FactCheckStatus::NeedsContext,
        FactCheckStatus::NeedsClarification,
        FactCheckStatus::NeedsCorrection,
        FactCheckStatus::Inaccurate,
        FactCheckStatus::Unverified,
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactCheckStatus::Verified => "verified",
            FactCheckStatus::PartiallyVerified => "partially-verified",
            FactCheckStatus::NeedsVerification => "needs-verification",
            FactCheckStatus::NeedsContext => "needs-context",
            FactCheckStatus::NeedsClarification => "needs-clarification",
            FactCheckStatus::NeedsCorrection => "needs-correction",
            FactCheckStatus::Inaccurate => "inaccurate",
            FactCheckStatus::Unverified => "unverified",
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, FactCheckStatus::Verified)
    }

    pub fn is_unverified(&self) -> bool {
        matches!(self, FactCheckStatus::Unverified)
    }

    /// Statuses that call the claim itself into question.
    pub fn is_disputed(&self) -> bool {
        matches!(
            self,
            FactCheckStatus::NeedsCorrection | FactCheckStatus::Inaccurate
        )
    }
}

impl fmt::Display for FactCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cited source backing a fact-check verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub excerpt: String,
}

/// The authored verdict and evidence for one claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactCheckRecord {
    /// The claim as it was authored
    pub claim: String,

    pub status: FactCheckStatus,

    /// 0-100
    pub confidence: u8,

    pub explanation: String,

    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Associates trigger phrases with a fact-check record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRule {
    /// Literal phrases, matched case-insensitively as substrings
    pub keywords: Vec<String>,

    /// Key into the fact-check table
    #[serde(rename = "factCheckId")]
    pub fact_check_id: String,

    /// Higher means more specific
    pub priority: u32,
}

impl MatchRule {
    pub fn new(
        keywords: impl IntoIterator<Item = impl Into<String>>,
        fact_check_id: impl Into<String>,
        priority: u32,
    ) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            fact_check_id: fact_check_id.into(),
            priority,
        }
    }
}

/// Outcome of scoring a passage against the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Winning rule's fact-check id, if any rule fired
    pub record_id: Option<String>,

    pub score: u32,

    /// Keywords of the winning rule found in the passage, in rule order
    pub matched_keywords: Vec<String>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.record_id.is_some()
    }
}

/// What the presentation layer renders for one passage.
///
/// The shape is identical for resolved records and the fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactCheckResult {
    /// Record that produced this result; `None` for the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    pub status: FactCheckStatus,

    pub confidence: u8,

    pub explanation: String,

    pub sources: Vec<Source>,
}

impl FactCheckResult {
    /// The "not yet fact-checked" result.
    pub fn unverified(explanation: impl Into<String>) -> Self {
        Self {
            record_id: None,
            status: FactCheckStatus::Unverified,
            confidence: 0,
            explanation: explanation.into(),
            sources: Vec::new(),
        }
    }

    pub fn from_record(id: impl Into<String>, record: &FactCheckRecord) -> Self {
        Self {
            record_id: Some(id.into()),
            status: record.status,
            confidence: record.confidence,
            explanation: record.explanation.clone(),
            sources: record.sources.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.record_id.is_none()
    }
}

/// Qualitative band of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Minimal,
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceBand::Minimal => "minimal",
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        };
        f.write_str(s)
    }
}

/// Where a passage sits inside the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassageLocation {
    Paragraph {
        section_id: String,
        index: usize,
    },
    Swot {
        section_id: String,
        quadrant: SwotQuadrant,
        index: usize,
    },
}

impl PassageLocation {
    pub fn section_id(&self) -> &str {
        match self {
            PassageLocation::Paragraph { section_id, .. }
            | PassageLocation::Swot { section_id, .. } => section_id,
        }
    }
}

impl fmt::Display for PassageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassageLocation::Paragraph { section_id, index } => {
                write!(f, "{}.content[{}]", section_id, index)
            }
            PassageLocation::Swot {
                section_id,
                quadrant,
                index,
            } => write!(f, "{}.swot.{}[{}]", section_id, quadrant, index),
        }
    }
}

/// One quadrant of a SWOT analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwotQuadrant {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

impl fmt::Display for SwotQuadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwotQuadrant::Strengths => "strengths",
            SwotQuadrant::Weaknesses => "weaknesses",
            SwotQuadrant::Opportunities => "opportunities",
            SwotQuadrant::Threats => "threats",
        };
        f.write_str(s)
    }
}

//! Claim Matcher
//!
//! Picks the single fact-check record whose rule best matches a passage.
//!
//! ## Scoring
//!
//! | Step | Rule |
//! |------|------|
//! | hit  | keyword is a substring of the lower-cased passage |
//! | `k`  | number of the rule's keywords that hit |
//! | score | `priority * k + 2 * (k - 1)` when `k >= 1` |
//! | winner | strictly greatest score; ties keep the earlier rule |
//!
//! Matching is substring containment, not word-boundary matching, so
//! `"age"` also fires inside `"average"`. Report prose paraphrases claims
//! inconsistently between revisions and recall matters more than precision
//! here. Priorities let an exact figure outrank a generic phrase.
//!
//! The matcher is pure and total: no I/O, no errors, no hidden state.

use tracing::debug;

use crate::data::RuleTable;
use crate::types::{MatchResult, MatchRule};

/// Bonus added for every matched keyword beyond the first.
pub const EXTRA_KEYWORD_BONUS: u32 = 2;

/// Stateless claim matcher.
///
/// The `*_table` methods use the keywords a [`RuleTable`] lower-cased at
/// load; the slice methods fold keywords on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimMatcher;

struct Candidate<'r> {
    rule: &'r MatchRule,
    score: u32,
    hits: Vec<&'r str>,
}

impl ClaimMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Return the fact-check id of the best matching rule, or `None`.
    pub fn match_passage<'r>(&self, passage: &str, rules: &'r [MatchRule]) -> Option<&'r str> {
        best_candidate(passage, fold_slice(rules)).map(|c| c.rule.fact_check_id.as_str())
    }

    /// Like [`match_passage`](Self::match_passage) but keeps the score and
    /// the keywords that fired.
    pub fn evaluate(&self, passage: &str, rules: &[MatchRule]) -> MatchResult {
        into_result(best_candidate(passage, fold_slice(rules)))
    }

    /// [`match_passage`](Self::match_passage) against a loaded table.
    pub fn match_table<'r>(&self, passage: &str, table: &'r RuleTable) -> Option<&'r str> {
        best_candidate(passage, table.folded_rules()).map(|c| c.rule.fact_check_id.as_str())
    }

    /// [`evaluate`](Self::evaluate) against a loaded table.
    pub fn evaluate_table(&self, passage: &str, table: &RuleTable) -> MatchResult {
        into_result(best_candidate(passage, table.folded_rules()))
    }
}

fn into_result(candidate: Option<Candidate<'_>>) -> MatchResult {
    match candidate {
        Some(candidate) => {
            debug!(
                record_id = %candidate.rule.fact_check_id,
                score = candidate.score,
                hits = candidate.hits.len(),
                "passage matched"
            );
            MatchResult {
                record_id: Some(candidate.rule.fact_check_id.clone()),
                score: candidate.score,
                matched_keywords: candidate.hits.into_iter().map(str::to_string).collect(),
            }
        }
        None => {
            debug!("passage matched no rule");
            MatchResult::no_match()
        }
    }
}

/// Lower-cased keywords of `rule`, parallel to `rule.keywords`.
pub fn fold_keywords(rule: &MatchRule) -> Vec<String> {
    rule.keywords.iter().map(|kw| kw.to_lowercase()).collect()
}

fn fold_slice<'r>(rules: &'r [MatchRule]) -> impl Iterator<Item = (&'r MatchRule, Vec<String>)> + 'r {
    rules.iter().map(|rule| (rule, fold_keywords(rule)))
}

/// Score for a rule with `hits` matched keywords. Zero hits scores nothing.
pub fn rule_score(priority: u32, hits: usize) -> Option<u32> {
    if hits == 0 {
        return None;
    }
    let k = u32::try_from(hits).unwrap_or(u32::MAX);
    Some(
        priority
            .saturating_mul(k)
            .saturating_add(EXTRA_KEYWORD_BONUS.saturating_mul(k - 1)),
    )
}

/// Keywords of `rule` contained in an already lower-cased passage.
///
/// `folded` holds the lower-cased keywords; hits keep their original casing.
fn keyword_hits<'r>(lower_passage: &str, rule: &'r MatchRule, folded: &[String]) -> Vec<&'r str> {
    rule.keywords
        .iter()
        .zip(folded)
        .filter(|(_, needle)| {
            // An empty needle would match every passage.
            !needle.trim().is_empty() && lower_passage.contains(needle.as_str())
        })
        .map(|(kw, _)| kw.as_str())
        .collect()
}

fn best_candidate<'r, F>(
    passage: &str,
    rules: impl IntoIterator<Item = (&'r MatchRule, F)>,
) -> Option<Candidate<'r>>
where
    F: AsRef<[String]>,
{
    let lower = passage.to_lowercase();
    let mut best: Option<Candidate<'r>> = None;

    for (rule, folded) in rules {
        let hits = keyword_hits(&lower, rule, folded.as_ref());
        let Some(score) = rule_score(rule.priority, hits.len()) else {
            continue;
        };

        let beats_best = match &best {
            Some(current) => score > current.score,
            None => true,
        };
        if beats_best {
            best = Some(Candidate { rule, score, hits });
        }
    }

    best
}

/// Match a passage against a rule table with the default matcher.
pub fn match_passage<'r>(passage: &str, rules: &'r [MatchRule]) -> Option<&'r str> {
    ClaimMatcher::new().match_passage(passage, rules)
}

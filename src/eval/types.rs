// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Evaluation data model: what goes into a comparison and what comes out.
//!
//! Everything here serializes with the field names consumers of the JSON report
//! expect (`relevance_score`, `total_count`, `detailed_results`, ...). Backend
//! wire formats never appear here. Those stay inside the adapters in `backend`.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// QUERY SUITE
// =============================================================================

/// How a suite query is expected to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Literal keywords the baseline should find too
    ExactMatch,
    /// Natural-language phrasing where semantic search should shine
    Semantic,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::ExactMatch => "exact_match",
            QueryKind::Semantic => "semantic",
        }
    }
}

fn default_min_results() -> usize {
    1
}

/// One entry of the query suite.
///
/// Fields default on deserialization so a suite file with one bad entry still
/// loads; the bad entry fails `validate` and gets skipped at run time. Entries
/// that do not decode at all go through [`parse_suite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    /// Advisory only: recorded in the report, never fails a query
    #[serde(default = "default_min_results")]
    pub expected_min_results: usize,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<QueryKind>,
    /// Decode error of a suite entry that could not be read
    #[serde(skip)]
    rejected: Option<String>,
}

impl QuerySpec {
    pub fn new<I, S>(query: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            expected_keywords: keywords.into_iter().map(Into::into).collect(),
            expected_min_results: default_min_results(),
            kind: None,
            rejected: None,
        }
    }

    fn rejected(query: String, reason: String) -> Self {
        Self {
            rejected: Some(reason),
            ..Self::new(query, Vec::<String>::new())
        }
    }

    pub fn with_kind(mut self, kind: QueryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Check the spec can be evaluated and build its relevance oracle.
    pub fn validate(&self) -> Result<KeywordOracle> {
        if let Some(reason) = &self.rejected {
            return Err(Error::InvalidQuerySpec(reason.clone()));
        }
        if self.query.trim().is_empty() {
            return Err(Error::InvalidQuerySpec("blank query".to_string()));
        }
        KeywordOracle::new(self.expected_keywords.as_slice()).ok_or_else(|| {
            Error::InvalidQuerySpec(format!("query '{}' has no expected keywords", self.query))
        })
    }
}

/// Decode a JSON array of query specs one entry at a time.
///
/// An entry with wrong-typed fields becomes a spec that fails `validate`
/// with the decode error, so the run skips it and keeps the rest. Only input
/// that is not a JSON array fails the whole load.
pub fn parse_suite(json: &str) -> Result<Vec<QuerySpec>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(decode_entries(entries))
}

/// `deserialize_with` hook for suites embedded in a config file.
pub(crate) fn deserialize_suite<'de, D>(deserializer: D) -> std::result::Result<Vec<QuerySpec>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer).map(decode_entries)
}

fn decode_entries(entries: Vec<serde_json::Value>) -> Vec<QuerySpec> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let query = entry
                .get("query")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string();
            serde_json::from_value(entry).unwrap_or_else(|err| {
                tracing::warn!(index, query = %query, error = %err, "undecodable suite entry");
                QuerySpec::rejected(query, format!("entry {}: {}", index, err))
            })
        })
        .collect()
}

/// Lowercased, de-duplicated, non-empty keyword set used as the relevance oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOracle {
    keywords: Vec<String>,
}

impl KeywordOracle {
    /// Returns `None` when no non-blank keyword remains.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Option<Self> {
        let mut out: Vec<String> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !out.contains(&kw) {
                out.push(kw);
            }
        }
        (!out.is_empty()).then_some(Self { keywords: out })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the oracle holds no keywords. `new` never returns such an oracle.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

// =============================================================================
// SEARCH OUTCOMES
// =============================================================================

/// Which side of the comparison an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Baseline,
    Candidate,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Baseline => write!(f, "baseline"),
            Method::Candidate => write!(f, "candidate"),
        }
    }
}

/// A backend hit after normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Description, content or excerpt, whatever the backend called it
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Title and description joined by a space, lowercased. This is the text the
    /// relevance oracle searches.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// What one backend returned for one query, and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodOutcome {
    pub query: String,
    pub results: Vec<ResultItem>,
    /// Wall-clock seconds around the call, failures included
    pub response_time: f64,
    /// Backend-reported count; may exceed `results.len()`
    pub total_count: usize,
    pub method: Method,
    /// Set only when the call failed and the outcome was degraded to empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MethodOutcome {
    /// Empty outcome for a failed call. Same shape as a genuine zero-hit search.
    pub fn degraded(query: &str, method: Method, response_time: f64, error: &Error) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            response_time,
            total_count: 0,
            method,
            error: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

// =============================================================================
// METRICS
// =============================================================================

/// Quality and latency figures for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub relevance_score: f64,
    pub precision: f64,
    pub recall: f64,
    pub response_time: f64,
    pub user_satisfaction: f64,
}

/// Metrics for both sides of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodMetrics {
    pub baseline: Metrics,
    pub candidate: Metrics,
}

/// A dimension along which the candidate can improve on the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Precision,
    Recall,
    Relevance,
    Satisfaction,
    Speed,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Precision,
        Dimension::Recall,
        Dimension::Relevance,
        Dimension::Satisfaction,
        Dimension::Speed,
    ];
}

/// Candidate-minus-baseline deltas. `response_time` is baseline minus candidate,
/// so positive always means the candidate did better.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Improvement {
    pub precision: f64,
    pub recall: f64,
    pub relevance: f64,
    pub user_satisfaction: f64,
    pub response_time: f64,
}

impl Improvement {
    pub fn between(baseline: &Metrics, candidate: &Metrics) -> Self {
        Self {
            precision: candidate.precision - baseline.precision,
            recall: candidate.recall - baseline.recall,
            relevance: candidate.relevance_score - baseline.relevance_score,
            user_satisfaction: candidate.user_satisfaction - baseline.user_satisfaction,
            response_time: baseline.response_time - candidate.response_time,
        }
    }

    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Precision => self.precision,
            Dimension::Recall => self.recall,
            Dimension::Relevance => self.relevance,
            Dimension::Satisfaction => self.user_satisfaction,
            Dimension::Speed => self.response_time,
        }
    }
}

/// Whether each side reached the suite's advisory `expected_min_results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinResultsMet {
    pub baseline: bool,
    pub candidate: bool,
}

/// Everything known about one query after both searches ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub query: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<QueryKind>,
    pub baseline: MethodOutcome,
    pub candidate: MethodOutcome,
    pub metrics: MethodMetrics,
    pub improvement: Improvement,
    pub min_results_met: MinResultsMet,
}

// =============================================================================
// REPORT
// =============================================================================

/// Mean improvement per dimension across completed queries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_tests: usize,
    pub precision_improvement: f64,
    pub recall_improvement: f64,
    pub relevance_improvement: f64,
    pub satisfaction_improvement: f64,
    pub response_time_improvement: f64,
}

/// "k/n" tallies of queries where a dimension strictly improved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Improvements {
    pub precision: String,
    pub recall: String,
    pub relevance: String,
    pub satisfaction: String,
    pub speed: String,
}

/// A suite entry that was not evaluated, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedQuery {
    pub query: String,
    pub reason: String,
}

/// The result of an evaluation run. Built once by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub improvements: Improvements,
    /// Mean metrics per side across completed queries
    pub averages: MethodMetrics,
    /// Summary restricted to each query type present in the suite
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_type: BTreeMap<String, Summary>,
    pub detailed_results: Vec<ComparisonRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedQuery>,
}

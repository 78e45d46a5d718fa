// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyword-oracle metrics for a single search outcome.
//!
//! There are no relevance judgments here, only a list of keywords a good answer
//! should mention. Every number below is a proxy built on that:
//!
//! | Metric            | Formula                                        |
//! |-------------------|------------------------------------------------|
//! | relevance         | mean over hits of (keywords found / keywords)  |
//! | precision         | `min(relevance, 1)`                            |
//! | recall            | `min(total_count / R, 1)`                      |
//! | user satisfaction | `max(0, precision - response_time / T)`        |
//!
//! # Recall is an approximation
//!
//! Recall would need the true number of relevant documents for the query. We
//! don't have it, so `R` (`assumed_relevant`) stands in for it: a backend that
//! reports `R` or more hits gets full recall regardless of what the hits are.
//! Read it as "did the backend return a healthy amount", not as IR recall.
//!
//! `T` (`time_penalty_secs`) turns latency into a penalty on the precision
//! scale: every `T` seconds of waiting costs one full point of satisfaction.

use super::types::{KeywordOracle, MethodOutcome, Metrics};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default assumed number of relevant documents per query.
pub const DEFAULT_ASSUMED_RELEVANT: f64 = 10.0;

/// Default seconds of latency that cost one point of satisfaction.
pub const DEFAULT_TIME_PENALTY_SECS: f64 = 10.0;

/// Tuning knobs for the proxy metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// `R` in the recall proxy
    pub assumed_relevant: f64,
    /// `T` in the satisfaction penalty
    pub time_penalty_secs: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            assumed_relevant: DEFAULT_ASSUMED_RELEVANT,
            time_penalty_secs: DEFAULT_TIME_PENALTY_SECS,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.assumed_relevant.is_finite() && self.assumed_relevant > 0.0) {
            return Err(Error::Config(format!(
                "metrics.assumed_relevant must be positive, got {}",
                self.assumed_relevant
            )));
        }
        if !(self.time_penalty_secs.is_finite() && self.time_penalty_secs > 0.0) {
            return Err(Error::Config(format!(
                "metrics.time_penalty_secs must be positive, got {}",
                self.time_penalty_secs
            )));
        }
        Ok(())
    }
}

/// Fraction of oracle keywords present in each hit, averaged over hits.
///
/// Zero hits means zero relevance.
pub fn relevance(outcome: &MethodOutcome, oracle: &KeywordOracle) -> f64 {
    if outcome.results.is_empty() {
        return 0.0;
    }

    let keywords = oracle.keywords();
    let total: f64 = outcome
        .results
        .iter()
        .map(|item| {
            let text = item.searchable_text();
            let found = keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
            found as f64 / keywords.len() as f64
        })
        .sum();

    total / outcome.results.len() as f64
}

/// Compute all metrics for one outcome.
pub fn score(outcome: &MethodOutcome, oracle: &KeywordOracle, config: &MetricsConfig) -> Metrics {
    let relevance_score = relevance(outcome, oracle);
    let precision = relevance_score.min(1.0);
    let recall = (outcome.total_count as f64 / config.assumed_relevant).min(1.0);
    let user_satisfaction =
        (precision - outcome.response_time / config.time_penalty_secs).max(0.0);

    Metrics {
        relevance_score,
        precision,
        recall,
        response_time: outcome.response_time,
        user_satisfaction,
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suite evaluation: run every query through both backends and fold the
//! comparisons into a report.
//!
//! Queries run one after another. Per query:
//!
//! 1. Validate the spec. A bad spec is skipped and listed in the report.
//! 2. Dual search via `runner::compare`.
//! 3. Score both outcomes against the spec's keywords.
//! 4. Append a `ComparisonRecord`.
//!
//! The cancel flag is checked before each query, never during one. A cancelled
//! run still produces a report over whatever finished.

use super::backend::{SearchBackend, SearchParams};
use super::metrics::{self, MetricsConfig};
use super::runner;
use super::types::{
    ComparisonRecord, Dimension, Improvement, Improvements, KeywordOracle, MethodMetrics,
    Metrics, MinResultsMet, QuerySpec, Report, SkippedQuery, Summary,
};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything an evaluation needs besides the queries and the backends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalOptions {
    pub params: SearchParams,
    pub metrics: MetricsConfig,
}

/// Shared stop signal. Clones point at the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress events emitted while a suite runs. `index` is zero-based.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Started {
        index: usize,
        total: usize,
        query: &'a str,
    },
    Completed {
        index: usize,
        total: usize,
        record: &'a ComparisonRecord,
    },
    Skipped {
        index: usize,
        total: usize,
        query: &'a str,
        reason: &'a str,
    },
}

/// Evaluate a query suite with no cancellation and no progress reporting.
pub async fn evaluate<B, C>(
    queries: &[QuerySpec],
    baseline: &B,
    candidate: &C,
    options: &EvalOptions,
) -> Result<Report>
where
    B: SearchBackend,
    C: SearchBackend,
{
    evaluate_with(queries, baseline, candidate, options, &CancelFlag::new(), |_| {}).await
}

/// Evaluate a query suite, reporting progress to `observer` and stopping early
/// once `cancel` is set.
///
/// Fails with `NoResults` when no query completed, whether because every spec
/// was invalid, the suite was empty, or the run was cancelled up front.
pub async fn evaluate_with<B, C, F>(
    queries: &[QuerySpec],
    baseline: &B,
    candidate: &C,
    options: &EvalOptions,
    cancel: &CancelFlag,
    mut observer: F,
) -> Result<Report>
where
    B: SearchBackend,
    C: SearchBackend,
    F: FnMut(Progress<'_>),
{
    let total = queries.len();
    let mut records = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (index, spec) in queries.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::warn!(
                completed = records.len(),
                remaining = total - index,
                "evaluation cancelled"
            );
            skipped.extend(queries[index..].iter().map(|s| SkippedQuery {
                query: s.query.clone(),
                reason: "run cancelled".to_string(),
            }));
            break;
        }

        let oracle = match spec.validate() {
            Ok(oracle) => oracle,
            Err(err) => {
                tracing::warn!(index, query = %spec.query, error = %err, "skipping query");
                let reason = err.to_string();
                observer(Progress::Skipped {
                    index,
                    total,
                    query: &spec.query,
                    reason: &reason,
                });
                skipped.push(SkippedQuery {
                    query: spec.query.clone(),
                    reason,
                });
                continue;
            }
        };

        observer(Progress::Started {
            index,
            total,
            query: &spec.query,
        });

        let record = run_comparison(spec, &oracle, baseline, candidate, options).await;

        tracing::info!(
            index,
            query = %record.query,
            precision_delta = record.improvement.precision,
            speed_delta = record.improvement.response_time,
            "query completed"
        );

        observer(Progress::Completed {
            index,
            total,
            record: &record,
        });
        records.push(record);
    }

    Report::build(records, skipped)
}

/// Run one validated spec through both backends and score the outcomes.
pub async fn run_comparison<B, C>(
    spec: &QuerySpec,
    oracle: &KeywordOracle,
    baseline: &B,
    candidate: &C,
    options: &EvalOptions,
) -> ComparisonRecord
where
    B: SearchBackend,
    C: SearchBackend,
{
    let (baseline_outcome, candidate_outcome) =
        runner::compare(&spec.query, baseline, candidate, &options.params).await;

    let baseline_metrics = metrics::score(&baseline_outcome, oracle, &options.metrics);
    let candidate_metrics = metrics::score(&candidate_outcome, oracle, &options.metrics);

    ComparisonRecord {
        query: spec.query.clone(),
        kind: spec.kind,
        min_results_met: MinResultsMet {
            baseline: baseline_outcome.results.len() >= spec.expected_min_results,
            candidate: candidate_outcome.results.len() >= spec.expected_min_results,
        },
        improvement: Improvement::between(&baseline_metrics, &candidate_metrics),
        metrics: MethodMetrics {
            baseline: baseline_metrics,
            candidate: candidate_metrics,
        },
        baseline: baseline_outcome,
        candidate: candidate_outcome,
    }
}

impl Report {
    /// Fold completed records into a report.
    pub fn build(records: Vec<ComparisonRecord>, skipped: Vec<SkippedQuery>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::NoResults);
        }

        let all: Vec<&ComparisonRecord> = records.iter().collect();
        let summary = summarize(&all);
        let improvements = tally(&all);
        let averages = MethodMetrics {
            baseline: mean_metrics(all.iter().map(|r| &r.metrics.baseline)),
            candidate: mean_metrics(all.iter().map(|r| &r.metrics.candidate)),
        };

        let mut groups: BTreeMap<&'static str, Vec<&ComparisonRecord>> = BTreeMap::new();
        for record in &records {
            if let Some(kind) = record.kind {
                groups.entry(kind.as_str()).or_default().push(record);
            }
        }
        let by_type = groups
            .into_iter()
            .map(|(kind, group)| (kind.to_string(), summarize(&group)))
            .collect();

        Ok(Self {
            summary,
            improvements,
            averages,
            by_type,
            detailed_results: records,
            skipped,
        })
    }

    /// Number of queries where `dim` strictly improved.
    pub fn improved_count(&self, dim: Dimension) -> usize {
        self.detailed_results
            .iter()
            .filter(|r| r.improvement.get(dim) > 0.0)
            .count()
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a report written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn summarize(records: &[&ComparisonRecord]) -> Summary {
    let n = records.len() as f64;
    let mean = |dim: Dimension| records.iter().map(|r| r.improvement.get(dim)).sum::<f64>() / n;

    Summary {
        total_tests: records.len(),
        precision_improvement: mean(Dimension::Precision),
        recall_improvement: mean(Dimension::Recall),
        relevance_improvement: mean(Dimension::Relevance),
        satisfaction_improvement: mean(Dimension::Satisfaction),
        response_time_improvement: mean(Dimension::Speed),
    }
}

fn tally(records: &[&ComparisonRecord]) -> Improvements {
    let count = |dim: Dimension| {
        let improved = records
            .iter()
            .filter(|r| r.improvement.get(dim) > 0.0)
            .count();
        format!("{}/{}", improved, records.len())
    };

    Improvements {
        precision: count(Dimension::Precision),
        recall: count(Dimension::Recall),
        relevance: count(Dimension::Relevance),
        satisfaction: count(Dimension::Satisfaction),
        speed: count(Dimension::Speed),
    }
}

fn mean_metrics<'a>(metrics: impl Iterator<Item = &'a Metrics>) -> Metrics {
    let mut sum = Metrics::default();
    let mut n = 0usize;
    for m in metrics {
        sum.relevance_score += m.relevance_score;
        sum.precision += m.precision;
        sum.recall += m.recall;
        sum.response_time += m.response_time;
        sum.user_satisfaction += m.user_satisfaction;
        n += 1;
    }
    if n == 0 {
        return sum;
    }
    let n = n as f64;
    Metrics {
        relevance_score: sum.relevance_score / n,
        precision: sum.precision / n,
        recall: sum.recall / n,
        response_time: sum.response_time / n,
        user_satisfaction: sum.user_satisfaction / n,
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: score every document, drop the zeros, stable-sort, cut.
//!
//! Sort order:
//! 1. **Score** - descending
//! 2. **Corpus position** - ascending, via sort stability
//!
//! Stability is load-bearing. Two documents with the same score always come back
//! in corpus order, so the same query over the same corpus gives the same list.

use super::core::{score_fields, PreparedQuery, DISPLAY_CHARS};
use crate::types::{Corpus, Document, ScoredResult};
use crate::utils::{normalize, truncate_display};
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Corpus size above which scoring fans out over rayon.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 2048;

/// Rank `corpus` against `query` and return at most `max_results` hits.
///
/// Every returned result has `score > 0`, scores are non-increasing, and
/// `len == min(max_results, number of matching documents)`. An empty or blank
/// query, or `max_results == 0`, returns an empty list.
///
/// # Example
///
/// ```
/// use ragbench::{rank, Corpus, Document};
///
/// let corpus = Corpus::new(vec![
///     Document::new("a", "Cache tuning", "how to size caches", "wiki"),
///     Document::new("b", "Release notes", "cache fix", "wiki"),
/// ]).unwrap();
///
/// let hits = rank("cache", &corpus, 10);
/// assert_eq!(hits[0].id, "a");
/// assert_eq!(hits.len(), 2);
/// ```
pub fn rank<'a>(query: &str, corpus: &'a Corpus, max_results: usize) -> Vec<ScoredResult<'a>> {
    let prepared = PreparedQuery::new(query);
    if prepared.is_empty() || max_results == 0 {
        return Vec::new();
    }

    let mut scored = score_corpus(&prepared, corpus.documents());

    // slice::sort_by is stable: equal scores keep corpus order
    scored.sort_by(|a, b| compare_scores(a.1, b.1));
    scored.truncate(max_results);

    tracing::debug!(
        query,
        hits = scored.len(),
        corpus = corpus.len(),
        "ranked corpus"
    );

    scored
        .into_iter()
        .map(|(doc, score)| to_result(doc, score))
        .collect()
}

/// Order two scores for ranking: higher first.
pub fn compare_scores(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn score_one<'a>(query: &PreparedQuery, doc: &'a Document) -> Option<(&'a Document, f64)> {
    let score = score_fields(query, &normalize(&doc.title), &normalize(&doc.content));
    (score > 0.0).then_some((doc, score))
}

#[cfg(feature = "parallel")]
fn score_corpus<'a>(query: &PreparedQuery, docs: &'a [Document]) -> Vec<(&'a Document, f64)> {
    if docs.len() < PARALLEL_THRESHOLD {
        return docs.iter().filter_map(|d| score_one(query, d)).collect();
    }
    // Indexed collect keeps corpus order
    docs.par_iter().filter_map(|d| score_one(query, d)).collect()
}

#[cfg(not(feature = "parallel"))]
fn score_corpus<'a>(query: &PreparedQuery, docs: &'a [Document]) -> Vec<(&'a Document, f64)> {
    docs.iter().filter_map(|d| score_one(query, d)).collect()
}

fn to_result(doc: &Document, score: f64) -> ScoredResult<'_> {
    ScoredResult {
        id: &doc.id,
        title: &doc.title,
        content: truncate_display(&doc.content, DISPLAY_CHARS),
        score,
        source: &doc.source,
        metadata: &doc.metadata,
    }
}

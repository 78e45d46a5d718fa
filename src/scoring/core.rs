// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind lexical scoring.
//!
//! Four additive signals, all case-insensitive substring tests:
//!
//! | Signal                        | Weight |
//! |-------------------------------|--------|
//! | whole query in title          | 0.8    |
//! | whole query in content        | 0.5    |
//! | each query word in title      | 0.3    |
//! | each query word in content    | 0.1    |
//!
//! Substring, not token equality: "auth" matches "authentication". A word that
//! repeats in the query counts once per repetition.
//!
//! # Invariant: zero means absent
//!
//! Every weight is positive, so a document scores exactly 0.0 iff nothing matched.
//! Ranking relies on that to drop non-matching documents with a strict `> 0` test.

use crate::types::Document;
use crate::utils::{normalize, query_words};

/// Bonus when the full query appears in the title.
pub const TITLE_PHRASE_SCORE: f64 = 0.8;

/// Bonus when the full query appears in the content.
pub const CONTENT_PHRASE_SCORE: f64 = 0.5;

/// Bonus per query word found in the title.
pub const TITLE_WORD_SCORE: f64 = 0.3;

/// Bonus per query word found in the content.
pub const CONTENT_WORD_SCORE: f64 = 0.1;

/// Characters of content kept in a result's display excerpt.
pub const DISPLAY_CHARS: usize = 200;

/// A query prepared once and scored against many documents.
///
/// Holds the lowercased query and its words so the per-document loop does no
/// allocation on the query side.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    phrase: String,
    words: Vec<String>,
}

impl PreparedQuery {
    pub fn new(query: &str) -> Self {
        let phrase = normalize(query);
        let words = query_words(&phrase)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { phrase, words }
    }

    /// True when the query has no words. Such a query matches nothing, even though
    /// the empty string is technically a substring of everything.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Score one document. Returns 0.0 for an empty query.
    pub fn score(&self, doc: &Document) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        score_fields(self, &normalize(&doc.title), &normalize(&doc.content))
    }
}

/// Score pre-lowercased title and content against a prepared query.
pub fn score_fields(query: &PreparedQuery, title: &str, content: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    if title.contains(query.phrase.as_str()) {
        score += TITLE_PHRASE_SCORE;
    }
    if content.contains(query.phrase.as_str()) {
        score += CONTENT_PHRASE_SCORE;
    }

    for word in &query.words {
        if title.contains(word.as_str()) {
            score += TITLE_WORD_SCORE;
        }
        if content.contains(word.as_str()) {
            score += CONTENT_WORD_SCORE;
        }
    }

    score
}

/// Convenience wrapper: score a single document against a raw query string.
pub fn document_score(query: &str, doc: &Document) -> f64 {
    PreparedQuery::new(query).score(doc)
}

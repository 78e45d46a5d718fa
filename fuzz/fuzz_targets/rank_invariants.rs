// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for ranking invariants.
//!
//! Arbitrary documents and queries, including unicode that changes length when
//! lowercased. Ranking must not panic, scores must be finite and positive, the
//! order must be non-increasing, and the same call twice must agree.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ragbench::{document_score, rank, Corpus, Document, DISPLAY_CHARS};

#[derive(Arbitrary, Debug)]
struct Input {
    query: String,
    limit: u8,
    docs: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let docs: Vec<Document> = input
        .docs
        .into_iter()
        .take(64)
        .enumerate()
        .map(|(i, (title, content))| Document::new(format!("d{}", i), title, content, "fuzz"))
        .collect();
    let Ok(corpus) = Corpus::new(docs) else {
        return;
    };
    let limit = input.limit as usize;

    let first = rank(&input.query, &corpus, limit);
    let second = rank(&input.query, &corpus, limit);

    // INVARIANT 1: Deterministic
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id, "Result order changed between calls");
        assert_eq!(a.score, b.score, "Score changed between calls");
    }

    // INVARIANT 2: Bounded by the limit
    assert!(first.len() <= limit);

    // INVARIANT 3: Finite, positive, non-increasing
    for r in &first {
        assert!(r.score.is_finite() && r.score > 0.0, "Bad score {}", r.score);
    }
    for pair in first.windows(2) {
        assert!(pair[0].score >= pair[1].score, "Scores out of order");
    }

    // INVARIANT 4: Excerpt is capped and scoring saw the full document
    for r in &first {
        assert!(r.content.chars().count() <= DISPLAY_CHARS + 3);
        if let Some(doc) = corpus.get(r.id) {
            assert_eq!(r.score, document_score(&input.query, doc));
        }
    }
});

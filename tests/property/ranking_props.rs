//! Ranking invariants over random corpora.

use proptest::prelude::*;
use ragbench::{document_score, rank, Corpus, Document, DISPLAY_CHARS};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Word-like strings from a small alphabet so matches actually happen.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abcde]{1,4}").unwrap()
}

fn text_strategy(max_words: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 0..max_words).prop_map(|w| w.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = Corpus> {
    prop::collection::vec((text_strategy(4), text_strategy(12)), 0..30).prop_map(|fields| {
        let docs = fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, content))| Document::new(format!("doc-{}", i), title, content, "wiki"))
            .collect();
        Corpus::new(docs).unwrap()
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        text_strategy(3),
        Just(String::new()),
        Just("   ".to_string()),
        // mixed case exercises normalization
        word_strategy().prop_map(|w| w.to_uppercase()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Scores never increase down the list and every returned score is positive.
    #[test]
    fn prop_sorted_and_positive(corpus in corpus_strategy(), query in query_strategy(), limit in 0usize..40) {
        let results = rank(&query, &corpus, limit);
        prop_assert!(results.iter().all(|r| r.score > 0.0));
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// Length is exactly min(limit, number of matching documents).
    #[test]
    fn prop_truncation_law(corpus in corpus_strategy(), query in query_strategy(), limit in 0usize..40) {
        let matching = corpus
            .documents()
            .iter()
            .filter(|d| document_score(&query, d) > 0.0)
            .count();
        prop_assert_eq!(rank(&query, &corpus, limit).len(), limit.min(matching));
    }

    /// A smaller limit returns a prefix of a larger one.
    #[test]
    fn prop_limit_is_prefix(corpus in corpus_strategy(), query in query_strategy(), a in 0usize..20, b in 0usize..20) {
        let (small, large) = (a.min(b), a.max(b));
        let short: Vec<_> = rank(&query, &corpus, small).iter().map(|r| r.id).collect();
        let long: Vec<_> = rank(&query, &corpus, large).iter().map(|r| r.id).collect();
        prop_assert_eq!(&short[..], &long[..short.len()]);
    }

    /// Equal scores keep corpus order.
    #[test]
    fn prop_ties_in_corpus_order(corpus in corpus_strategy(), query in query_strategy()) {
        let position = |id: &str| corpus.documents().iter().position(|d| d.id == id).unwrap();
        let results = rank(&query, &corpus, usize::MAX);
        for pair in results.windows(2) {
            if pair[0].score == pair[1].score {
                prop_assert!(position(pair[0].id) < position(pair[1].id));
            }
        }
    }

    /// Ranking is a pure function of its inputs.
    #[test]
    fn prop_idempotent(corpus in corpus_strategy(), query in query_strategy()) {
        let first: Vec<_> = rank(&query, &corpus, 50).iter().map(|r| (r.id, r.score)).collect();
        let second: Vec<_> = rank(&query, &corpus, 50).iter().map(|r| (r.id, r.score)).collect();
        prop_assert_eq!(first, second);
    }

    /// Queries without words never match.
    #[test]
    fn prop_blank_query_empty(corpus in corpus_strategy(), ws in "[ \t\n]{0,5}") {
        prop_assert!(rank(&ws, &corpus, 100).is_empty());
    }

    /// Display excerpts are capped and never change which documents match.
    #[test]
    fn prop_excerpt_bounded(corpus in corpus_strategy(), query in query_strategy()) {
        for r in rank(&query, &corpus, 100) {
            prop_assert!(r.content.chars().count() <= DISPLAY_CHARS + 3);
            let doc = corpus.get(r.id).unwrap();
            prop_assert_eq!(r.score, document_score(&query, doc));
        }
    }
}

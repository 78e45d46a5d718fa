//! Empty queries, zero limits, unicode and other boundaries.

use crate::common::{make_doc, sample_corpus};
use ragbench::{rank, Corpus, DISPLAY_CHARS};

#[test]
fn test_query_matching_nothing_is_empty() {
    let corpus = sample_corpus();
    assert!(rank("xyz123 qqq", &corpus, 10).is_empty());
}

#[test]
fn test_one_common_word_is_enough_to_match() {
    // "query" sits in the database issue's title; the other two words hit nothing
    let corpus = sample_corpus();
    let results = rank("nonexistent query xyz123", &corpus, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "issue-1002");
    assert!((results[0].score - 0.3).abs() < 1e-9);
}

#[test]
fn test_blank_queries_match_nothing() {
    let corpus = sample_corpus();
    for query in ["", " ", "\t\n"] {
        assert!(rank(query, &corpus, 10).is_empty(), "query {:?}", query);
    }
}

#[test]
fn test_zero_limit_is_empty() {
    assert!(rank("api", &sample_corpus(), 0).is_empty());
}

#[test]
fn test_empty_corpus() {
    let corpus = Corpus::new(Vec::new()).unwrap();
    assert!(corpus.is_empty());
    assert!(rank("anything", &corpus, 10).is_empty());
}

#[test]
fn test_limit_larger_than_matches() {
    let corpus = sample_corpus();
    let results = rank("authentication", &corpus, 100);
    // every sample document mentions authentication except the database issue
    assert_eq!(results.len(), 3);
}

#[test]
fn test_case_insensitive_both_ways() {
    let corpus = Corpus::new(vec![make_doc("a", "GRPC Gateway", "Retries")]).unwrap();
    assert_eq!(rank("grpc", &corpus, 10).len(), 1);
    assert_eq!(rank("RETRIES", &corpus, 10).len(), 1);
}

#[test]
fn test_unicode_content_truncates_on_char_boundary() {
    let content = "ü".repeat(DISPLAY_CHARS + 20);
    let corpus = Corpus::new(vec![make_doc("u", "Umlauts", &content)]).unwrap();
    let results = rank("umlauts", &corpus, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content.chars().count(), DISPLAY_CHARS + 3);
    assert!(results[0].content.ends_with("..."));
}

#[test]
fn test_content_at_display_limit_is_untouched() {
    let content = "x".repeat(DISPLAY_CHARS);
    let corpus = Corpus::new(vec![make_doc("x", "Exact", &content)]).unwrap();
    let results = rank("exact", &corpus, 10);
    assert_eq!(results[0].content, content);
}

#[test]
fn test_inner_whitespace_is_part_of_the_phrase() {
    let corpus = Corpus::new(vec![make_doc("a", "rate limiting", "")]).unwrap();
    let single = rank("rate limiting", &corpus, 10);
    let double = rank("rate  limiting", &corpus, 10);
    // the doubled space misses the phrase bonus but keeps both word hits
    assert!((single[0].score - 1.4).abs() < 1e-9);
    assert!((double[0].score - 0.6).abs() < 1e-9);
}

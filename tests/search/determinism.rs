//! Same query, same corpus, same answer.

use crate::common::{make_doc, sample_corpus};
use ragbench::{rank, Corpus};

#[test]
fn test_repeated_calls_are_identical() {
    let corpus = sample_corpus();
    for query in ["authentication", "search performance", "api", "guide"] {
        let first: Vec<_> = rank(query, &corpus, 10)
            .iter()
            .map(|r| (r.id, r.score, r.content.clone()))
            .collect();
        for _ in 0..5 {
            let again: Vec<_> = rank(query, &corpus, 10)
                .iter()
                .map(|r| (r.id, r.score, r.content.clone()))
                .collect();
            assert_eq!(first, again, "query {:?}", query);
        }
    }
}

#[test]
fn test_ties_follow_insertion_order() {
    let docs: Vec<_> = (0..50)
        .map(|i| make_doc(&format!("doc-{:02}", i), "Cache", "same body"))
        .collect();
    let corpus = Corpus::new(docs).unwrap();
    let ids: Vec<_> = rank("cache", &corpus, 50).iter().map(|r| r.id.to_string()).collect();
    let expected: Vec<_> = (0..50).map(|i| format!("doc-{:02}", i)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_large_corpus_keeps_order() {
    // Big enough to cross the data-parallel threshold when enabled
    let docs: Vec<_> = (0..5000)
        .map(|i| {
            let title = if i % 3 == 0 { "Search tuning" } else { "Other" };
            make_doc(&format!("d{}", i), title, "search")
        })
        .collect();
    let corpus = Corpus::new(docs).unwrap();
    let results = rank("search", &corpus, 5000);

    assert_eq!(results.len(), 5000);
    let top: Vec<_> = results.iter().take(3).map(|r| r.id).collect();
    assert_eq!(top, vec!["d0", "d3", "d6"]);
    let tail_start = results.iter().position(|r| r.score < results[0].score).unwrap();
    assert_eq!(results[tail_start].id, "d1");
    assert_eq!(results[tail_start + 1].id, "d2");
}

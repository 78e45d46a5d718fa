//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! The sample corpus here is the same one shipped in `data/sample_corpus.json`.

#![doc(hidden)]

use crate::eval::types::{Method, MethodOutcome, ResultItem};
use crate::types::{Corpus, Document, MetaValue};

fn tags(values: &[&str]) -> MetaValue {
    MetaValue::List(values.iter().map(|s| s.to_string()).collect())
}

/// The four-document sample corpus: two issues, two wiki pages.
pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "issue-1001",
            "API Authentication Timeout Issues",
            "Users experiencing timeout errors when authenticating via API. Symptoms include \
             504 Gateway Timeout errors, authentication requests taking >30 seconds, \
             intermittent failures during peak hours.",
            "issue",
        )
        .with_meta("priority", "High")
        .with_meta("status", "Resolved")
        .with_meta("tags", tags(&["api", "authentication", "timeout"])),
        Document::new(
            "issue-1002",
            "Database Query Performance Degradation",
            "Search queries running significantly slower than expected. Performance metrics \
             show simple searches taking 2-5 seconds, complex searches 10-15 seconds, \
             database CPU usage 80-90%.",
            "issue",
        )
        .with_meta("priority", "High")
        .with_meta("status", "Open")
        .with_meta("tags", tags(&["database", "performance", "search"])),
        Document::new(
            "wiki-api-docs",
            "API Documentation",
            "Complete API documentation including authentication methods, common endpoints, \
             error handling, and rate limiting information.",
            "wiki",
        )
        .with_meta("category", "documentation")
        .with_meta("tags", tags(&["api", "authentication", "endpoints"])),
        Document::new(
            "wiki-troubleshooting",
            "Troubleshooting Guide",
            "Common issues and solutions including authentication problems, performance \
             issues, search not working, and getting help procedures.",
            "wiki",
        )
        .with_meta("category", "support")
        .with_meta("tags", tags(&["troubleshooting", "authentication", "performance"])),
    ]
}

/// The sample corpus, validated.
pub fn sample_corpus() -> Corpus {
    match Corpus::new(sample_documents()) {
        Ok(corpus) => corpus,
        Err(e) => panic!("sample corpus is invalid: {}", e),
    }
}

/// Create a simple test document in the "wiki" source.
pub fn make_doc(id: &str, title: &str, content: &str) -> Document {
    Document::new(id, title, content, "wiki")
}

/// Build a healthy outcome from `(title, description)` pairs.
pub fn make_outcome(query: &str, method: Method, items: &[(&str, &str)]) -> MethodOutcome {
    MethodOutcome {
        query: query.to_string(),
        results: items
            .iter()
            .map(|(title, description)| ResultItem::new(*title, *description))
            .collect(),
        response_time: 0.0,
        total_count: items.len(),
        method,
        error: None,
    }
}

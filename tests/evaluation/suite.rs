//! Whole-suite evaluation: skipping, cancellation, progress and the report.

use crate::common::{sample_corpus, spawn_issue_tracker, spawn_semantic};
use ragbench::eval::{
    evaluate, evaluate_with, parse_suite, CancelFlag, EvalOptions, IssueTrackerSearch, LocalSearch,
    Progress, QueryKind, QuerySpec, Report, SemanticSearch,
};
use ragbench::{default_query_suite, Error};
use std::sync::Arc;
use std::time::Duration;

fn local(name: &str) -> LocalSearch {
    LocalSearch::new(name, Arc::new(sample_corpus()))
}

#[tokio::test]
async fn test_invalid_spec_is_skipped_and_reported() {
    let tracker = spawn_issue_tracker().await;
    let semantic = spawn_semantic(Duration::ZERO).await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), tracker.url("/search.json"));
    let candidate = SemanticSearch::new(client, semantic.url("/search"));

    let queries = vec![
        QuerySpec::new("API authentication timeout", ["authentication", "timeout", "API"]),
        QuerySpec::new("orphan query", Vec::<String>::new()),
        QuerySpec::new("database performance issues", ["database", "performance", "query"]),
    ];

    let report = evaluate(&queries, &baseline, &candidate, &EvalOptions::default())
        .await
        .unwrap();

    assert_eq!(report.summary.total_tests, 2);
    assert_eq!(report.detailed_results.len(), 2);
    assert_eq!(report.detailed_results[0].query, "API authentication timeout");
    assert_eq!(report.detailed_results[1].query, "database performance issues");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].query, "orphan query");
    assert!(report.improvements.precision.ends_with("/2"));
    // the skipped spec never reached a backend
    assert_eq!(tracker.hits(), 2);
    assert_eq!(semantic.hits(), 2);
}

#[tokio::test]
async fn test_undecodable_suite_entry_is_skipped() {
    let queries = parse_suite(
        r#"[
            {"query": "API authentication timeout", "expected_keywords": ["api"]},
            {"query": "typo in keywords", "expected_keywords": "api", "type": "semantic"},
            {"query": "search filters", "expected_keywords": ["search"], "type": "bogus"}
        ]"#,
    )
    .unwrap();

    let report = evaluate(&queries, &local("b"), &local("c"), &EvalOptions::default())
        .await
        .unwrap();

    assert_eq!(report.summary.total_tests, 1);
    let skipped: Vec<_> = report.skipped.iter().map(|s| s.query.as_str()).collect();
    assert_eq!(skipped, ["typo in keywords", "search filters"]);
    assert!(report.skipped[0].reason.contains("entry 1"));
}

#[tokio::test]
async fn test_identical_backends_show_no_quality_change() {
    let baseline = local("baseline");
    let candidate = local("candidate");
    let report = evaluate(
        &default_query_suite(),
        &baseline,
        &candidate,
        &EvalOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.summary.total_tests, 6);
    assert_eq!(report.summary.precision_improvement, 0.0);
    assert_eq!(report.summary.recall_improvement, 0.0);
    assert_eq!(report.improvements.precision, "0/6");
    assert_eq!(report.improvements.relevance, "0/6");
    assert_eq!(report.by_type["semantic"].total_tests, 3);
    assert_eq!(report.by_type["exact_match"].total_tests, 3);
    assert_eq!(
        report.detailed_results[1].kind,
        Some(QueryKind::Semantic)
    );
}

#[tokio::test]
async fn test_all_invalid_is_no_results() {
    let queries = vec![
        QuerySpec::new("", ["api"]),
        QuerySpec::new("no keywords", ["  "]),
    ];
    let result = evaluate(&queries, &local("b"), &local("c"), &EvalOptions::default()).await;
    assert!(matches!(result, Err(Error::NoResults)));
}

#[tokio::test]
async fn test_empty_suite_is_no_results() {
    let result = evaluate(&[], &local("b"), &local("c"), &EvalOptions::default()).await;
    assert!(matches!(result, Err(Error::NoResults)));
}

#[tokio::test]
async fn test_cancel_before_start_is_no_results() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let result = evaluate_with(
        &default_query_suite(),
        &local("b"),
        &local("c"),
        &EvalOptions::default(),
        &cancel,
        |_| {},
    )
    .await;
    assert!(matches!(result, Err(Error::NoResults)));
}

#[tokio::test]
async fn test_cancel_mid_run_reports_completed() {
    let cancel = CancelFlag::new();
    let trigger = cancel.clone();
    let mut completed = 0;

    let report = evaluate_with(
        &default_query_suite(),
        &local("b"),
        &local("c"),
        &EvalOptions::default(),
        &cancel,
        |event| {
            if let Progress::Completed { .. } = event {
                completed += 1;
                if completed == 2 {
                    trigger.cancel();
                }
            }
        },
    )
    .await
    .unwrap();

    assert_eq!(report.summary.total_tests, 2);
    assert_eq!(report.skipped.len(), 4);
    assert!(report.skipped.iter().all(|s| s.reason == "run cancelled"));
}

#[tokio::test]
async fn test_progress_events_in_order() {
    let queries = vec![
        QuerySpec::new("api", ["api"]),
        QuerySpec::new("   ", ["api"]),
        QuerySpec::new("guide", ["guide"]),
    ];
    let mut events = Vec::new();
    evaluate_with(
        &queries,
        &local("b"),
        &local("c"),
        &EvalOptions::default(),
        &CancelFlag::new(),
        |event| {
            events.push(match event {
                Progress::Started { index, total, .. } => format!("start {}/{}", index, total),
                Progress::Completed { index, .. } => format!("done {}", index),
                Progress::Skipped { index, .. } => format!("skip {}", index),
            })
        },
    )
    .await
    .unwrap();

    assert_eq!(
        events,
        vec!["start 0/3", "done 0", "skip 1", "start 2/3", "done 2"]
    );
}

#[tokio::test]
async fn test_report_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparison_results.json");

    let report = evaluate(
        &default_query_suite(),
        &local("b"),
        &local("c"),
        &EvalOptions::default(),
    )
    .await
    .unwrap();
    report.save(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    for key in ["summary", "improvements", "averages", "by_type", "detailed_results"] {
        assert!(raw.get(key).is_some(), "missing {}", key);
    }
    let first = &raw["detailed_results"][0];
    assert_eq!(first["type"], "exact_match");
    assert!(first["metrics"]["baseline"]["relevance_score"].is_number());
    assert!(first["improvement"]["response_time"].is_number());

    assert_eq!(Report::load(&path).unwrap(), report);
}

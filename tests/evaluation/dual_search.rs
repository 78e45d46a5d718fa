//! Concurrent dual search against live stub servers.

use crate::common::{dead_url, spawn_issue_tracker, spawn_semantic, spawn_status};
use axum::http::StatusCode;
use ragbench::eval::{compare, IssueTrackerSearch, Method, SearchParams, SemanticSearch};
use std::time::Duration;

fn params(timeout: Duration) -> SearchParams {
    SearchParams {
        max_results: 20,
        timeout,
    }
}

#[tokio::test]
async fn test_both_backends_healthy() {
    let tracker = spawn_issue_tracker().await;
    let semantic = spawn_semantic(Duration::ZERO).await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), tracker.url("/search.json"));
    let candidate = SemanticSearch::new(client, semantic.url("/search"));

    let (b, c) = compare(
        "API authentication timeout",
        &baseline,
        &candidate,
        &params(Duration::from_secs(5)),
    )
    .await;

    assert_eq!(b.method, Method::Baseline);
    assert_eq!(c.method, Method::Candidate);
    assert!(b.error.is_none() && c.error.is_none());
    assert_eq!(b.results[0].id.as_deref(), Some("issue-1001"));
    assert_eq!(c.results[0].title, "API Authentication Timeout Issues");
    // tracker "description" and service "content" both land in description
    assert!(b.results[0].description.contains("504 Gateway Timeout"));
    assert!(c.results[0].description.contains("504 Gateway Timeout"));
    assert_eq!(b.total_count, b.results.len());
    assert_eq!(tracker.hits(), 1);
    assert_eq!(semantic.hits(), 1);
}

#[tokio::test]
async fn test_candidate_timeout_degrades_only_candidate() {
    let tracker = spawn_issue_tracker().await;
    let slow = spawn_semantic(Duration::from_secs(3)).await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), tracker.url("/search.json"));
    let candidate = SemanticSearch::new(client, slow.url("/search"));

    let timeout = Duration::from_millis(300);
    let (b, c) = compare("database performance", &baseline, &candidate, &params(timeout)).await;

    assert!(!b.results.is_empty());
    assert!(b.error.is_none());

    assert!(c.results.is_empty());
    assert_eq!(c.total_count, 0);
    assert!(c.response_time >= timeout.as_secs_f64() * 0.9);
    assert!(c.response_time < 3.0);
    let error = c.error.unwrap();
    assert!(error.contains("timed out"), "error was {}", error);

    // the baseline's own timer is not inflated by the slow candidate
    assert!(b.response_time < c.response_time);
}

#[tokio::test]
async fn test_connection_refused_degrades() {
    let tracker = spawn_issue_tracker().await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), tracker.url("/search.json"));
    let candidate = SemanticSearch::new(client, dead_url().await);

    let (b, c) = compare("login", &baseline, &candidate, &params(Duration::from_secs(2))).await;
    assert!(b.error.is_none());
    assert!(c.is_degraded());
    assert!(c.results.is_empty());
}

#[tokio::test]
async fn test_baseline_server_error_degrades() {
    let broken = spawn_status(StatusCode::INTERNAL_SERVER_ERROR).await;
    let semantic = spawn_semantic(Duration::ZERO).await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), broken.url("/search.json"));
    let candidate = SemanticSearch::new(client, semantic.url("/search"));

    let (b, c) = compare("api", &baseline, &candidate, &params(Duration::from_secs(2))).await;
    assert!(b.error.as_deref().unwrap_or("").contains("500"));
    assert_eq!(b.total_count, 0);
    assert!(!c.results.is_empty());
}

#[tokio::test]
async fn test_malformed_body_degrades() {
    // 200 with a non-JSON body
    let weird = spawn_status(StatusCode::OK).await;
    let semantic = spawn_semantic(Duration::ZERO).await;
    let client = reqwest::Client::new();
    let baseline = IssueTrackerSearch::new(client.clone(), weird.url("/search.json"));
    let candidate = SemanticSearch::new(client, semantic.url("/search"));

    let (b, _) = compare("api", &baseline, &candidate, &params(Duration::from_secs(2))).await;
    assert!(b.is_degraded());
}

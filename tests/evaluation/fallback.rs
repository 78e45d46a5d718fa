//! Candidate fallback: exactly one retry, and only on "not available" statuses.

use crate::common::{dead_url, spawn_semantic, spawn_status};
use axum::http::StatusCode;
use ragbench::eval::runner::run_method;
use ragbench::eval::{Method, SearchParams, SemanticSearch};
use std::time::Duration;

fn params() -> SearchParams {
    SearchParams {
        max_results: 5,
        timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn test_not_available_statuses_fall_back_once() {
    for status in [
        StatusCode::NOT_FOUND,
        StatusCode::NOT_IMPLEMENTED,
        StatusCode::SERVICE_UNAVAILABLE,
    ] {
        let primary = spawn_status(status).await;
        let fallback = spawn_semantic(Duration::ZERO).await;
        let candidate = SemanticSearch::new(reqwest::Client::new(), primary.url("/ragmine/search.json"))
            .with_fallback(fallback.url("/search"))
            .with_project("ragmine-test");

        let outcome = run_method("API authentication timeout", &candidate, Method::Candidate, &params()).await;

        assert!(outcome.error.is_none(), "status {}: {:?}", status, outcome.error);
        assert_eq!(outcome.results[0].id.as_deref(), Some("issue-1001"));
        assert_eq!(primary.hits(), 1, "status {}", status);
        assert_eq!(fallback.hits(), 1, "status {}", status);
    }
}

#[tokio::test]
async fn test_request_bodies() {
    let primary = spawn_status(StatusCode::SERVICE_UNAVAILABLE).await;
    let fallback = spawn_semantic(Duration::ZERO).await;
    let candidate = SemanticSearch::new(reqwest::Client::new(), primary.url("/ragmine/search.json"))
        .with_fallback(fallback.url("/search"))
        .with_project("ragmine-test");

    run_method("login", &candidate, Method::Candidate, &params()).await;

    let sent = primary.bodies();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["query"], "login");
    assert_eq!(sent[0]["project"], "ragmine-test");
    assert_eq!(sent[0]["max_results"], 5);

    let retried = fallback.bodies();
    assert_eq!(retried.len(), 1);
    assert_eq!(retried[0]["query"], "login");
    assert!(retried[0].get("project").is_none());
    assert_eq!(retried[0]["max_results"], 5);
}

#[tokio::test]
async fn test_hard_failure_status_never_falls_back() {
    let primary = spawn_status(StatusCode::INTERNAL_SERVER_ERROR).await;
    let fallback = spawn_semantic(Duration::ZERO).await;
    let candidate = SemanticSearch::new(reqwest::Client::new(), primary.url("/search"))
        .with_fallback(fallback.url("/search"));

    let outcome = run_method("api", &candidate, Method::Candidate, &params()).await;

    assert!(outcome.is_degraded());
    assert_eq!(primary.hits(), 1);
    assert_eq!(fallback.hits(), 0);
}

#[tokio::test]
async fn test_network_error_never_falls_back() {
    let fallback = spawn_semantic(Duration::ZERO).await;
    let candidate = SemanticSearch::new(reqwest::Client::new(), dead_url().await)
        .with_fallback(fallback.url("/search"));

    let outcome = run_method("api", &candidate, Method::Candidate, &params()).await;

    assert!(outcome.is_degraded());
    assert_eq!(fallback.hits(), 0);
}

#[tokio::test]
async fn test_fallback_not_available_too() {
    let primary = spawn_status(StatusCode::NOT_FOUND).await;
    let fallback = spawn_status(StatusCode::SERVICE_UNAVAILABLE).await;
    let candidate = SemanticSearch::new(reqwest::Client::new(), primary.url("/search"))
        .with_fallback(fallback.url("/search"));

    let outcome = run_method("api", &candidate, Method::Candidate, &params()).await;

    assert!(outcome.is_degraded());
    assert_eq!(primary.hits(), 1);
    assert_eq!(fallback.hits(), 1);
}

#[tokio::test]
async fn test_not_available_without_fallback_degrades() {
    let primary = spawn_status(StatusCode::NOT_FOUND).await;
    let candidate = SemanticSearch::new(reqwest::Client::new(), primary.url("/search"));

    let outcome = run_method("api", &candidate, Method::Candidate, &params()).await;

    let error = outcome.error.unwrap();
    assert!(error.contains("no fallback"), "error was {}", error);
    assert_eq!(primary.hits(), 1);
}

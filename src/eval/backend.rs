// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search backends and the adapters that normalize their responses.
//!
//! Each backend speaks its own dialect:
//!
//! | Backend        | Request                                   | Hit text fields          |
//! |----------------|-------------------------------------------|--------------------------|
//! | `IssueTracker` | `GET ?q=..&scope=all&all_words=1`         | `title`, `description`   |
//! | `Semantic`     | `POST {query, project?, max_results}`     | `title`, `content`       |
//! | `Local`        | in-process `rank` over a corpus           | `title`, `content`       |
//!
//! The wire structs are private to this module. Everything past `search` sees only
//! `BackendResponse` with `ResultItem`s.
//!
//! # Candidate fallback
//!
//! The semantic backend has a primary URL and an optional secondary one. When the
//! primary answers with a "not available" status (see `NOT_AVAILABLE_STATUSES`),
//! the secondary is tried exactly once. Network errors and timeouts on the primary
//! are hard failures: no fallback, no retry.

use super::probe::ProbeTarget;
use super::types::ResultItem;
use crate::config::BackendSpec;
use crate::error::{Error, Result};
use crate::scoring::rank;
use crate::types::Corpus;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Statuses meaning "this endpoint isn't set up here", as opposed to broken.
pub const NOT_AVAILABLE_STATUSES: [StatusCode; 3] = [
    StatusCode::NOT_FOUND,
    StatusCode::NOT_IMPLEMENTED,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Per-call parameters shared by both sides of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub max_results: usize,
    /// Limit for a single HTTP request
    pub timeout: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_results: 20,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Normalized backend answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendResponse {
    pub items: Vec<ResultItem>,
    pub total_count: usize,
}

impl BackendResponse {
    /// Build a response, defaulting the count to the number of items.
    pub fn new(items: Vec<ResultItem>, total_count: Option<usize>) -> Self {
        let total_count = total_count.unwrap_or(items.len());
        Self { items, total_count }
    }
}

/// Anything that can answer a text query.
pub trait SearchBackend: Send + Sync {
    /// Label used in logs and error messages.
    fn name(&self) -> &str;

    /// Upper bound on sequential requests one `search` call may issue.
    fn max_attempts(&self) -> u32 {
        1
    }

    fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> impl Future<Output = Result<BackendResponse>> + Send;
}

// =============================================================================
// ISSUE TRACKER (baseline)
// =============================================================================

#[derive(Deserialize)]
struct IssueTrackerResponse {
    #[serde(default)]
    results: Vec<IssueTrackerHit>,
    #[serde(default)]
    total_count: Option<usize>,
}

#[derive(Deserialize)]
struct IssueTrackerHit {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl From<IssueTrackerHit> for ResultItem {
    fn from(hit: IssueTrackerHit) -> Self {
        ResultItem {
            id: hit.id.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            title: hit.title,
            description: hit.description,
            score: None,
            source: hit.kind,
        }
    }
}

/// Keyword search of an issue tracker's `search.json` endpoint.
#[derive(Debug, Clone)]
pub struct IssueTrackerSearch {
    client: reqwest::Client,
    url: String,
}

impl IssueTrackerSearch {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl SearchBackend for IssueTrackerSearch {
    fn name(&self) -> &str {
        &self.url
    }

    async fn search(&self, query: &str, params: &SearchParams) -> Result<BackendResponse> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("scope", "all"), ("all_words", "1")])
            .timeout(params.timeout)
            .send()
            .await
            .map_err(|e| request_error(&self.url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::unavailable(&self.url, format!("status {}", status)));
        }

        let body: IssueTrackerResponse = response
            .json()
            .await
            .map_err(|e| request_error(&self.url, &e))?;
        let items = body.results.into_iter().map(ResultItem::from).collect();
        Ok(BackendResponse::new(items, body.total_count))
    }
}

// =============================================================================
// SEMANTIC SERVICE (candidate)
// =============================================================================

#[derive(Serialize)]
struct SemanticRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
    max_results: usize,
}

#[derive(Deserialize)]
struct SemanticResponse {
    #[serde(default)]
    results: Vec<SemanticHit>,
    #[serde(default)]
    total_count: Option<usize>,
}

#[derive(Deserialize)]
struct SemanticHit {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default, alias = "description")]
    content: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    source: Option<String>,
}

impl From<SemanticHit> for ResultItem {
    fn from(hit: SemanticHit) -> Self {
        ResultItem {
            id: hit.id,
            title: hit.title,
            description: hit.content,
            score: hit.score,
            source: hit.source,
        }
    }
}

enum Attempt {
    Answered(BackendResponse),
    NotAvailable(StatusCode),
}

/// Semantic search service with an optional one-shot fallback URL.
#[derive(Debug, Clone)]
pub struct SemanticSearch {
    client: reqwest::Client,
    url: String,
    fallback_url: Option<String>,
    project: Option<String>,
}

impl SemanticSearch {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            fallback_url: None,
            project: None,
        }
    }

    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    async fn attempt(
        &self,
        url: &str,
        request: &SemanticRequest<'_>,
        timeout: Duration,
    ) -> Result<Attempt> {
        let response = self
            .client
            .post(url)
            .json(request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(url, &e))?;

        let status = response.status();
        if NOT_AVAILABLE_STATUSES.contains(&status) {
            return Ok(Attempt::NotAvailable(status));
        }
        if !status.is_success() {
            return Err(Error::unavailable(url, format!("status {}", status)));
        }

        let body: SemanticResponse = response.json().await.map_err(|e| request_error(url, &e))?;
        let items = body.results.into_iter().map(ResultItem::from).collect();
        Ok(Attempt::Answered(BackendResponse::new(items, body.total_count)))
    }
}

impl SearchBackend for SemanticSearch {
    fn name(&self) -> &str {
        &self.url
    }

    fn max_attempts(&self) -> u32 {
        if self.fallback_url.is_some() {
            2
        } else {
            1
        }
    }

    async fn search(&self, query: &str, params: &SearchParams) -> Result<BackendResponse> {
        let primary = SemanticRequest {
            query,
            project: self.project.as_deref(),
            max_results: params.max_results,
        };

        let status = match self.attempt(&self.url, &primary, params.timeout).await? {
            Attempt::Answered(response) => return Ok(response),
            Attempt::NotAvailable(status) => status,
        };

        let Some(fallback) = self.fallback_url.as_deref() else {
            return Err(Error::unavailable(
                &self.url,
                format!("status {} and no fallback configured", status),
            ));
        };

        tracing::info!(
            primary = %self.url,
            fallback,
            %status,
            "candidate endpoint not available, trying fallback"
        );

        // The fallback is the bare service: no project scoping
        let secondary = SemanticRequest {
            query,
            project: None,
            max_results: params.max_results,
        };
        match self.attempt(fallback, &secondary, params.timeout).await? {
            Attempt::Answered(response) => Ok(response),
            Attempt::NotAvailable(status) => {
                Err(Error::unavailable(fallback, format!("status {}", status)))
            }
        }
    }
}

// =============================================================================
// LOCAL LEXICAL SEARCH
// =============================================================================

/// In-process lexical search over a corpus.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    name: String,
    corpus: Arc<Corpus>,
}

impl LocalSearch {
    pub fn new(name: impl Into<String>, corpus: Arc<Corpus>) -> Self {
        Self {
            name: name.into(),
            corpus,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Synchronous ranking, exposed for callers that don't need a runtime.
    pub fn search_now(&self, query: &str, max_results: usize) -> BackendResponse {
        let items: Vec<ResultItem> = rank(query, &self.corpus, max_results)
            .into_iter()
            .map(|hit| ResultItem {
                id: Some(hit.id.to_string()),
                title: hit.title.to_string(),
                description: hit.content,
                score: Some(hit.score),
                source: Some(hit.source.to_string()),
            })
            .collect();
        BackendResponse::new(items, None)
    }
}

impl SearchBackend for LocalSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, params: &SearchParams) -> Result<BackendResponse> {
        Ok(self.search_now(query, params.max_results))
    }
}

// =============================================================================
// RUNTIME-SELECTED BACKEND
// =============================================================================

/// A backend picked from configuration.
#[derive(Debug, Clone)]
pub enum Backend {
    IssueTracker(IssueTrackerSearch),
    Semantic(SemanticSearch),
    Local(LocalSearch),
}

impl Backend {
    /// Build a backend from its configuration entry. Local backends load their
    /// corpus here, so a bad corpus file fails before any query runs.
    pub fn from_spec(spec: &BackendSpec, client: &reqwest::Client) -> Result<Self> {
        Ok(match spec {
            BackendSpec::IssueTracker { url } => {
                Backend::IssueTracker(IssueTrackerSearch::new(client.clone(), url.clone()))
            }
            BackendSpec::Semantic {
                url,
                fallback_url,
                project,
            } => {
                let mut backend = SemanticSearch::new(client.clone(), url.clone());
                if let Some(fallback) = fallback_url {
                    backend = backend.with_fallback(fallback.clone());
                }
                if let Some(project) = project {
                    backend = backend.with_project(project.clone());
                }
                Backend::Semantic(backend)
            }
            BackendSpec::Local { corpus } => {
                let loaded = Corpus::from_path(corpus)?;
                tracing::info!(path = %corpus.display(), documents = loaded.len(), "loaded corpus");
                Backend::Local(LocalSearch::new(
                    format!("local:{}", corpus.display()),
                    Arc::new(loaded),
                ))
            }
        })
    }

    /// URLs worth probing before a run. Local backends have none.
    pub fn probe_targets(&self) -> Vec<ProbeTarget<'_>> {
        match self {
            Backend::IssueTracker(b) => vec![ProbeTarget::new(&b.url)],
            Backend::Semantic(b) => match b.fallback_url.as_deref() {
                Some(fallback) => vec![
                    ProbeTarget::covered_by_fallback(&b.url),
                    ProbeTarget::new(fallback),
                ],
                None => vec![ProbeTarget::new(&b.url)],
            },
            Backend::Local(_) => Vec::new(),
        }
    }
}

impl SearchBackend for Backend {
    fn name(&self) -> &str {
        match self {
            Backend::IssueTracker(b) => b.name(),
            Backend::Semantic(b) => b.name(),
            Backend::Local(b) => b.name(),
        }
    }

    fn max_attempts(&self) -> u32 {
        match self {
            Backend::IssueTracker(b) => b.max_attempts(),
            Backend::Semantic(b) => b.max_attempts(),
            Backend::Local(b) => b.max_attempts(),
        }
    }

    async fn search(&self, query: &str, params: &SearchParams) -> Result<BackendResponse> {
        match self {
            Backend::IssueTracker(b) => b.search(query, params).await,
            Backend::Semantic(b) => b.search(query, params).await,
            Backend::Local(b) => b.search(query, params).await,
        }
    }
}

/// Build the shared HTTP client.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("ragbench/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))
}

fn request_error(url: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::unavailable(url, "timed out")
    } else if err.is_decode() {
        Error::unavailable(url, format!("malformed response body: {}", err))
    } else {
        Error::unavailable(url, err)
    }
}

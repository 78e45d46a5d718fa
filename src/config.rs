// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Evaluation configuration.
//!
//! Resolution order, later wins:
//!
//! 1. Built-in defaults (local issue tracker on :3000, semantic service on :8000)
//! 2. JSON config file
//! 3. `RAGBENCH_*` environment variables
//! 4. CLI flags (applied by the binary)
//!
//! Every field has a default, so `{}` is a valid config file.

use crate::error::{Error, Result};
use crate::eval::aggregate::EvalOptions;
use crate::eval::backend::SearchParams;
use crate::eval::metrics::MetricsConfig;
use crate::eval::types::{deserialize_suite, parse_suite, QueryKind, QuerySpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the baseline URL (issue tracker or semantic backends only)
pub const BASELINE_URL_ENV: &str = "RAGBENCH_BASELINE_URL";
/// Overrides the candidate URL
pub const CANDIDATE_URL_ENV: &str = "RAGBENCH_CANDIDATE_URL";
/// Sets the candidate's fallback URL
pub const FALLBACK_URL_ENV: &str = "RAGBENCH_FALLBACK_URL";
/// Sets the candidate's project scope
pub const PROJECT_ENV: &str = "RAGBENCH_PROJECT";

const DEFAULT_BASELINE_URL: &str = "http://localhost:3000/search.json";
const DEFAULT_CANDIDATE_URL: &str = "http://localhost:3000/ragmine/search.json";
const DEFAULT_FALLBACK_URL: &str = "http://localhost:8000/search";
const DEFAULT_PROJECT: &str = "ragmine-test";

/// Where one side of the comparison gets its results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendSpec {
    /// Issue tracker keyword search, `GET url?q=...`
    IssueTracker { url: String },
    /// Semantic search service, `POST url {query, project?, max_results}`
    Semantic {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project: Option<String>,
    },
    /// In-process lexical ranking over a corpus file
    Local { corpus: PathBuf },
}

impl BackendSpec {
    /// Replace the URL of a remote backend. Local backends have no URL and are
    /// left alone.
    pub fn set_url(&mut self, new_url: impl Into<String>) -> bool {
        match self {
            BackendSpec::IssueTracker { url } | BackendSpec::Semantic { url, .. } => {
                *url = new_url.into();
                true
            }
            BackendSpec::Local { .. } => false,
        }
    }

    fn validate(&self, side: &str) -> Result<()> {
        match self {
            BackendSpec::IssueTracker { url } => check_url(side, url),
            BackendSpec::Semantic {
                url, fallback_url, ..
            } => {
                check_url(side, url)?;
                match fallback_url {
                    Some(fallback) => check_url(side, fallback),
                    None => Ok(()),
                }
            }
            BackendSpec::Local { corpus } if corpus.as_os_str().is_empty() => Err(Error::Config(
                format!("{} backend: corpus path is empty", side),
            )),
            BackendSpec::Local { .. } => Ok(()),
        }
    }
}

fn check_url(side: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} backend: '{}' is not an http(s) URL",
            side, url
        )))
    }
}

/// How long `wait` keeps polling a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub attempts: u32,
    pub interval_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval_secs: 2,
        }
    }
}

/// Complete evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub baseline: BackendSpec,
    pub candidate: BackendSpec,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub max_results: usize,
    pub metrics: MetricsConfig,
    pub probe: ProbeConfig,
    #[serde(deserialize_with = "deserialize_suite")]
    pub queries: Vec<QuerySpec>,
    /// Where `evaluate` writes the JSON report
    pub output: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            baseline: BackendSpec::IssueTracker {
                url: DEFAULT_BASELINE_URL.to_string(),
            },
            candidate: BackendSpec::Semantic {
                url: DEFAULT_CANDIDATE_URL.to_string(),
                fallback_url: Some(DEFAULT_FALLBACK_URL.to_string()),
                project: Some(DEFAULT_PROJECT.to_string()),
            },
            timeout_secs: 30,
            max_results: 20,
            metrics: MetricsConfig::default(),
            probe: ProbeConfig::default(),
            queries: default_query_suite(),
            output: PathBuf::from("comparison_results.json"),
        }
    }
}

impl EvalConfig {
    /// Load a config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` if given, else start from defaults. Environment overrides are
    /// applied either way.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `RAGBENCH_*` overrides read through `lookup`.
    ///
    /// Taking the lookup as a parameter keeps tests off the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASELINE_URL_ENV) {
            self.baseline.set_url(url);
        }
        if let Some(url) = lookup(CANDIDATE_URL_ENV) {
            self.candidate.set_url(url);
        }
        if let BackendSpec::Semantic {
            fallback_url,
            project,
            ..
        } = &mut self.candidate
        {
            if let Some(url) = lookup(FALLBACK_URL_ENV) {
                *fallback_url = Some(url).filter(|u| !u.is_empty());
            }
            if let Some(p) = lookup(PROJECT_ENV) {
                *project = Some(p).filter(|p| !p.is_empty());
            }
        }
    }

    /// Load a query suite from its own JSON file, replacing the configured one.
    pub fn load_queries(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.queries = parse_suite(&content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.max_results == 0 {
            return Err(Error::Config("max_results must be at least 1".to_string()));
        }
        self.metrics.validate()?;
        self.baseline.validate("baseline")?;
        self.candidate.validate("candidate")?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            max_results: self.max_results,
            timeout: self.timeout(),
        }
    }

    pub fn options(&self) -> EvalOptions {
        EvalOptions {
            params: self.search_params(),
            metrics: self.metrics,
        }
    }
}

/// The stock suite: three literal queries and three natural-language ones over
/// the same topics, so the by-type breakdown says where semantic search helps.
pub fn default_query_suite() -> Vec<QuerySpec> {
    vec![
        QuerySpec::new(
            "API authentication timeout",
            ["authentication", "timeout", "API"],
        )
        .with_kind(QueryKind::ExactMatch),
        QuerySpec::new(
            "How do I fix login problems?",
            ["authentication", "login", "troubleshooting"],
        )
        .with_kind(QueryKind::Semantic),
        QuerySpec::new(
            "database performance issues",
            ["database", "performance", "query"],
        )
        .with_kind(QueryKind::ExactMatch),
        QuerySpec::new(
            "What causes slow search responses?",
            ["performance", "search", "database"],
        )
        .with_kind(QueryKind::Semantic),
        QuerySpec::new(
            "advanced search filters implementation",
            ["search", "filters", "feature"],
        )
        .with_kind(QueryKind::ExactMatch),
        QuerySpec::new(
            "How can I improve search functionality?",
            ["search", "filters", "advanced"],
        )
        .with_kind(QueryKind::Semantic),
    ]
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Comparative evaluation of two search backends.
//!
//! # Pipeline
//!
//! ```text
//! QuerySpec ──validate──▶ KeywordOracle
//!     │
//!     ▼
//! runner::compare ──▶ (baseline, candidate) MethodOutcome
//!     │
//!     ▼
//! metrics::score ──▶ Metrics per side ──▶ ComparisonRecord
//!     │
//!     ▼
//! Report::build ──▶ Report (summary, k/n tallies, averages, by type)
//! ```
//!
//! # Modules
//!
//! - `types` - Data model and report shape
//! - `backend` - `SearchBackend` trait, HTTP and local adapters
//! - `runner` - Concurrent dual search with per-side timing
//! - `metrics` - Keyword-oracle relevance, precision, recall, satisfaction
//! - `aggregate` - Suite loop, cancellation, report construction
//! - `probe` - Readiness polling for backend URLs

pub mod aggregate;
pub mod backend;
pub mod metrics;
pub mod probe;
pub mod runner;
pub mod types;

pub use aggregate::{evaluate, evaluate_with, run_comparison, CancelFlag, EvalOptions, Progress};
pub use backend::{
    http_client, Backend, BackendResponse, IssueTrackerSearch, LocalSearch, SearchBackend,
    SearchParams, SemanticSearch,
};
pub use metrics::MetricsConfig;
pub use probe::{wait_for_target, wait_until_ready, ProbeTarget};
pub use runner::compare;
pub use types::*;

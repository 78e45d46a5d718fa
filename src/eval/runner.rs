// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dual search: one query, two backends, run side by side.
//!
//! Both calls are issued together and each carries its own stopwatch, so a slow
//! candidate never inflates the baseline's time. A failure on one side turns that
//! side into an empty outcome with `error` set; the other side is unaffected.

use super::backend::{SearchBackend, SearchParams};
use super::types::{Method, MethodOutcome};
use crate::error::Error;
use std::time::Instant;

/// Run `query` against both backends concurrently.
pub async fn compare<B, C>(
    query: &str,
    baseline: &B,
    candidate: &C,
    params: &SearchParams,
) -> (MethodOutcome, MethodOutcome)
where
    B: SearchBackend,
    C: SearchBackend,
{
    tokio::join!(
        run_method(query, baseline, Method::Baseline, params),
        run_method(query, candidate, Method::Candidate, params),
    )
}

/// Run `query` against one backend, degrading any failure to an empty outcome.
///
/// Each request inside the backend is bounded by `params.timeout`. This adds an
/// outer bound of `timeout * max_attempts` for the whole call, so a backend that
/// stalls outside its HTTP client still can't hold up the run.
pub async fn run_method<B: SearchBackend>(
    query: &str,
    backend: &B,
    method: Method,
    params: &SearchParams,
) -> MethodOutcome {
    let budget = params.timeout * backend.max_attempts().max(1);
    let started = Instant::now();
    let result = tokio::time::timeout(budget, backend.search(query, params)).await;
    let response_time = started.elapsed().as_secs_f64();

    let result = result.unwrap_or_else(|_| {
        Err(Error::unavailable(
            backend.name(),
            format!("timed out after {:.1}s", budget.as_secs_f64()),
        ))
    });

    match result {
        Ok(response) => {
            tracing::debug!(
                %method,
                query,
                hits = response.items.len(),
                total = response.total_count,
                elapsed = response_time,
                "search answered"
            );
            MethodOutcome {
                query: query.to_string(),
                results: response.items,
                response_time,
                total_count: response.total_count,
                method,
                error: None,
            }
        }
        Err(err) => {
            tracing::warn!(%method, query, elapsed = response_time, error = %err, "search degraded");
            MethodOutcome::degraded(query, method, response_time, &err)
        }
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Readiness probing: wait until backend URLs answer before a run starts.

use super::backend::NOT_AVAILABLE_STATUSES;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use std::time::Duration;

/// One URL to poll and the statuses that count as ready there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTarget<'a> {
    pub url: &'a str,
    /// Primary URL with a fallback behind it: a "not available" status also
    /// counts as ready, the search falls through to the fallback on it
    pub fallback_covered: bool,
}

impl<'a> ProbeTarget<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            fallback_covered: false,
        }
    }

    pub fn covered_by_fallback(url: &'a str) -> Self {
        Self {
            url,
            fallback_covered: true,
        }
    }

    /// Anything below 500 is ready: search endpoints often reject a bare GET
    /// with 400 or 405 while being up.
    pub fn is_ready(&self, status: StatusCode) -> bool {
        !status.is_server_error()
            || (self.fallback_covered && NOT_AVAILABLE_STATUSES.contains(&status))
    }
}

/// Poll `url` with GET until it answers with a status below 500.
///
/// Gives up after `attempts` tries with `interval` between them.
pub async fn wait_until_ready(
    client: &reqwest::Client,
    url: &str,
    attempts: u32,
    interval: Duration,
) -> Result<()> {
    wait_for_target(client, ProbeTarget::new(url), attempts, interval).await
}

/// Poll a target until [`ProbeTarget::is_ready`] accepts its status.
pub async fn wait_for_target(
    client: &reqwest::Client,
    target: ProbeTarget<'_>,
    attempts: u32,
    interval: Duration,
) -> Result<()> {
    let url = target.url;
    let mut last = String::from("never attempted");

    for attempt in 1..=attempts {
        match client.get(url).timeout(interval.max(Duration::from_secs(1))).send().await {
            Ok(response) if target.is_ready(response.status()) => {
                tracing::info!(url, attempt, status = %response.status(), "backend ready");
                return Ok(());
            }
            Ok(response) => last = format!("status {}", response.status()),
            Err(err) => last = err.to_string(),
        }

        tracing::debug!(url, attempt, reason = %last, "backend not ready yet");
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(Error::unavailable(
        url,
        format!("not ready after {} attempts ({})", attempts, last),
    ))
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for ragbench.
//!
//! One enum covers the whole library. Two of the variants are recoverable and never
//! escape an evaluation run on their own: `EndpointUnavailable` degrades a single
//! search outcome to an empty result set, and `InvalidQuerySpec` skips one query.
//! The rest propagate to the caller.

use thiserror::Error;

/// Errors raised by corpus loading, backends, configuration and evaluation.
#[derive(Debug, Error)]
pub enum Error {
    /// A corpus entry is missing a required field or breaks an invariant
    #[error("invalid document at index {index}: {reason}")]
    InvalidDocument { index: usize, reason: String },

    /// Network failure, timeout or non-success status from one search backend
    #[error("endpoint {endpoint} unavailable: {reason}")]
    EndpointUnavailable { endpoint: String, reason: String },

    /// An evaluation run finished without a single completed query
    #[error("no queries completed; nothing to report")]
    NoResults,

    /// A query spec cannot be evaluated (blank query, no expected keywords)
    #[error("invalid query spec: {0}")]
    InvalidQuerySpec(String),

    /// Configuration file or override rejected
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unavailable(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Error::EndpointUnavailable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the harness recovers from this error instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EndpointUnavailable { .. } | Error::InvalidQuerySpec(_)
        )
    }
}

/// Shorthand result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how local search results get their numbers.
//!
//! Scoring is plain substring matching, additive over four signals. A title that
//! contains the whole query outweighs any single-word hit, and every title hit
//! outweighs the same hit in content. Ranking is a stable sort on top of that,
//! so equal scores come back in corpus order.

mod core;
pub mod ranking;

pub use core::*;
pub use ranking::{compare_scores, rank};

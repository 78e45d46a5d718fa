// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the ragbench command-line interface.
//!
//! Four subcommands: `rank` runs the local lexical ranker over a corpus file,
//! `compare` sends one query to both configured backends, `evaluate` runs the
//! whole query suite and writes a JSON report, and `wait` polls the backends
//! until they answer. Backend URLs come from the config file and `RAGBENCH_*`
//! variables; the flags here override both.

pub mod commands;
pub mod display;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ragbench",
    about = "Compare a semantic search backend against a keyword baseline",
    version
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that talks to backends.
#[derive(Args, Clone, Debug, Default)]
pub struct BackendArgs {
    /// JSON config file (defaults apply when omitted)
    #[arg(short, long, env = "RAGBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Baseline URL, overrides config and RAGBENCH_BASELINE_URL
    #[arg(long)]
    pub baseline_url: Option<String>,

    /// Candidate URL, overrides config and RAGBENCH_CANDIDATE_URL
    #[arg(long)]
    pub candidate_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a local corpus against a query
    Rank {
        /// Search query
        query: String,

        /// Corpus file: JSON array of {id, title, content, source, metadata}
        #[arg(long, default_value = "data/sample_corpus.json")]
        corpus: PathBuf,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print results as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Run one query against both backends and show the metrics side by side
    Compare {
        /// Search query
        query: String,

        /// Keywords a relevant answer should mention
        #[arg(short, long = "keyword", required = true)]
        keywords: Vec<String>,

        #[command(flatten)]
        backends: BackendArgs,

        /// Print the comparison record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the query suite and write a JSON report
    Evaluate {
        #[command(flatten)]
        backends: BackendArgs,

        /// Query suite file, replaces the configured suite
        #[arg(short, long)]
        queries: Option<PathBuf>,

        /// Report path, overrides the configured output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Poll the backends until ready before starting
        #[arg(long)]
        wait: bool,
    },

    /// Poll backend URLs until they answer
    Wait {
        #[command(flatten)]
        backends: BackendArgs,

        /// Attempts per URL, overrides the configured probe
        #[arg(long)]
        attempts: Option<u32>,
    },
}

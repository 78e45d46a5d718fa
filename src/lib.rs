//! Lexical ranking and side-by-side evaluation of search backends.
//!
//! Two halves share one crate:
//!
//! - A deterministic **scorer/ranker** that turns a query and a corpus into an
//!   ordered, truncated result list.
//! - An **evaluation harness** that sends the same queries to a baseline and a
//!   candidate backend, scores both answers against expected keywords, and folds
//!   the differences into a report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  types.rs   │────▶│  scoring/    │────▶│  eval/backend    │
//! │ (Document,  │     │ (rank,       │     │  (LocalSearch,   │
//! │  Corpus)    │     │  PreparedQ.) │     │   HTTP adapters) │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!                                                   │
//!        ┌──────────────────────────────────────────┘
//!        ▼
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ eval/runner  │────▶│ eval/metrics │────▶│ eval/aggregate   │
//! │ (compare)    │     │ (score)      │     │ (evaluate,Report)│
//! └──────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use ragbench::{rank, Corpus, Document};
//!
//! let corpus = Corpus::new(vec![
//!     Document::new("issue-1", "Login timeout", "users time out at login", "issue"),
//!     Document::new("wiki-1", "Setup guide", "install and configure", "wiki"),
//! ]).unwrap();
//!
//! let results = rank("login timeout", &corpus, 10);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].id, "issue-1");
//! ```

pub mod config;
pub mod error;
pub mod eval;
mod scoring;
mod types;
mod utils;

#[doc(hidden)]
pub mod testing;

pub use config::{default_query_suite, BackendSpec, EvalConfig, ProbeConfig};
pub use error::{Error, Result};
pub use scoring::{
    compare_scores, document_score, rank, PreparedQuery, CONTENT_PHRASE_SCORE,
    CONTENT_WORD_SCORE, DISPLAY_CHARS, TITLE_PHRASE_SCORE, TITLE_WORD_SCORE,
};
pub use types::{Corpus, Document, MetaValue, Metadata, ScoredResult};
pub use utils::{normalize, truncate_display};

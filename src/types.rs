// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a scoring call: documents, the corpus that holds them,
//! and the scored results handed back.
//!
//! # Invariants
//!
//! - **Document**: `id` is non-blank. Every other field is required text, except
//!   `metadata` which defaults to empty.
//!
//! - **Corpus**: ids are unique and insertion order is preserved. Ranking ties are
//!   broken by that order, so reordering a corpus can reorder equal-score results.
//!
//! - **ScoredResult**: `score > 0`. Zero-score documents never make it out of
//!   `rank`. `content` is a display excerpt and was not what got scored.
//!
//! Build a `Corpus` through `Corpus::new` or one of the loaders. A corpus that
//! exists has already been validated, which is why ranking never fails.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

// =============================================================================
// METADATA
// =============================================================================

/// A metadata value. Closed set so callers can match on it instead of poking at
/// untyped JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value)
    }
}

/// Key-ordered metadata mapping attached to each document.
pub type Metadata = BTreeMap<String, MetaValue>;

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// One entry of the corpus: an issue, a wiki page, whatever the provider feeds in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Category tag, e.g. "issue" or "wiki"
    pub source: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            source: source.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insertion.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// An ordered, validated collection of documents.
///
/// There is no process-wide corpus: every ranking call takes one explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    /// Validate and wrap a list of documents.
    ///
    /// Fails with `InvalidDocument` on a blank id or on the second occurrence of a
    /// duplicate id.
    pub fn new(docs: Vec<Document>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(docs.len());
        for (index, doc) in docs.iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(Error::InvalidDocument {
                    index,
                    reason: "blank id".to_string(),
                });
            }
            if !seen.insert(doc.id.as_str()) {
                return Err(Error::InvalidDocument {
                    index,
                    reason: format!("duplicate id '{}'", doc.id),
                });
            }
        }
        Ok(Self { docs })
    }

    /// Parse a JSON array of documents.
    ///
    /// Entries are decoded one at a time so a malformed document is reported with
    /// its position instead of a bare serde error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let docs = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<Document>(value).map_err(|e| Error::InvalidDocument {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(docs)
    }

    /// Load a corpus from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// A ranked hit. Borrows everything but the display excerpt from its document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult<'a> {
    pub id: &'a str,
    pub title: &'a str,
    /// First `DISPLAY_CHARS` characters of the content, "..." appended when cut
    pub content: String,
    pub score: f64,
    pub source: &'a str,
    pub metadata: &'a Metadata,
}

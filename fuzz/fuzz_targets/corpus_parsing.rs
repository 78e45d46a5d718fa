// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for corpus parsing.
//!
//! Any byte string either loads as a corpus with unique non-blank ids or fails
//! with an error. It never panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ragbench::Corpus;
use std::collections::HashSet;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(corpus) = Corpus::from_json_str(text) {
        let mut seen = HashSet::new();
        for doc in corpus.documents() {
            assert!(!doc.id.trim().is_empty(), "Blank id accepted");
            assert!(seen.insert(doc.id.as_str()), "Duplicate id accepted");
        }
    }
});

//! Utility functions for string processing.

/// Normalize a string for matching: lowercase only.
///
/// Whitespace is kept as typed: the full-query bonus matches the query string
/// verbatim, inner spaces included.
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

/// Split a normalized query into its words. Empty or blank input gives no words.
pub fn query_words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Cut `text` to at most `max_chars` characters, appending "..." when anything
/// was dropped. Counts Unicode scalar values, never splits a character.
pub fn truncate_display(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

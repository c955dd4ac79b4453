//! # Reassembly
//!
//! Joins cleaned chunk texts back into one document and applies a light,
//! best-effort normalization pass: whitespace collapse and repair of
//! sentence joins broken at chunk boundaries. The normalization is
//! cosmetic, not a guaranteed-correct merge.

use crate::types::ChunkResult;
use once_cell::sync::Lazy;
use regex::Regex;

static EXTRA_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static MISSING_SENTENCE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Z])").unwrap());

/// Combines chunk results, in order, into the final document text.
///
/// Each result's text (cleaned or fallback) is trimmed; empty texts are
/// dropped; the rest are joined with a single space. Runs of spaces collapse
/// to one, and a space is inserted after any `.` directly followed by an
/// upper-case letter.
pub fn combine(results: &[ChunkResult]) -> String {
    let joined = results
        .iter()
        .map(|result| result.text().trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = EXTRA_SPACES.replace_all(&joined, " ");
    let repaired = MISSING_SENTENCE_SPACE.replace_all(&collapsed, ". $1");
    repaired.trim().to_string()
}

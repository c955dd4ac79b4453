//! # Hierarchical Text Splitting
//!
//! Splits raw text into an ordered sequence of bounded-size chunks,
//! preferring to break at semantic boundaries. The strategy is:
//!
//! 1. Recursively split the text on a hierarchy of separators, from paragraph
//!    breaks down to single spaces, keeping each separator attached to the
//!    end of the preceding piece so no characters are lost. A span with no
//!    usable separator is cut at the character level, which guarantees
//!    termination.
//! 2. Greedily merge adjacent pieces back into chunks of at most
//!    `chunk_size` characters, retaining up to `chunk_overlap` trailing
//!    characters of each chunk as the prefix of the next so consecutive
//!    chunks share context.
//!
//! All functions here are pure; sizes are measured in characters, not bytes.

use crate::types::Chunk;
use thiserror::Error;
use tracing::{debug, info};

/// Separators tried highest semantic priority first. The empty string means
/// character-level splitting and makes the recursion total.
pub const SEPARATORS: [&str; 9] = ["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " ", ""];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error("text content is empty or only whitespace")]
    EmptyContent,
    #[error("invalid splitter configuration: {0}")]
    InvalidConfig(String),
}

/// Rejects degenerate chunking parameters.
pub fn validate_params(chunk_size: usize, chunk_overlap: usize) -> Result<(), SplitError> {
    if chunk_size == 0 {
        return Err(SplitError::InvalidConfig(
            "chunk_size must be at least 1".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(SplitError::InvalidConfig(format!(
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Splits `text` into ordered, overlapping chunks of at most `chunk_size`
/// characters.
///
/// Chunk text is trimmed and all-whitespace chunks are dropped. Start offsets
/// are located by searching the source text and are monotonically
/// non-decreasing.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>, SplitError> {
    validate_params(chunk_size, chunk_overlap)?;
    if text.trim().is_empty() {
        return Err(SplitError::EmptyContent);
    }

    debug!(
        "Splitting {} characters (chunk_size: {chunk_size}, overlap: {chunk_overlap})",
        text.chars().count()
    );

    let pieces = split_span(text, &SEPARATORS, chunk_size);
    let merged = merge_pieces(&pieces, chunk_size, chunk_overlap);

    let mut chunks = Vec::with_capacity(merged.len());
    let mut search_from = 0usize;
    for content in &merged {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Best-effort provenance: locate the chunk in the source, searching
        // from the previous chunk's start so overlapping prefixes resolve.
        let start_byte = text[search_from..]
            .find(trimmed)
            .map(|offset| search_from + offset)
            .unwrap_or(search_from);
        let start_offset = text[..start_byte].chars().count();
        chunks.push(Chunk::new(trimmed, start_offset));
        search_from = start_byte;
    }

    info!(
        "Split {} characters into {} chunks",
        text.chars().count(),
        chunks.len()
    );
    Ok(chunks)
}

/// Recursively splits `span` into pieces of at most `chunk_size` characters
/// using the given separator hierarchy.
///
/// The first separator (in priority order) that occurs in the span is used;
/// oversized resulting pieces are re-split with the remaining lower-priority
/// separators. A span with no usable separator is hard-cut at `chunk_size`
/// characters, so every returned piece fits within `chunk_size`.
pub fn split_span(span: &str, separators: &[&str], chunk_size: usize) -> Vec<String> {
    if span.chars().count() <= chunk_size {
        return vec![span.to_string()];
    }

    let Some(position) = separators
        .iter()
        .position(|sep| sep.is_empty() || span.contains(sep))
    else {
        return hard_cut(span, chunk_size);
    };
    let separator = separators[position];
    let remaining = &separators[position + 1..];

    let mut pieces = Vec::new();
    for part in split_keeping_separator(span, separator) {
        if part.chars().count() <= chunk_size {
            pieces.push(part);
        } else if remaining.is_empty() {
            pieces.extend(hard_cut(&part, chunk_size));
        } else {
            pieces.extend(split_span(&part, remaining, chunk_size));
        }
    }
    pieces
}

/// Splits `span` at every occurrence of `separator`, keeping the separator
/// attached to the end of the preceding piece. The empty separator splits
/// into single characters.
fn split_keeping_separator(span: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return span.chars().map(String::from).collect();
    }

    let mut parts = Vec::new();
    let mut rest = span;
    while let Some(index) = rest.find(separator) {
        let split_at = index + separator.len();
        parts.push(rest[..split_at].to_string());
        rest = &rest[split_at..];
    }
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// Cuts a span into pieces of exactly `chunk_size` characters (the last may
/// be shorter). Last-resort fallback for spans with no usable separator.
fn hard_cut(span: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = span.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Greedily packs pieces into chunks of at most `chunk_size` characters.
///
/// When a chunk is emitted, trailing pieces totaling at most `chunk_overlap`
/// characters stay in the window and become the prefix of the next chunk.
/// Every piece from [`split_span`] is at most `chunk_size` characters (the
/// empty separator makes the recursion total), so the packed chunks never
/// exceed the bound.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: Vec<(&str, usize)> = Vec::new();
    let mut window_len = 0usize;

    for piece in pieces {
        let piece_len = piece.chars().count();
        if window_len + piece_len > chunk_size && !window.is_empty() {
            chunks.push(concat_window(&window));
            // Shrink the window down to the overlap budget, and further if
            // the incoming piece would still not fit.
            while window_len > chunk_overlap
                || (window_len + piece_len > chunk_size && window_len > 0)
            {
                let (_, removed) = window.remove(0);
                window_len -= removed;
            }
        }
        window.push((piece.as_str(), piece_len));
        window_len += piece_len;
    }
    if !window.is_empty() {
        chunks.push(concat_window(&window));
    }

    chunks
}

fn concat_window(window: &[(&str, usize)]) -> String {
    window.iter().map(|(piece, _)| *piece).collect()
}

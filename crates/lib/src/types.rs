//! Core data types shared across the pipeline stages.

use crate::gateway::GatewayError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

static SENTENCE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// A contiguous slice of the source text produced by the splitter.
///
/// Chunks are created once, never mutated, and consumed exactly once by the
/// chunk processor. Offsets are best-effort provenance into the original
/// text; overlap and separator retention can shift them, so they are for
/// reporting, not exact reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text, non-empty after trimming.
    pub content: String,
    /// Best-effort character offset of `content` in the source text.
    pub start_offset: usize,
    /// `start_offset` plus `char_count`.
    pub end_offset: usize,
    /// Number of characters in `content`.
    pub char_count: usize,
}

impl Chunk {
    /// Builds a chunk from its content and best-effort start offset.
    pub fn new(content: impl Into<String>, start_offset: usize) -> Self {
        let content = content.into();
        let char_count = content.chars().count();
        Self {
            content,
            start_offset,
            end_offset: start_offset + char_count,
            char_count,
        }
    }

    /// Rough token estimate for reporting (~4 characters per token).
    pub fn token_estimate(&self) -> usize {
        self.char_count / 4
    }

    /// Number of sentence-ending punctuation runs, at least 1 for non-empty
    /// content.
    pub fn sentence_count(&self) -> usize {
        if self.content.trim().is_empty() {
            return 0;
        }
        SENTENCE_ENDINGS.find_iter(&self.content).count().max(1)
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// What happened to one chunk after the processor was done with it.
///
/// Every input chunk yields exactly one outcome; a chunk is never silently
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// The cleaning service returned usable text.
    Cleaned(String),
    /// Retries were exhausted or the failure was permanent; the original
    /// chunk text stands in for the cleaned version.
    FellBack {
        original: String,
        reason: GatewayError,
    },
}

/// The outcome of attempting to clean one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkResult {
    pub chunk: Chunk,
    pub outcome: ChunkOutcome,
}

impl ChunkResult {
    /// The text this chunk contributes to the final document, cleaned or
    /// fallback.
    pub fn text(&self) -> &str {
        match &self.outcome {
            ChunkOutcome::Cleaned(text) => text,
            ChunkOutcome::FellBack { original, .. } => original,
        }
    }

    pub fn is_cleaned(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Cleaned(_))
    }
}

/// Summary record for one successful document-cleaning run.
#[derive(Debug, Clone)]
pub struct CleaningReport {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub total_chunks: usize,
    pub cleaned_chunks: usize,
    pub fallback_chunks: usize,
    pub original_chars: usize,
    pub cleaned_chars: usize,
    /// Wall time from loading the input through saving the output.
    pub elapsed: Duration,
}

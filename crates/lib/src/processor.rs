//! # Chunk Processor
//!
//! Drives the splitter's chunks through the cleaning gateway, one chunk at a
//! time. Transient failures are retried with linear backoff; a chunk whose
//! retries are exhausted (or whose failure is permanent) falls back to its
//! original text, and processing continues. Only the aggregate failure
//! budget — more than half the chunks falling back — fails the whole run,
//! and that check happens after every chunk has been attempted.

use crate::gateway::{CleaningGateway, GatewayError};
use crate::types::{Chunk, ChunkOutcome, ChunkResult};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessError {
    /// More than half the chunks fell back to their original text; the
    /// cleaning service should be treated as unusable, not the output as a
    /// partial result.
    #[error("too many cleaning failures ({failed}/{total}): check that the cleaning service is running")]
    TooManyFailures { failed: usize, total: usize },
}

/// Retry behavior for one chunk. Each chunk's retry loop is independent; no
/// retry state is shared across chunks.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retry attempts after the first failure.
    pub max_retries: u32,
    /// Retry `n` waits `n * retry_delay` before attempting.
    pub retry_delay: Duration,
}

/// Cleans every chunk in order, yielding one result per chunk.
///
/// The result order matches the input order. Fails with
/// [`ProcessError::TooManyFailures`] when more than `total / 2` chunks fell
/// back (integer floor, so 5 fallbacks out of 10 still succeed).
pub async fn process_chunks(
    gateway: &dyn CleaningGateway,
    chunks: &[Chunk],
    policy: RetryPolicy,
) -> Result<Vec<ChunkResult>, ProcessError> {
    let total = chunks.len();
    let mut results = Vec::with_capacity(total);
    let mut cleaned = 0usize;
    let mut fallen_back = 0usize;

    for (index, chunk) in chunks.iter().enumerate() {
        info!(
            "Processing chunk {}/{total} ({} chars, ~{} tokens)",
            index + 1,
            chunk.char_count,
            chunk.token_estimate()
        );

        match clean_single_chunk(gateway, chunk, policy).await {
            Ok(text) => {
                cleaned += 1;
                results.push(ChunkResult {
                    chunk: chunk.clone(),
                    outcome: ChunkOutcome::Cleaned(text),
                });
            }
            Err(reason) => {
                warn!(
                    "Chunk {}/{total} fell back to its original text: {reason}",
                    index + 1
                );
                fallen_back += 1;
                results.push(ChunkResult {
                    chunk: chunk.clone(),
                    outcome: ChunkOutcome::FellBack {
                        original: chunk.content.clone(),
                        reason,
                    },
                });
            }
        }
    }

    info!("Cleaning completed: {cleaned} cleaned, {fallen_back} fell back");

    if fallen_back > total / 2 {
        return Err(ProcessError::TooManyFailures {
            failed: fallen_back,
            total,
        });
    }
    Ok(results)
}

/// Cleans one chunk with retries: 1 initial attempt plus up to `max_retries`
/// retries for transient failures. A cleaned text that is empty after
/// trimming counts as a transient failure. Permanent failures stop the loop
/// immediately.
async fn clean_single_chunk(
    gateway: &dyn CleaningGateway,
    chunk: &Chunk,
    policy: RetryPolicy,
) -> Result<String, GatewayError> {
    let mut last_error = GatewayError::Transient("no attempt was made".to_string());

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let delay = policy.retry_delay * attempt;
            debug!(
                "Retrying in {delay:?} (attempt {}/{})",
                attempt + 1,
                policy.max_retries + 1
            );
            sleep(delay).await;
        }

        match gateway.clean(&chunk.content).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => {
                last_error =
                    GatewayError::Transient("cleaning service returned empty text".to_string());
            }
            Err(error) => {
                let retryable = error.is_transient();
                last_error = error;
                if !retryable {
                    debug!("Permanent failure, not retrying: {last_error}");
                    break;
                }
            }
        }
    }

    Err(last_error)
}

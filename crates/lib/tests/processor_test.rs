//! # Processor Tests
//!
//! Integration tests for the chunk processor using a scripted in-memory
//! gateway: retry counts, per-chunk fallback, and the aggregate failure
//! budget.

use async_trait::async_trait;
use docscrub::processor::{process_chunks, ProcessError, RetryPolicy};
use docscrub::{Chunk, ChunkOutcome, CleaningGateway, GatewayError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A gateway that replays a scripted sequence of responses, then echoes the
/// input text once the script runs out.
#[derive(Clone, Debug)]
struct ScriptedGateway {
    responses: Arc<Mutex<VecDeque<Result<String, GatewayError>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedGateway {
    fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CleaningGateway for ScriptedGateway {
    async fn clean(&self, text: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text.to_string()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

fn make_chunks(count: usize) -> Vec<Chunk> {
    (0..count)
        .map(|index| Chunk::new(format!("Chunk number {index}."), index * 20))
        .collect()
}

fn no_delay(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        retry_delay: Duration::ZERO,
    }
}

/// Verifies the happy path: every chunk cleaned, one call each, input order
/// preserved.
#[tokio::test]
async fn test_all_chunks_cleaned_in_order() {
    let gateway = ScriptedGateway::new(vec![]);
    let chunks = make_chunks(3);

    let results = process_chunks(&gateway, &chunks, no_delay(3))
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(gateway.calls(), 3);
    for (result, chunk) in results.iter().zip(&chunks) {
        assert!(result.is_cleaned());
        assert_eq!(&result.chunk, chunk);
        assert_eq!(result.text(), chunk.content);
    }
}

/// A permanent failure is not retried: the chunk falls back after a single
/// call and processing moves on.
#[tokio::test]
async fn test_permanent_failure_falls_back_without_retry() {
    let gateway = ScriptedGateway::new(vec![Err(GatewayError::Permanent(
        "HTTP 400: text field required".to_string(),
    ))]);
    let chunks = make_chunks(2);

    let results = process_chunks(&gateway, &chunks, no_delay(3))
        .await
        .unwrap();

    // One call for the failed chunk, one for the cleaned one.
    assert_eq!(gateway.calls(), 2);
    match &results[0].outcome {
        ChunkOutcome::FellBack { original, reason } => {
            assert_eq!(original, &chunks[0].content);
            assert!(matches!(reason, GatewayError::Permanent(_)));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(results[1].is_cleaned());
}

/// Transient failures are retried up to the limit; the fallback carries the
/// last error seen.
#[tokio::test]
async fn test_transient_failures_exhaust_retries_then_fall_back() {
    let script = (1..=4)
        .map(|attempt| Err(GatewayError::Transient(format!("timeout {attempt}"))))
        .collect();
    let gateway = ScriptedGateway::new(script);
    let chunks = make_chunks(2);

    let results = process_chunks(&gateway, &chunks, no_delay(3))
        .await
        .unwrap();

    // 1 initial attempt + 3 retries for the first chunk, then 1 for the
    // second.
    assert_eq!(gateway.calls(), 5);
    match &results[0].outcome {
        ChunkOutcome::FellBack { reason, .. } => {
            assert_eq!(reason.to_string(), "cleaning request failed: timeout 4");
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(results[1].is_cleaned());
}

/// When every call fails, every chunk burns its full retry budget and the
/// run fails the aggregate check.
#[tokio::test]
async fn test_unreachable_service_fails_the_run() {
    let script = (0..16)
        .map(|_| Err(GatewayError::Transient("connection refused".to_string())))
        .collect();
    let gateway = ScriptedGateway::new(script);
    let chunks = make_chunks(4);

    let error = process_chunks(&gateway, &chunks, no_delay(3))
        .await
        .unwrap_err();

    // 4 chunks x (1 attempt + 3 retries).
    assert_eq!(gateway.calls(), 16);
    assert_eq!(error, ProcessError::TooManyFailures { failed: 4, total: 4 });
}

/// Exactly half the chunks failing is still a success; the failure budget is
/// "more than half".
#[tokio::test]
async fn test_half_failed_is_within_budget() {
    let script = (0..5)
        .map(|_| Err(GatewayError::Permanent("HTTP 422: unprocessable".to_string())))
        .collect();
    let gateway = ScriptedGateway::new(script);
    let chunks = make_chunks(10);

    let results = process_chunks(&gateway, &chunks, no_delay(0))
        .await
        .unwrap();

    assert_eq!(results.len(), 10);
    let fallbacks = results.iter().filter(|result| !result.is_cleaned()).count();
    assert_eq!(fallbacks, 5);
    // The first five fell back and kept their original text, in order.
    for (result, chunk) in results.iter().take(5).zip(&chunks) {
        assert!(!result.is_cleaned());
        assert_eq!(result.text(), chunk.content);
    }
}

/// One failure past the midpoint tips the run into an error.
#[tokio::test]
async fn test_majority_failed_exceeds_budget() {
    let script = (0..6)
        .map(|_| Err(GatewayError::Permanent("HTTP 422: unprocessable".to_string())))
        .collect();
    let gateway = ScriptedGateway::new(script);
    let chunks = make_chunks(10);

    let error = process_chunks(&gateway, &chunks, no_delay(0))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ProcessError::TooManyFailures {
            failed: 6,
            total: 10
        }
    );
}

/// A successful response with empty text counts as a failure and gets
/// retried like a transient error.
#[tokio::test]
async fn test_empty_cleaned_text_is_retried_then_falls_back() {
    let gateway = ScriptedGateway::new(vec![Ok(String::new()), Ok("   ".to_string())]);
    let chunks = make_chunks(3);

    let results = process_chunks(&gateway, &chunks, no_delay(1))
        .await
        .unwrap();

    // First chunk: empty, retried, still empty. Remaining two: echoed.
    assert_eq!(gateway.calls(), 4);
    match &results[0].outcome {
        ChunkOutcome::FellBack { reason, .. } => {
            assert!(reason.to_string().contains("empty text"));
            assert!(reason.is_transient());
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(results[1].is_cleaned());
    assert!(results[2].is_cleaned());
}

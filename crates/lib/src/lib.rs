//! # docscrub
//!
//! This crate cleans extraction artifacts (headers, footers, page numbers,
//! broken line wraps) out of plain-text documents produced by upstream
//! PDF/format extraction. It splits the input into bounded-size chunks along
//! natural language boundaries, sends each chunk to a remote LLM-backed
//! cleaning service, and reassembles the cleaned chunks into a single output
//! document.
//!
//! The pipeline is built from four components, wired together by
//! [`DocumentCleaner`]:
//!
//! 1. [`splitter`] — recursive hierarchical text splitting with overlap.
//! 2. [`gateway`] — one-shot HTTP calls to the cleaning service.
//! 3. [`processor`] — per-chunk retry/backoff, fallback substitution, and the
//!    aggregate failure budget.
//! 4. [`reassembler`] — joining and light whitespace normalization.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod pipeline;
pub mod processor;
pub mod reassembler;
pub mod splitter;
pub mod types;

pub use config::CleanerConfig;
pub use errors::CleanerError;
pub use gateway::{CleaningGateway, GatewayError, HttpCleaningGateway};
pub use pipeline::DocumentCleaner;
pub use processor::{ProcessError, RetryPolicy};
pub use splitter::SplitError;
pub use types::{Chunk, ChunkOutcome, ChunkResult, CleaningReport};

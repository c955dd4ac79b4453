//! Umbrella error type for the document-cleaning pipeline.

use crate::processor::ProcessError;
use crate::splitter::SplitError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure of a document-cleaning run, naming the failing stage and
/// preserving the underlying cause. Per-chunk transient failures never
/// surface here; they are absorbed by the processor's retry/fallback logic.
#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("input file is empty: {0}")]
    EmptyInput(PathBuf),

    #[error("cannot read input file {path} (encoding error): {source}")]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("cannot read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save output file {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("text splitting failed: {0}")]
    Split(#[from] SplitError),

    #[error("chunk cleaning failed: {0}")]
    Process(#[from] ProcessError),
}

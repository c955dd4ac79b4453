//! # Pipeline Orchestration
//!
//! [`DocumentCleaner`] sequences the full run: load the input file, split it
//! into chunks, clean every chunk through the gateway, reassemble the
//! results, and save the output. Any stage failure aborts the run with a
//! single wrapped error and no output file is written.

use crate::config::CleanerConfig;
use crate::errors::CleanerError;
use crate::gateway::CleaningGateway;
use crate::processor::{self, RetryPolicy};
use crate::reassembler;
use crate::splitter;
use crate::types::CleaningReport;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Orchestrates one document-cleaning run.
///
/// The cleaner owns its gateway and configuration; each invocation of
/// [`clean_document`](Self::clean_document) is independent and no state
/// persists between documents.
#[derive(Debug)]
pub struct DocumentCleaner {
    gateway: Box<dyn CleaningGateway>,
    config: CleanerConfig,
}

impl DocumentCleaner {
    /// Creates a cleaner, rejecting degenerate chunking configuration up
    /// front.
    pub fn new(
        gateway: Box<dyn CleaningGateway>,
        config: CleanerConfig,
    ) -> Result<Self, CleanerError> {
        config.validate()?;
        Ok(Self { gateway, config })
    }

    /// Cleans the document at `input` and writes the result.
    ///
    /// When `output` is `None` the result lands at
    /// `output/<stem>_cleaned.<suffix>`. Elapsed time in the report covers
    /// loading through saving. Dropping the returned future between
    /// suspension points abandons the run without writing output.
    pub async fn clean_document(
        &self,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<CleaningReport, CleanerError> {
        let started = Instant::now();
        info!("Starting document cleaning: {}", input.display());

        let original_text = load_document(input).await?;
        let original_chars = original_text.chars().count();
        info!("Loaded document: {original_chars} characters");

        let chunks = splitter::split_text(
            &original_text,
            self.config.chunk_size,
            self.config.chunk_overlap,
        )?;

        let policy = RetryPolicy {
            max_retries: self.config.max_retries,
            retry_delay: self.config.retry_delay,
        };
        let results = processor::process_chunks(self.gateway.as_ref(), &chunks, policy).await?;
        let cleaned_chunks = results.iter().filter(|result| result.is_cleaned()).count();
        let fallback_chunks = results.len() - cleaned_chunks;

        let cleaned_text = reassembler::combine(&results);
        let cleaned_chars = cleaned_text.chars().count();

        let output_file = match output {
            Some(path) => path.to_path_buf(),
            None => default_output_path(input),
        };
        save_document(&cleaned_text, &output_file).await?;

        let report = CleaningReport {
            input_file: input.to_path_buf(),
            output_file,
            total_chunks: results.len(),
            cleaned_chunks,
            fallback_chunks,
            original_chars,
            cleaned_chars,
            elapsed: started.elapsed(),
        };
        info!(
            "Cleaning completed: {} -> {} characters across {} chunks in {:.1}s",
            report.original_chars,
            report.cleaned_chars,
            report.total_chunks,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

/// Derives the default output path for an input file:
/// `output/<stem>_cleaned.<suffix>`, with `.txt` when the input has no
/// extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    let suffix = input
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("txt");
    PathBuf::from("output").join(format!("{stem}_cleaned.{suffix}"))
}

async fn load_document(input: &Path) -> Result<String, CleanerError> {
    let bytes = match tokio::fs::read(input).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(CleanerError::InputNotFound(input.to_path_buf()))
        }
        Err(error) => {
            return Err(CleanerError::ReadInput {
                path: input.to_path_buf(),
                source: error,
            })
        }
    };

    let content = String::from_utf8(bytes).map_err(|error| CleanerError::InvalidEncoding {
        path: input.to_path_buf(),
        source: error,
    })?;

    if content.trim().is_empty() {
        return Err(CleanerError::EmptyInput(input.to_path_buf()));
    }
    Ok(content)
}

async fn save_document(text: &str, output: &Path) -> Result<(), CleanerError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| CleanerError::WriteOutput {
                    path: output.to_path_buf(),
                    source: error,
                })?;
        }
    }
    tokio::fs::write(output, text)
        .await
        .map_err(|error| CleanerError::WriteOutput {
            path: output.to_path_buf(),
            source: error,
        })?;
    info!("Saved cleaned document: {}", output.display());
    Ok(())
}

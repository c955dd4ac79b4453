//! # docscrub CLI
//!
//! Command-line front end for the document-cleaning pipeline: splits a noisy
//! text file into chunks, cleans each chunk through the remote cleaning
//! service, and writes the reassembled result.

use anyhow::Result;
use clap::Parser;
use docscrub::{CleanerConfig, CleaningGateway, DocumentCleaner, HttpCleaningGateway};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about = "Clean extraction artifacts out of a plain-text document", long_about = None)]
struct Cli {
    /// Path to the noisy input text file
    input_file: PathBuf,
    /// Output path; defaults to output/<stem>_cleaned.<suffix>
    output_file: Option<PathBuf>,
    /// Base URL of the cleaning service
    #[arg(long)]
    api_url: Option<String>,
    /// Target chunk size in characters
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Characters of context shared between consecutive chunks
    #[arg(long)]
    chunk_overlap: Option<usize>,
    /// Retry attempts per chunk after the first failure
    #[arg(long)]
    max_retries: Option<u32>,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // Log to stderr so the summary on stdout stays clean.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let mut config = CleanerConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(size) = cli.chunk_size {
        config.chunk_size = size;
        config.chunk_overlap = config.chunk_overlap.min(size / 10);
    }
    if let Some(overlap) = cli.chunk_overlap {
        config.chunk_overlap = overlap;
    }
    if let Some(retries) = cli.max_retries {
        config.max_retries = retries;
    }

    let gateway = HttpCleaningGateway::new(config.api_url.clone(), config.request_timeout)?;
    if !gateway.health_check().await {
        warn!(
            "Cleaning service at {} did not answer the health check; proceeding anyway",
            config.api_url
        );
    }

    let cleaner = DocumentCleaner::new(Box::new(gateway), config)?;

    println!("Cleaning document: {}", cli.input_file.display());
    println!("This may take a few minutes...");

    let report = tokio::select! {
        result = cleaner.clean_document(&cli.input_file, cli.output_file.as_deref()) => result?,
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("cleaning interrupted by user");
        }
    };

    println!();
    println!("Document cleaned successfully.");
    println!("  Input:   {}", report.input_file.display());
    println!("  Output:  {}", report.output_file.display());
    println!(
        "  Chunks:  {} total, {} cleaned, {} fell back",
        report.total_chunks, report.cleaned_chunks, report.fallback_chunks
    );
    println!(
        "  Size:    {} -> {} characters",
        report.original_chars, report.cleaned_chars
    );
    println!("  Time:    {:.1}s", report.elapsed.as_secs_f64());

    Ok(())
}

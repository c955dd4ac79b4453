//! # Pipeline Configuration
//!
//! A single immutable configuration structure for one cleaning run. It is
//! constructed once (from defaults, the environment, or CLI overrides) and
//! passed explicitly down the call chain; nothing in the pipeline reads
//! global state.

use crate::splitter::{self, SplitError};
use std::env;
use std::time::Duration;

/// Default base URL of the cleaning service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default target chunk size in characters. Large enough to give the model
/// context, small enough to stay well inside its token limits.
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Default number of retries per chunk after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for one document-cleaning run.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Base URL of the cleaning service (no trailing path).
    pub api_url: String,
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Characters of context shared between consecutive chunks. Must be
    /// strictly smaller than `chunk_size`.
    pub chunk_overlap: usize,
    /// Retry attempts per chunk after the first failure.
    pub max_retries: u32,
    /// Base delay for linear retry backoff (retry `n` waits `n * retry_delay`).
    pub retry_delay: Duration,
    /// Timeout for a single cleaning request.
    pub request_timeout: Duration,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            // 10% overlap keeps cross-boundary sentences intact.
            chunk_overlap: DEFAULT_CHUNK_SIZE / 10,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CleanerConfig {
    /// Builds a configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `CLEANING_API_URL`, `CLEANING_CHUNK_SIZE`,
    /// `CLEANING_CHUNK_OVERLAP`, `CLEANING_MAX_RETRIES`,
    /// `CLEANING_RETRY_DELAY_MS`, `CLEANING_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("CLEANING_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Some(size) = env_parse::<usize>("CLEANING_CHUNK_SIZE") {
            config.chunk_size = size;
            config.chunk_overlap = size / 10;
        }
        if let Some(overlap) = env_parse::<usize>("CLEANING_CHUNK_OVERLAP") {
            config.chunk_overlap = overlap;
        }
        if let Some(retries) = env_parse::<u32>("CLEANING_MAX_RETRIES") {
            config.max_retries = retries;
        }
        if let Some(delay_ms) = env_parse::<u64>("CLEANING_RETRY_DELAY_MS") {
            config.retry_delay = Duration::from_millis(delay_ms);
        }
        if let Some(timeout) = env_parse::<u64>("CLEANING_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(timeout);
        }

        config
    }

    /// Checks the chunking parameters, rejecting degenerate combinations
    /// before any I/O happens.
    pub fn validate(&self) -> Result<(), SplitError> {
        splitter::validate_params(self.chunk_size, self.chunk_overlap)
    }
}

/// Parses an environment variable into the target type; unset or
/// out-of-range values yield `None`.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_rejects_out_of_range_values() {
        // Larger than u32::MAX; must fall back to the default instead of
        // wrapping.
        env::set_var("CLEANING_MAX_RETRIES", "99999999999999999999");
        env::set_var("CLEANING_RETRY_DELAY_MS", "250");

        let config = CleanerConfig::from_env();

        env::remove_var("CLEANING_MAX_RETRIES");
        env::remove_var("CLEANING_RETRY_DELAY_MS");

        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
    }
}

//! # Cleaning Gateway
//!
//! A thin synchronous adapter around the remote text-cleaning service. The
//! gateway performs exactly one attempt per call and classifies failures as
//! transient (worth retrying) or permanent; retry policy lives in the chunk
//! processor, not here.

use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// A single failed call to the cleaning service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Connection failure, timeout, or a 5xx response. Retryable.
    #[error("cleaning request failed: {0}")]
    Transient(String),
    /// A 4xx response or a structurally invalid body. Not retryable.
    #[error("cleaning service rejected the request: {0}")]
    Permanent(String),
}

impl GatewayError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// A trait for sending one chunk's text to the cleaning service.
///
/// Implementations make exactly one attempt per `clean` call and hold no
/// cross-call mutable state; the chunk processor owns all retry logic. An
/// empty cleaned text is returned as-is — rejecting it is the caller's job.
#[async_trait]
pub trait CleaningGateway: Send + Sync + Debug + DynClone {
    /// Sends `text` to the cleaning service and returns the cleaned text.
    async fn clean(&self, text: &str) -> Result<String, GatewayError>;

    /// Probes the service's health endpoint. Used by surrounding tooling,
    /// never by the pipeline itself.
    async fn health_check(&self) -> bool;
}

dyn_clone::clone_trait_object!(CleaningGateway);

// --- Wire contract ---

#[derive(Serialize)]
struct CleanTextRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct CleanTextResponse {
    cleaned_text: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    detail: Option<String>,
}

/// HTTP implementation of [`CleaningGateway`] backed by a pooled reqwest
/// client.
#[derive(Clone, Debug)]
pub struct HttpCleaningGateway {
    client: ReqwestClient,
    base_url: String,
}

impl HttpCleaningGateway {
    /// Creates a gateway for the service at `base_url` with the given
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                GatewayError::Permanent(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CleaningGateway for HttpCleaningGateway {
    async fn clean(&self, text: &str) -> Result<String, GatewayError> {
        let url = format!("{}/clean-text", self.base_url);
        debug!("Sending {} characters to {url}", text.chars().count());

        let response = self
            .client
            .post(&url)
            .json(&CleanTextRequest { text })
            .send()
            .await
            .map_err(|error| {
                GatewayError::Transient(format!(
                    "cannot reach cleaning service at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.detail)
                .unwrap_or(body);
            let message = format!("HTTP {status}: {detail}");
            return if status.is_client_error() {
                Err(GatewayError::Permanent(message))
            } else {
                Err(GatewayError::Transient(message))
            };
        }

        let body: CleanTextResponse = response.json().await.map_err(|error| {
            GatewayError::Permanent(format!(
                "invalid response from cleaning service: {error}"
            ))
        })?;

        debug!(
            "Cleaning call succeeded: {} -> {} characters",
            text.chars().count(),
            body.cleaned_text.chars().count()
        );
        Ok(body.cleaned_text)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                warn!("Health check against {url} failed: {error}");
                false
            }
        }
    }
}

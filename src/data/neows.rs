//! NASA NeoWs feed API client
//!
//! This module provides the [`FeedFetcher`] seam the retriever depends on and
//! its production implementation, [`NeoWsClient`], which calls
//! `GET /neo/rest/v1/feed` with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::Client;
use thiserror::Error;

use super::feed::FeedResponse;

/// Default base URL for the NeoWs API
pub const NEOWS_BASE_URL: &str = "https://api.nasa.gov";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body excerpt kept for diagnostics
const ERROR_BODY_SNIPPET_MAX_CHARS: usize = 300;

/// Errors that can occur when fetching the feed
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API key configured; nothing was sent
    #[error("{0}")]
    Configuration(String),

    /// Upstream answered with a non-success status
    #[error("NeoWs request failed with status {status}{}", snippet_suffix(.body_snippet))]
    Upstream { status: u16, body_snippet: String },

    /// Upstream could not be reached or timed out
    #[error("NeoWs request failed: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// Upstream answered 2xx with a body that is not a feed
    #[error("Failed to parse NeoWs response: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Coarse classification of a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local setup is wrong
    Configuration,
    /// Upstream is failing
    Upstream,
}

impl FetchError {
    /// Classifies the error by variant
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Configuration(_) => ErrorKind::Configuration,
            FetchError::Upstream { .. } | FetchError::Unreachable(_) | FetchError::InvalidPayload(_) => {
                ErrorKind::Upstream
            }
        }
    }

    /// Upstream HTTP status, when one was received
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => Some(*status),
            FetchError::Unreachable(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn snippet_suffix(snippet: &str) -> String {
    if snippet.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", snippet)
    }
}

/// Source of raw feed payloads
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetches the feed for the inclusive date range `start..=end`
    ///
    /// `Ok(None)` means upstream answered successfully with no payload.
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<FeedResponse>, FetchError>;
}

/// Client for fetching the NeoWs feed
#[derive(Debug, Clone)]
pub struct NeoWsClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl NeoWsClient {
    /// Creates a new NeoWsClient
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.nasa.gov`
    /// * `api_key` - Access key; blank means unconfigured
    /// * `timeout` - Upper bound on each request
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client, base_url, api_key))
    }

    /// Creates a new NeoWsClient with a custom HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Returns true if an API key is set
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl FeedFetcher for NeoWsClient {
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<FeedResponse>, FetchError> {
        if !self.has_api_key() {
            return Err(FetchError::Configuration(
                "NASA_API_KEY is not configured. Set env var NASA_API_KEY or pass --api-key.".to_string(),
            ));
        }

        let url = format!("{}/neo/rest/v1/feed", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body_snippet: summarize_body(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        // A literal `null` body decodes to None
        Ok(serde_json::from_str::<Option<FeedResponse>>(&text)?)
    }
}

/// Collapses whitespace runs and truncates to 300 characters plus `...`
pub fn summarize_body(body: &str) -> String {
    let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match normalized.char_indices().nth(ERROR_BODY_SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &normalized[..cut]),
        None => normalized,
    }
}

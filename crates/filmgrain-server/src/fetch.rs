//! Remote image fetching.
//!
//! The [`Fetcher`] trait is the seam between the service and the network:
//! [`HttpFetcher`] talks HTTP through a blocking `reqwest` client, tests
//! substitute an in-memory implementation.

use std::io::Read;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::FetchConfig;

/// Errors raised while retrieving the source image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The locator is not an absolute http(s) URL
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    /// The remote answered with a non-success status
    #[error("Remote server returned status {0}")]
    Status(u16),

    /// Connection, TLS, timeout or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The body exceeds the configured size limit
    #[error("Image exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },
}

/// Retrieves raw bytes for an image locator.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = parse_remote_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let body = read_limited(response, self.max_bytes)?;
        debug!("fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Accept only absolute http/https URLs.
pub fn parse_remote_url(url: &str) -> Result<reqwest::Url, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme '{other}'"
        ))),
    }
}

/// Read at most `limit` bytes, failing if the source holds more.
fn read_limited<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if body.len() as u64 > limit {
        return Err(FetchError::TooLarge { limit });
    }
    Ok(body)
}

//! The request surface: one read operation taking an image URL.
//!
//! ## Request Flow
//! 1. Extract the `url` query parameter (missing → 400)
//! 2. Fetch the remote bytes (failure → 500 "Failed to fetch image")
//! 3. Decode, run the pipeline, encode PNG (failure → 500 "Error processing image")
//! 4. Return the PNG with an `image/png` content type
//!
//! Transport is left to the caller: [`Service::handle_request`] takes a
//! request target such as `/api?url=https%3A%2F%2Fexample.com%2Fa.jpg` and
//! returns an [`ApiResponse`] that any HTTP layer can write out.

use std::time::Instant;

use filmgrain_core::decode::{decode_image, DecodeError};
use filmgrain_core::encode::{encode_png_with, EncodeError, PngCompression, PNG_CONTENT_TYPE};
use filmgrain_core::{Pipeline, PipelineError};
use log::{debug, error, warn};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::fetch::{FetchError, Fetcher};

/// Name of the query parameter carrying the image locator.
pub const URL_PARAM: &str = "url";

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Anything that can go wrong between locator and PNG bytes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to process image: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),
}

/// A transport-agnostic response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: TEXT_CONTENT_TYPE,
            body: message.as_bytes().to_vec(),
        }
    }

    fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: PNG_CONTENT_TYPE,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Client-facing response for a failed request. Details stay in the log.
    ///
    /// Only a retrieval that was attempted and failed reports a fetch
    /// failure; an unusable locator is a processing error.
    pub fn from_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::Fetch(FetchError::InvalidUrl(_)) => {
                Self::text(500, "Error processing image")
            }
            ServiceError::Fetch(_) => Self::text(500, "Failed to fetch image"),
            _ => Self::text(500, "Error processing image"),
        }
    }

    pub fn missing_url() -> Self {
        Self::text(400, "Missing image URL")
    }
}

/// Fetches, processes and encodes images.
pub struct Service<F: Fetcher> {
    fetcher: F,
    pipeline: Pipeline,
    compression: PngCompression,
}

impl<F: Fetcher> Service<F> {
    /// Build a service, validating the pipeline configuration.
    pub fn new(fetcher: F, config: &ServerConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            fetcher,
            pipeline: Pipeline::new(config.pipeline.clone())?,
            compression: config.compression,
        })
    }

    /// Handle a request target (path plus query string).
    pub fn handle_request(&self, target: &str) -> ApiResponse {
        self.respond(image_url_from_target(target).as_deref())
    }

    /// Produce the response for an already-extracted locator.
    pub fn respond(&self, url: Option<&str>) -> ApiResponse {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            warn!("request without '{}' parameter", URL_PARAM);
            return ApiResponse::missing_url();
        };

        match self.render(url) {
            Ok(png) => ApiResponse::png(png),
            Err(e) => {
                error!("Error processing image {}: {}", url, e);
                ApiResponse::from_error(&e)
            }
        }
    }

    /// Fetch `url` and return the processed PNG bytes.
    pub fn render(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let start = Instant::now();
        let bytes = self.fetcher.fetch(url)?;
        let fetched = start.elapsed();

        let buffer = decode_image(&bytes)?;
        drop(bytes);
        let (width, height) = (buffer.width, buffer.height);

        let processed = self.pipeline.process(buffer, &mut rand::thread_rng())?;
        let png = encode_png_with(&processed, self.compression)?;

        debug!(
            "rendered {}x{} image from {} (fetch {:?}, total {:?}, {} bytes out)",
            width,
            height,
            url,
            fetched,
            start.elapsed(),
            png.len()
        );
        Ok(png)
    }
}

/// Extract the `url` query parameter from a request target.
///
/// Accepts a bare query (`url=...`), a path with query (`/api?url=...`) or an
/// absolute URL. Values are percent-decoded. Returns `None` when absent.
pub fn image_url_from_target(target: &str) -> Option<String> {
    let query = match target.split_once('?') {
        Some((_, q)) => q,
        None if target.starts_with('/') => return None,
        None => target,
    };

    // Parse against a dummy base so the query is percent-decoded for us.
    let base = reqwest::Url::parse("http://localhost/").ok()?;
    let parsed = base.join(&format!("?{query}")).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == URL_PARAM)
        .map(|(_, v)| v.into_owned())
}

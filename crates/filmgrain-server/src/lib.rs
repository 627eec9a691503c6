//! Filmgrain Server - fetch a remote image and return it with the filmgrain look
//!
//! This crate wraps `filmgrain-core` with the pieces around the pixel
//! pipeline: retrieving the source image, the single-parameter request
//! surface, and configuration.
//!
//! # Module Structure
//!
//! - `fetch` - `Fetcher` trait and the blocking HTTP implementation
//! - `handler` - Request handling: `url` parameter in, PNG or error response out
//! - `config` - JSON configuration for the pipeline, fetch limits and encoder
//!
//! # Usage
//!
//! ```ignore
//! use filmgrain_server::{HttpFetcher, Service, ServerConfig};
//!
//! let config = ServerConfig::default();
//! let service = Service::new(HttpFetcher::new(&config.fetch)?, &config)?;
//! let response = service.handle_request("/api?url=https%3A%2F%2Fexample.com%2Fcat.jpg");
//! assert_eq!(response.content_type, "image/png");
//! ```

pub mod config;
pub mod fetch;
pub mod handler;

pub use config::{load_config, ConfigError, FetchConfig, ServerConfig};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use handler::{image_url_from_target, ApiResponse, Service, ServiceError};

/// Get the version of the crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
